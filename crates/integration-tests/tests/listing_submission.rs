//! End-to-end listing submission with both APIs mocked.

#![allow(clippy::unwrap_used)]

use reverb_bridge_admin::services::{ListingOutcome, ListingSettings, submit_listings};
use reverb_bridge_core::{DraftReason, ListingDraft, ShopifyGid};
use reverb_bridge_integration_tests::{
    created_listing, graphql_path, mount_product, reverb_client, shopify_client,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn draft(id: u64) -> ListingDraft {
    ListingDraft {
        product_id: ShopifyGid::product(id),
        model: "Stratocaster".to_string(),
        finish: Some("Sunburst".to_string()),
        condition: Some("cond-excellent".to_string()),
        category: Some("cat-solid-body".to_string()),
        draft: false,
        attach_video: true,
    }
}

#[tokio::test]
async fn second_failure_does_not_stop_the_batch() {
    let shopify_server = MockServer::start().await;
    mount_product(&shopify_server, 1, "Player Stratocaster", "STRAT-1", 2).await;
    mount_product(&shopify_server, 2, "Jazzmaster", "JM-1", 1).await;
    mount_product(&shopify_server, 3, "Telecaster", "TELE-1", 0).await;

    let reverb_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_partial_json(json!({
            "sku": "STRAT-1",
            "publish": true,
            "videos": [{ "link": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(101, "live")))
        .expect(1)
        .mount(&reverb_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_partial_json(json!({ "sku": "JM-1" })))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Listing could not be saved"
        })))
        .expect(1)
        .mount(&reverb_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_partial_json(json!({ "sku": "TELE-1", "publish": false })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(103, "draft")))
        .expect(1)
        .mount(&reverb_server)
        .await;

    let shopify = shopify_client(&shopify_server).await;
    let reverb = reverb_client(&reverb_server);
    let drafts = vec![draft(1), draft(2), draft(3)];

    let outcomes =
        submit_listings(&shopify, &reverb, &ListingSettings::default(), &drafts).await;

    assert_eq!(outcomes.len(), 3);
    let ids: Vec<u64> = outcomes.iter().map(|o| o.product_id().numeric_id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    match &outcomes[0] {
        ListingOutcome::Created {
            listing_id,
            draft,
            reasons,
            url,
            ..
        } => {
            assert_eq!(*listing_id, 101);
            assert!(!draft);
            assert!(reasons.is_empty());
            assert_eq!(url.as_deref(), Some("https://reverb.com/item/101"));
        }
        other => panic!("expected created listing, got {other:?}"),
    }

    match &outcomes[1] {
        ListingOutcome::Failed { title, message, .. } => {
            assert_eq!(title.as_deref(), Some("Jazzmaster"));
            assert!(message.contains("Listing could not be saved"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    match &outcomes[2] {
        ListingOutcome::Created { draft, reasons, .. } => {
            assert!(draft);
            assert_eq!(reasons, &vec![DraftReason::NoPhotos]);
        }
        other => panic!("expected draft listing, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_product_is_reported_without_calling_reverb() {
    let shopify_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": null }
        })))
        .mount(&shopify_server)
        .await;

    let reverb_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(1, "live")))
        .expect(0)
        .mount(&reverb_server)
        .await;

    let outcomes = submit_listings(
        &shopify_client(&shopify_server).await,
        &reverb_client(&reverb_server),
        &ListingSettings::default(),
        &[draft(9)],
    )
    .await;

    assert_eq!(
        outcomes,
        vec![ListingOutcome::Failed {
            product_id: ShopifyGid::product(9),
            title: None,
            message: "product not found".to_string(),
        }]
    );
}
