//! The app router end to end: session checks, form tokens, listing
//! submission, the sample product and token revocation.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use reverb_bridge_integration_tests::{
    TestApp, body_text, created_listing, csrf_token, graphql_path, location, mount_dashboard,
    mount_product,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONNECT: &str = "/shopify/connect";

async fn servers() -> (MockServer, MockServer) {
    (MockServer::start().await, MockServer::start().await)
}

/// Open the app with a signed load and return the form token it issued.
async fn signed_in(app: &mut TestApp) -> String {
    let response = app.load_signed().await;
    assert_eq!(response.status(), StatusCode::OK);
    csrf_token(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn anonymous_requests_are_sent_to_install() {
    let (shopify_server, reverb_server) = servers().await;
    mount_product(&shopify_server, 1, "Player Stratocaster", "STRAT-1", 2).await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(1, "live")))
        .expect(0)
        .mount(&reverb_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;

    let response = app
        .post_form(
            "/listings",
            &[
                ("items[0].product_id", "gid://shopify/Product/1"),
                ("items[0].model", "X"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(CONNECT));

    for page in ["/", "/products", "/listings/results"] {
        let response = app.get(page).await;
        assert_eq!(location(&response), Some(CONNECT), "{page}");
    }
}

#[tokio::test]
async fn forged_app_load_does_not_open_a_session() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    let mut app = TestApp::start(&shopify_server, &reverb_server).await;

    let now = chrono::Utc::now().timestamp();
    let response = app
        .get(&format!(
            "/?shop=guitar-barn.myshopify.com&timestamp={now}&hmac=00ff00ff"
        ))
        .await;
    assert_eq!(location(&response), Some(CONNECT));

    let response = app.get("/").await;
    assert_eq!(location(&response), Some(CONNECT));
}

#[tokio::test]
async fn signed_app_load_opens_the_dashboard() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    let mut app = TestApp::start(&shopify_server, &reverb_server).await;

    let response = app.load_signed().await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, Guitar Barn"));
    assert!(html.contains("Guitar Barn Vintage"));
    assert!(csrf_token(&html).is_some_and(|t| !t.is_empty()));

    // The session carries later, unsigned requests
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn submitted_listings_show_on_the_results_page() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    mount_product(&shopify_server, 1, "Player Stratocaster", "STRAT-1", 2).await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .and(body_partial_json(json!({
            "sku": "STRAT-1",
            "model": "Stratocaster",
            "publish": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(101, "live")))
        .expect(1)
        .mount(&reverb_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    let token = signed_in(&mut app).await;

    let response = app
        .post_form(
            "/listings",
            &[
                ("csrf_token", token.as_str()),
                ("items[0].product_id", "gid://shopify/Product/1"),
                ("items[0].model", "Stratocaster"),
                ("items[0].condition", "cond-excellent"),
                ("items[0].category", "cat-solid-body"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/listings/results"));

    let response = app.get("/listings/results").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Created 1 Reverb listing(s)"));
    assert!(html.contains("Player Stratocaster"));
    assert!(html.contains("Published"));
    assert!(html.contains("Listing #101"));
    assert!(html.contains("https://reverb.com/item/101"));
}

#[tokio::test]
async fn posts_without_the_form_token_are_forbidden() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    mount_product(&shopify_server, 1, "Player Stratocaster", "STRAT-1", 2).await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(body_partial_json(json!({ "operationName": "ProductCreate" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&shopify_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/listings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_listing(1, "live")))
        .expect(0)
        .mount(&reverb_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    signed_in(&mut app).await;

    let response = app
        .post_form(
            "/listings",
            &[
                ("items[0].product_id", "gid://shopify/Product/1"),
                ("items[0].model", "X"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .post_form("/sample-product", &[("csrf_token", "guessed")])
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_selection_returns_to_products_with_a_notice() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    signed_in(&mut app).await;

    let response = app.get("/listings/new").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/products"));

    let html = body_text(app.get("/").await).await;
    assert!(html.contains("Select at least one product"));
}

#[tokio::test]
async fn revoked_token_is_dropped_and_install_restarts() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(body_partial_json(json!({ "operationName": "GetProducts" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token"
        })))
        .expect(1)
        .mount(&shopify_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    signed_in(&mut app).await;
    assert!(app.state.shopify().has_token().await);

    let response = app.get("/products").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(CONNECT));
    assert!(!app.state.shopify().has_token().await);
}

#[tokio::test]
async fn sample_product_is_a_priced_draft_snowboard() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(body_partial_json(json!({
            "operationName": "ProductCreate",
            "variables": { "product": { "status": "DRAFT" } }
        })))
        .and(body_string_contains(" Snowboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "productCreate": {
                    "product": {
                        "id": "gid://shopify/Product/55",
                        "title": "Orange Snowboard",
                        "handle": "orange-snowboard",
                        "status": "DRAFT",
                        "variants": {
                            "edges": [{ "node": { "id": "gid://shopify/ProductVariant/77" } }]
                        }
                    },
                    "userErrors": []
                }
            }
        })))
        .expect(1)
        .mount(&shopify_server)
        .await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(body_partial_json(json!({
            "operationName": "ProductVariantsBulkUpdate",
            "variables": { "productId": "gid://shopify/Product/55" }
        })))
        .and(body_string_contains("gid://shopify/ProductVariant/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "productVariantsBulkUpdate": {
                    "productVariants": [
                        { "id": "gid://shopify/ProductVariant/77", "price": "42.17" }
                    ],
                    "userErrors": []
                }
            }
        })))
        .expect(1)
        .mount(&shopify_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    let token = signed_in(&mut app).await;

    let response = app
        .post_form("/sample-product", &[("csrf_token", token.as_str())])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let html = body_text(app.get("/").await).await;
    assert!(html.contains("banner--success"));
    assert!(html.contains("Orange Snowboard"));
}

#[tokio::test]
async fn sample_product_user_errors_become_a_notice() {
    let (shopify_server, reverb_server) = servers().await;
    mount_dashboard(&shopify_server, &reverb_server).await;
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(body_partial_json(json!({ "operationName": "ProductCreate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "productCreate": {
                    "product": null,
                    "userErrors": [{ "field": ["title"], "message": "Title is too long" }]
                }
            }
        })))
        .expect(1)
        .mount(&shopify_server)
        .await;

    let mut app = TestApp::start(&shopify_server, &reverb_server).await;
    let token = signed_in(&mut app).await;

    let response = app
        .post_form("/sample-product", &[("csrf_token", token.as_str())])
        .await;
    assert_eq!(location(&response), Some("/"));

    let html = body_text(app.get("/").await).await;
    assert!(html.contains("banner--error"));
    assert!(html.contains("Title is too long"));
}
