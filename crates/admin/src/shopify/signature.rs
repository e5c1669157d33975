//! Verification of the `hmac` parameter Shopify signs onto app URLs.
//!
//! Shopify appends `hmac` to the OAuth callback and to every embedded
//! app load (`shop`, `host`, `timestamp`, ...). The signed message is every
//! other parameter, decoded, sorted by key and joined as `key=value` pairs
//! with `&`, keyed with the app's client secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Query parameters excluded from the signed message.
const UNSIGNED_PARAMS: &[&str] = &["hmac", "signature"];

/// Largest accepted age (or clock skew) of a signed app-load `timestamp`.
pub const MAX_TIMESTAMP_SKEW_SECS: i64 = 90;

/// Check the `hmac` parameter of a raw query string.
#[must_use]
pub fn verify_query_hmac(raw_query: &str, client_secret: &str) -> bool {
    let mut provided = None;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for (key, value) in url::form_urlencoded::parse(raw_query.as_bytes()) {
        if key == "hmac" {
            provided = Some(value.into_owned());
        } else if !UNSIGNED_PARAMS.contains(&key.as_ref()) {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }

    let Some(provided) = provided else {
        return false;
    };
    let Ok(expected) = hex::decode(provided) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(client_secret.as_bytes()) else {
        return false;
    };
    mac.update(signed_message(pairs).as_bytes());

    // Constant-time comparison
    mac.verify_slice(&expected).is_ok()
}

/// Sign a set of query parameters the way Shopify does, returning the hex
/// `hmac` value.
#[must_use]
pub fn sign_query(params: &[(&str, &str)], client_secret: &str) -> String {
    let pairs = params
        .iter()
        .filter(|(k, _)| !UNSIGNED_PARAMS.contains(k))
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    // HMAC-SHA256 accepts keys of any length
    let Ok(mut mac) = HmacSha256::new_from_slice(client_secret.as_bytes()) else {
        return String::new();
    };
    mac.update(signed_message(pairs).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Whether a signed `timestamp` (Unix seconds) is close enough to `now`.
#[must_use]
pub fn timestamp_is_fresh(timestamp: &str, now: i64) -> bool {
    timestamp
        .parse::<i64>()
        .is_ok_and(|ts| (now - ts).abs() <= MAX_TIMESTAMP_SKEW_SECS)
}

fn signed_message(mut pairs: Vec<(String, String)>) -> String {
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "hush";

    fn sign(message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature_regardless_of_param_order() {
        let signed = "code=abc&shop=guitars.myshopify.com&state=s1&timestamp=1700000000";
        let hmac = sign(signed);
        let query =
            format!("timestamp=1700000000&hmac={hmac}&state=s1&code=abc&shop=guitars.myshopify.com");

        assert!(verify_query_hmac(&query, SECRET));
    }

    #[test]
    fn signs_parameters_beyond_the_known_set() {
        let signed = "code=abc&host=YWRtaW4&shop=guitars.myshopify.com&timestamp=1";
        let query = format!("{signed}&hmac={}", sign(signed));
        assert!(verify_query_hmac(&query, SECRET));

        // Dropping a parameter changes the message
        let tampered = format!("code=abc&shop=guitars.myshopify.com&timestamp=1&hmac={}", sign(signed));
        assert!(!verify_query_hmac(&tampered, SECRET));
    }

    #[test]
    fn rejects_missing_or_malformed_hmac() {
        assert!(!verify_query_hmac("code=abc&shop=x", SECRET));
        assert!(!verify_query_hmac("code=abc&hmac=not-hex", SECRET));
        assert!(!verify_query_hmac("", SECRET));
    }

    #[test]
    fn rejects_signature_from_other_secret() {
        let signed = "code=abc&shop=guitars.myshopify.com";
        let mut mac = HmacSha256::new_from_slice(b"other").unwrap();
        mac.update(signed.as_bytes());
        let hmac = hex::encode(mac.finalize().into_bytes());

        assert!(!verify_query_hmac(&format!("{signed}&hmac={hmac}"), SECRET));
    }

    #[test]
    fn sign_query_matches_verification() {
        let params = [
            ("shop", "guitars.myshopify.com"),
            ("host", "YWRtaW4"),
            ("timestamp", "1700000000"),
        ];
        let hmac = sign_query(&params, SECRET);
        let query = format!(
            "shop=guitars.myshopify.com&host=YWRtaW4&timestamp=1700000000&hmac={hmac}"
        );
        assert!(verify_query_hmac(&query, SECRET));
    }

    #[test]
    fn stale_or_garbled_timestamps_are_rejected() {
        let now = 1_700_000_000;
        assert!(timestamp_is_fresh("1700000000", now));
        assert!(timestamp_is_fresh("1699999950", now));
        assert!(!timestamp_is_fresh("1699990000", now));
        assert!(!timestamp_is_fresh("1700001000", now));
        assert!(!timestamp_is_fresh("yesterday", now));
    }
}
