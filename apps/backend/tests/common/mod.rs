#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::ETAG;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    ono_test_support::logging::init();
}

/// Read a JSON body, panicking with context on malformed output.
pub async fn read_json(resp: ServiceResponse<BoxBody>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "response body should be JSON ({e}): {}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// The ETag header of a response, as sent.
pub fn etag_of(resp: &ServiceResponse<BoxBody>) -> String {
    resp.headers()
        .get(ETAG)
        .expect("ETag header should be present")
        .to_str()
        .expect("ETag should be ASCII")
        .to_string()
}

/// `stateVersion` of a snapshot body.
pub fn version_of(snapshot: &Value) -> u64 {
    snapshot["stateVersion"]
        .as_u64()
        .expect("snapshot should carry stateVersion")
}
