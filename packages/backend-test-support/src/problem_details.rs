//! Assertions for the backend's error contract.
//!
//! Two shapes come back from the API on failure: RFC 7807 Problem Details
//! for ordinary errors, and the `ROOM_DELETED` body when a room vanished.
//! Neither helper depends on backend types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

#[derive(Debug, Deserialize)]
struct RoomDeletedLike {
    #[serde(rename = "type")]
    type_: String,
    reason: String,
    events: Vec<serde_json::Value>,
}

/// Assert that response parts carry a Problem Details body with the given code.
///
/// Also checks that the `x-trace-id` header matches `trace_id` in the body.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) {
    assert_eq!(status, expected_status);

    let problem: ProblemDetailsLike = serde_json::from_slice(body_bytes)
        .expect("Response body should be valid ProblemDetails JSON");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");

    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );
    assert!(problem.type_.ends_with(expected_code));
    assert!(!problem.title.is_empty());
    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());

    if let Some(expected_detail) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected_detail),
            "Expected detail to contain '{}', but got '{}'",
            expected_detail,
            problem.detail
        );
    }
}

/// Assert that a ServiceResponse carries a Problem Details body.
pub async fn assert_problem_details_from_service_response<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    );
}

/// Assert that a ServiceResponse is a `ROOM_DELETED` notification.
pub async fn assert_room_deleted_from_service_response<B: MessageBody>(
    resp: ServiceResponse<B>,
    expected_reason: &str,
) {
    assert_eq!(resp.status(), StatusCode::OK);
    let body = actix_web::test::read_body(resp).await;
    let deleted: RoomDeletedLike =
        serde_json::from_slice(&body).expect("Response body should be a ROOM_DELETED body");

    assert_eq!(deleted.type_, "ROOM_DELETED");
    assert_eq!(deleted.reason, expected_reason);
    assert!(deleted
        .events
        .iter()
        .any(|e| e.get("type").and_then(|t| t.as_str()) == Some("ROOM_DELETED")));
}
