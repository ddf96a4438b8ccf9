use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test;
use ono_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use crate::support::create_test_app;

#[actix_web::test]
async fn malformed_json_is_a_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::post()
        .uri("/room/create")
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{\"roomCode\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );
    assert_problem_details_from_service_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None)
        .await;
    Ok(())
}

#[actix_web::test]
async fn empty_body_is_a_missing_field() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::post()
        .uri("/game/draw")
        .insert_header((CONTENT_TYPE, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "MISSING_FIELD",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn oversized_body_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().with_body_limit(64).build().await?;

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(json!({
            "roomCode": "ABCD",
            "playerId": "h",
            "playerName": "x".repeat(200),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("exceeds 64 bytes"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn blank_player_id_names_the_field() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::post()
        .uri("/game/pass")
        .set_json(json!({ "roomCode": "ABCD", "playerId": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "MISSING_FIELD",
        StatusCode::BAD_REQUEST,
        Some("playerId"),
    )
    .await;
    Ok(())
}
