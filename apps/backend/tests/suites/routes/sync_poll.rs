use std::time::Duration;

use actix_web::http::header::IF_NONE_MATCH;
use actix_web::http::StatusCode;
use actix_web::test;
use ono_backend::config::app::PollTier;
use ono_test_support::problem_details::{
    assert_problem_details_from_service_response, assert_room_deleted_from_service_response,
};
use ono_test_support::unique_helpers::unique_room_code;
use serde_json::json;

use crate::common::{etag_of, read_json, version_of};
use crate::support::{create_test_app, test_config};

#[actix_web::test]
async fn sync_answers_no_content_when_current() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = unique_room_code();

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(json!({ "roomCode": code, "playerId": "h", "playerName": "Hana" }))
        .to_request();
    let created = read_json(test::call_service(&app, req).await).await;
    let version = version_of(&created);

    // Ahead of the server counts as current too.
    for known in [version, version + 5] {
        let req = test::TestRequest::post()
            .uri("/sync")
            .set_json(json!({ "roomCode": code, "playerId": "h", "stateVersion": known }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
    Ok(())
}

#[actix_web::test]
async fn sync_returns_the_snapshot_when_behind() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = unique_room_code();

    for (id, uri) in [("h", "/room/create"), ("p", "/room/join")] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({ "roomCode": code, "playerId": id, "playerName": id }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }
    let req = test::TestRequest::post()
        .uri("/game/start")
        .set_json(json!({ "roomCode": code, "playerId": "h" }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    // A spectator-style sync without a player id sees no hands at all.
    let req = test::TestRequest::post()
        .uri("/sync")
        .set_json(json!({ "roomCode": code, "stateVersion": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let etag = etag_of(&resp);
    let body = read_json(resp).await;
    assert_eq!(etag, format!("\"room-{code}-v{}\"", version_of(&body)));
    assert!(body["players"]
        .as_array()
        .expect("players")
        .iter()
        .all(|p| p.get("hand").is_none()));
    assert_eq!(body["events"], json!([]));
    Ok(())
}

#[actix_web::test]
async fn sync_of_unknown_room_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::post()
        .uri("/sync")
        .set_json(json!({ "roomCode": "NEVER1", "stateVersion": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_room_deleted_from_service_response(resp, "NOT_FOUND").await;
    Ok(())
}

#[actix_web::test]
async fn poll_times_out_with_not_modified() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = unique_room_code();

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(json!({ "roomCode": code, "playerId": "h", "playerName": "Hana" }))
        .to_request();
    let version = version_of(&read_json(test::call_service(&app, req).await).await);

    for spectator in [false, true] {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/poll/{code}?playerId=h&lastKnownVersion={version}&isSpectator={spectator}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }
    Ok(())
}

#[actix_web::test]
async fn poll_returns_at_once_when_behind() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = unique_room_code();

    for (id, uri) in [("h", "/room/create"), ("p", "/room/join")] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(json!({ "roomCode": code, "playerId": id, "playerName": id }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/poll/{code}?playerId=p&lastKnownVersion=0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let etag = etag_of(&resp);
    let body = read_json(resp).await;
    assert_eq!(version_of(&body), 1);

    // Same question with the ETag already cached.
    let req = test::TestRequest::get()
        .uri(&format!("/poll/{code}?playerId=p&lastKnownVersion=0"))
        .insert_header((IF_NONE_MATCH, etag.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(etag_of(&resp), etag);
    Ok(())
}

#[actix_web::test]
async fn poll_wakes_on_a_commit() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = test_config();
    config.participant_poll = PollTier {
        interval: Duration::from_millis(500),
        attempts: 10,
    };
    let app = create_test_app().with_config(config).build().await?;
    let code = unique_room_code();

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(json!({ "roomCode": code, "playerId": "h", "playerName": "Hana" }))
        .to_request();
    let version = version_of(&read_json(test::call_service(&app, req).await).await);

    let poll = async {
        let req = test::TestRequest::get()
            .uri(&format!("/poll/{code}?playerId=h&lastKnownVersion={version}"))
            .to_request();
        test::call_service(&app, req).await
    };
    let join = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let req = test::TestRequest::post()
            .uri("/room/join")
            .set_json(json!({ "roomCode": code, "playerId": "p", "playerName": "Pat" }))
            .to_request();
        test::call_service(&app, req).await
    };

    let started = std::time::Instant::now();
    let (polled, joined) = tokio::join!(poll, join);
    assert!(joined.status().is_success());
    assert_eq!(polled.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(5));

    let body = read_json(polled).await;
    assert_eq!(version_of(&body), version + 1);
    assert_eq!(body["players"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[actix_web::test]
async fn poll_reports_a_deleted_room() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = unique_room_code();

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(json!({ "roomCode": code, "playerId": "h", "playerName": "Hana" }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/room/leave")
        .set_json(json!({ "roomCode": code, "playerId": "h" }))
        .to_request();
    assert_room_deleted_from_service_response(test::call_service(&app, req).await, "HOST_LEFT")
        .await;

    let req = test::TestRequest::get()
        .uri(&format!("/poll/{code}?playerId=h&lastKnownVersion=0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_room_deleted_from_service_response(resp, "HOST_LEFT").await;
    Ok(())
}

#[actix_web::test]
async fn poll_rejects_a_malformed_query() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::get()
        .uri("/poll/ABCD?lastKnownVersion=soon")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}
