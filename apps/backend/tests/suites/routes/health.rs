use actix_web::test;

use crate::common::read_json;
use crate::support::create_test_app;

#[actix_web::test]
async fn index_lists_the_endpoints() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body = read_json(resp).await;
    assert_eq!(body["service"], "ONO Game API");
    assert_eq!(body["status"], "online");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["poll"], "GET /poll/{code}");
    Ok(())
}

#[actix_web::test]
async fn health_reports_room_count() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let req = test::TestRequest::post()
        .uri("/room/create")
        .set_json(serde_json::json!({
            "roomCode": "HLTH1",
            "playerId": "h",
            "playerName": "Host",
        }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());

    let body = read_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "ok");
    assert_eq!(body["rooms"], 1);
    assert!(body.get("storeError").is_none());
    assert!(body["time"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}
