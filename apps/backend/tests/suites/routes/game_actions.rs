use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use ono_backend::domain::Card;
use ono_backend::domain::Color::{Blue, Green, Red, Yellow};
use ono_backend::store::{MemoryRoomStore, RoomStore};
use ono_test_support::problem_details::assert_problem_details_from_service_response;
use ono_test_support::unique_helpers::unique_room_code;
use serde_json::{json, Value};

use crate::common::{etag_of, read_json, version_of};
use crate::support::{card_json, create_test_app, rig_room};

async fn post<S>(app: &S, uri: &str, body: Value, if_match: Option<&str>) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut req = test::TestRequest::post().uri(uri).set_json(body);
    if let Some(etag) = if_match {
        req = req.insert_header(("If-Match", etag));
    }
    test::call_service(app, req.to_request()).await
}

/// Lobby with host `h` and player `p`.
async fn lobby<S>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let code = unique_room_code();
    for (id, uri) in [("h", "/room/create"), ("p", "/room/join")] {
        let resp = post(
            app,
            uri,
            json!({ "roomCode": code, "playerId": id, "playerName": id }),
            None,
        )
        .await;
        assert!(resp.status().is_success());
    }
    code
}

/// Started game rigged so `h` holds green 5, green 2, blue 9 and a wild,
/// on a yellow 5, with `h` to act. Returns the room ETag.
async fn rigged_game<S>(app: &S, store: &MemoryRoomStore, code: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post(app, "/game/start", json!({ "roomCode": code, "playerId": "h" }), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let etag = etag_of(&resp);

    rig_room(
        store,
        code,
        &[
            (
                "h",
                vec![
                    Card::Number(Green, 5),
                    Card::Number(Green, 2),
                    Card::Number(Blue, 9),
                    Card::Wild,
                ],
            ),
            (
                "p",
                vec![Card::Number(Blue, 1), Card::Number(Red, 3), Card::Skip(Blue)],
            ),
        ],
        Card::Number(Yellow, 5),
        Yellow,
        "h",
    )
    .await;
    etag
}

#[actix_web::test]
async fn start_requires_the_host_and_two_players() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;

    let solo = unique_room_code();
    let resp = post(
        &app,
        "/room/create",
        json!({ "roomCode": solo, "playerId": "h", "playerName": "Hana" }),
        None,
    )
    .await;
    assert!(resp.status().is_success());
    let resp = post(&app, "/game/start", json!({ "roomCode": solo, "playerId": "h" }), None).await;
    assert_problem_details_from_service_response(
        resp,
        "NOT_ENOUGH_PLAYERS",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;

    let code = lobby(&app).await;
    let resp = post(&app, "/game/start", json!({ "roomCode": code, "playerId": "p" }), None).await;
    assert_problem_details_from_service_response(resp, "NOT_HOST", StatusCode::FORBIDDEN, None)
        .await;
    Ok(())
}

#[actix_web::test]
async fn start_deals_and_scopes_hands_to_the_viewer() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app().build().await?;
    let code = lobby(&app).await;

    let resp = post(&app, "/game/start", json!({ "roomCode": code, "playerId": "h" }), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;

    assert_eq!(body["room"]["status"], "playing");
    let game = &body["gameState"];
    assert_eq!(game["discardPile"].as_array().map(Vec::len), Some(1));
    assert_eq!(game["turnOrder"], json!(["h", "p"]));
    assert!(game["activeColor"].is_string());

    let players = body["players"].as_array().expect("players");
    let host = &players[0];
    let guest = &players[1];
    assert_eq!(host["hand"].as_array().map(Vec::len), host["cardCount"].as_u64().map(|n| n as usize));
    assert!(guest.get("hand").is_none());
    assert_eq!(guest["cardCount"], 7);

    let dealt: u64 = players.iter().filter_map(|p| p["cardCount"].as_u64()).sum();
    let draw = game["drawPileCount"].as_u64().expect("drawPileCount");
    assert_eq!(dealt + draw + 1, 108);
    Ok(())
}

#[actix_web::test]
async fn stale_if_match_is_a_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryRoomStore::new());
    let app = create_test_app().with_store(store.clone()).build().await?;
    let code = lobby(&app).await;
    let etag = rigged_game(&app, &store, &code).await;
    let before = store.require(&code).await?.version();

    let stale = format!("\"room-{code}-v{}\"", before - 1);
    let resp = post(
        &app,
        "/game/play",
        json!({ "roomCode": code, "playerId": "h", "card": card_json(Card::Number(Green, 5)) }),
        Some(&stale),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "OPTIMISTIC_LOCK",
        StatusCode::CONFLICT,
        None,
    )
    .await;
    assert_eq!(store.require(&code).await?.version(), before);

    let resp = post(
        &app,
        "/game/play",
        json!({ "roomCode": code, "playerId": "h", "card": card_json(Card::Number(Green, 5)) }),
        Some(&etag),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(etag_of(&resp), format!("\"room-{code}-v{}\"", before + 1));
    Ok(())
}

#[actix_web::test]
async fn malformed_if_match_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryRoomStore::new());
    let app = create_test_app().with_store(store.clone()).build().await?;
    let code = lobby(&app).await;
    rigged_game(&app, &store, &code).await;

    let resp = post(
        &app,
        "/game/draw",
        json!({ "roomCode": code, "playerId": "h" }),
        Some("\"version-seven\""),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_HEADER",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn rejected_moves_leave_the_room_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryRoomStore::new());
    let app = create_test_app().with_store(store.clone()).build().await?;
    let code = lobby(&app).await;
    rigged_game(&app, &store, &code).await;
    let before = store.require(&code).await?;

    let cases: Vec<(&str, Value, &str, StatusCode)> = vec![
        (
            "p",
            json!({ "card": card_json(Card::Number(Blue, 1)) }),
            "OUT_OF_TURN",
            StatusCode::FORBIDDEN,
        ),
        (
            "h",
            json!({ "card": card_json(Card::Number(Red, 7)) }),
            "CARD_NOT_IN_HAND",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            "h",
            json!({ "card": card_json(Card::Number(Blue, 9)) }),
            "ILLEGAL_MOVE",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            "h",
            json!({ "card": card_json(Card::Wild) }),
            "WILD_COLOR_REQUIRED",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        ("h", json!({}), "MISSING_FIELD", StatusCode::BAD_REQUEST),
    ];

    for (player, extra, code_expected, status) in cases {
        let mut body = json!({ "roomCode": code, "playerId": player });
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            target.extend(fields.clone());
        }
        let resp = post(&app, "/game/play", body, None).await;
        assert_problem_details_from_service_response(resp, code_expected, status, None).await;
    }

    let resp = post(&app, "/game/uno", json!({ "roomCode": code, "playerId": "h" }), None).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_UNO_CALL",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;

    assert_eq!(store.require(&code).await?, before);
    Ok(())
}

#[actix_web::test]
async fn wild_play_records_the_chosen_color() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryRoomStore::new());
    let app = create_test_app().with_store(store.clone()).build().await?;
    let code = lobby(&app).await;
    rigged_game(&app, &store, &code).await;

    let resp = post(
        &app,
        "/game/play",
        json!({
            "roomCode": code,
            "playerId": "h",
            "card": card_json(Card::Wild),
            "chosenColor": "blue",
        }),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;

    let game = &body["gameState"];
    assert_eq!(game["activeColor"], "blue");
    assert_eq!(game["pendingWildColorChoice"], "blue");
    assert_eq!(game["lastPlayedCard"]["type"], "wild");
    assert_eq!(game["currentTurnPlayerId"], "p");
    assert!(game["lastPlayedCardAnimationId"].is_string());

    let kinds: Vec<&str> = body["events"]
        .as_array()
        .expect("events")
        .iter()
        .filter_map(|e| e["type"].as_str())
        .collect();
    assert!(kinds.contains(&"CARD_PLAYED"));
    assert!(kinds.contains(&"WILD_COLOR_CHOSEN"));
    assert!(kinds.contains(&"TURN_ADVANCED"));
    Ok(())
}

#[actix_web::test]
async fn actions_on_a_vanished_room_report_the_deletion() -> Result<(), Box<dyn std::error::Error>>
{
    let app = create_test_app().build().await?;

    let resp = post(&app, "/game/draw", json!({ "roomCode": "GONE2", "playerId": "h" }), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["type"], "ROOM_DELETED");
    assert_eq!(body["reason"], "NOT_FOUND");
    Ok(())
}

#[actix_web::test]
async fn versions_only_grow() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryRoomStore::new());
    let app = create_test_app().with_store(store.clone()).build().await?;
    let code = lobby(&app).await;
    rigged_game(&app, &store, &code).await;

    let mut last = store.require(&code).await?.version();
    let steps = [
        ("h", "/game/play", Some(card_json(Card::Number(Green, 5)))),
        ("p", "/game/draw", None),
        ("h", "/game/draw", None),
        ("p", "/game/pass", None),
    ];
    for (player, uri, card) in steps {
        let mut body = json!({ "roomCode": code, "playerId": player });
        if let Some(card) = card {
            body["card"] = card;
        }
        let resp = post(&app, uri, body, None).await;
        assert_eq!(resp.status(), StatusCode::OK, "{player} {uri}");
        let version = version_of(&read_json(resp).await);
        assert_eq!(version, last + 1, "{player} {uri}");
        last = version;
    }
    Ok(())
}
