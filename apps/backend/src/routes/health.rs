use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    app_version: String,
    store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_error: Option<String>,
    rooms: usize,
    time: String,
}

/// GET / - service index.
async fn index() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "service": "ONO Game API",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "createRoom": "POST /room/create",
            "joinRoom": "POST /room/join",
            "leaveRoom": "POST /room/leave",
            "deleteRoom": "DELETE /room/{code}",
            "resignHost": "POST /room/resign-host",
            "startGame": "POST /game/start",
            "playCard": "POST /game/play",
            "drawCard": "POST /game/draw",
            "callUno": "POST /game/uno",
            "passTurn": "POST /game/pass",
            "sync": "POST /sync",
            "poll": "GET /poll/{code}",
            "heartbeat": "POST /heartbeat",
        },
    })))
}

/// GET /health
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (store, store_error, rooms) = match app_state.store.room_count().await {
        Ok(count) => ("ok".to_string(), None, count),
        Err(e) => ("error".to_string(), Some(e.to_string()), 0),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        store,
        store_error,
        rooms,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health));
}
