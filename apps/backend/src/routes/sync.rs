//! Catch-up routes: sync, long-poll and heartbeat.

use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::{deleted_response, mutation_response, record_room, PlayerActionRequest};
use crate::domain::RoomSnapshot;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::http::etag::{if_none_match_hits, room_etag};
use crate::services::{require_room_code, SyncOutcome};
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncRequest {
    pub room_code: String,
    pub player_id: Option<String>,
    pub state_version: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PollQuery {
    pub player_id: Option<String>,
    pub last_known_version: u64,
    pub is_spectator: bool,
}

fn snapshot_with_etag(snapshot: &RoomSnapshot) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((ETAG, room_etag(&snapshot.room.code, snapshot.state_version)))
        .json(snapshot)
}

fn viewer(player_id: &Option<String>) -> Option<&str> {
    player_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

/// POST /sync
///
/// 204 when the client is current, otherwise the snapshot.
async fn sync(
    body: ValidatedJson<SyncRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = require_room_code(&body.room_code)?;
    record_room(&code);

    let outcome = app_state
        .sync()
        .sync(&code, viewer(&body.player_id), body.state_version)
        .await?;
    Ok(match outcome {
        SyncOutcome::Unchanged => HttpResponse::NoContent().finish(),
        SyncOutcome::Snapshot(snapshot) => snapshot_with_etag(&snapshot),
        SyncOutcome::Deleted(deleted) => deleted_response(&deleted),
    })
}

/// GET /poll/{code}
///
/// Waits for a version past `lastKnownVersion`; 304 if none arrives in
/// time. An `If-None-Match` naming the current version also answers 304.
async fn poll(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PollQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = require_room_code(&path.into_inner())?;
    record_room(&code);

    let outcome = app_state
        .sync()
        .poll(
            &code,
            viewer(&query.player_id),
            query.last_known_version,
            query.is_spectator,
        )
        .await?;

    Ok(match outcome {
        SyncOutcome::Unchanged => HttpResponse::NotModified().finish(),
        SyncOutcome::Snapshot(snapshot) => {
            let etag = room_etag(&snapshot.room.code, snapshot.state_version);
            let cached = req
                .headers()
                .get(IF_NONE_MATCH)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| if_none_match_hits(value, &etag));
            if cached {
                HttpResponse::NotModified().insert_header((ETAG, etag)).finish()
            } else {
                snapshot_with_etag(&snapshot)
            }
        }
        SyncOutcome::Deleted(deleted) => deleted_response(&deleted),
    })
}

/// POST /heartbeat
async fn heartbeat(
    body: ValidatedJson<PlayerActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    match app_state.rooms().heartbeat(&code, player_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(err) if err.code() == ErrorCode::RoomNotFound => {
            mutation_response(&app_state, &code, player_id, Err(err)).await
        }
        Err(err) => Err(err),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sync", web::post().to(sync))
        .route("/poll/{code}", web::get().to(poll))
        .route("/heartbeat", web::post().to(heartbeat));
}

