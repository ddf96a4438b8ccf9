use actix_web::http::header::ETAG;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::{GameEvent, Room, RoomDeleted, RoomSnapshot};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::http::etag::room_etag;
use crate::services::{require_field, require_room_code, MutationOutcome};
use crate::state::app_state::AppState;

pub mod games;
pub mod health;
pub mod rooms;
pub mod sync;

/// Configure every application route.
///
/// `main.rs` wraps the app in CORS and the tracing middleware; tests
/// register the same routes with only the tracing middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::invalid(ErrorCode::BadRequest, err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::invalid(ErrorCode::BadRequest, err.to_string()).into()
    }));

    cfg.configure(health::configure_routes)
        .service(web::scope("/room").configure(rooms::configure_routes))
        .service(web::scope("/game").configure(games::configure_routes))
        .configure(sync::configure_routes);
}

/// Body shared by every action that names only a room and a player.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerActionRequest {
    pub room_code: String,
    pub player_id: String,
}

impl PlayerActionRequest {
    /// Canonical room code and trimmed player id.
    pub fn parse(&self) -> Result<(String, &str), AppError> {
        let code = require_room_code(&self.room_code)?;
        let player_id = require_field("playerId", &self.player_id)?;
        record_room(&code);
        Ok((code, player_id))
    }
}

/// Attach the room code to the current request span.
pub(crate) fn record_room(code: &str) {
    tracing::Span::current().record("room", code);
}

/// 200 with the viewer's snapshot and the room ETag.
pub(crate) fn snapshot_response(
    room: &Room,
    viewer: Option<&str>,
    events: Vec<GameEvent>,
) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((ETAG, room_etag(&room.code, room.version())))
        .json(RoomSnapshot::for_viewer(room, viewer, events))
}

pub(crate) fn deleted_response(deleted: &RoomDeleted) -> HttpResponse {
    HttpResponse::Ok().json(deleted)
}

/// Render a mutation result. A room that vanished underneath the action
/// answers with the terminal deleted body rather than an error.
pub(crate) async fn mutation_response(
    state: &AppState,
    code: &str,
    viewer: &str,
    result: Result<MutationOutcome, AppError>,
) -> Result<HttpResponse, AppError> {
    match result {
        Ok(outcome) => Ok(snapshot_response(&outcome.room, Some(viewer), outcome.events)),
        Err(err) if err.code() == ErrorCode::RoomNotFound => {
            let deleted = state.sync().deleted(code).await?;
            Ok(deleted_response(&deleted))
        }
        Err(err) => Err(err),
    }
}
