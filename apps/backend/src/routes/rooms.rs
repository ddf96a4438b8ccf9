//! Room administration routes under `/room`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::{
    deleted_response, mutation_response, record_room, snapshot_response, PlayerActionRequest,
};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::{require_field, require_room_code, LeaveOutcome};
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_code: String,
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_code: String,
    pub player_id: String,
    pub player_name: String,
    pub spectator: bool,
}

/// POST /room/create
async fn create_room(
    body: ValidatedJson<CreateRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = require_room_code(&body.room_code)?;
    let player_id = require_field("playerId", &body.player_id)?;
    let player_name = require_field("playerName", &body.player_name)?;
    record_room(&code);

    let outcome = app_state
        .rooms()
        .create_room(&code, player_id, player_name)
        .await?;
    Ok(snapshot_response(&outcome.room, Some(player_id), outcome.events))
}

/// POST /room/join
///
/// Unlike the game actions, joining a missing room is a plain 404.
async fn join_room(
    body: ValidatedJson<JoinRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = require_room_code(&body.room_code)?;
    let player_id = require_field("playerId", &body.player_id)?;
    let player_name = require_field("playerName", &body.player_name)?;
    record_room(&code);

    let outcome = app_state
        .rooms()
        .join_room(&code, player_id, player_name, body.spectator)
        .await?;
    Ok(snapshot_response(&outcome.room, Some(player_id), outcome.events))
}

/// POST /room/leave
async fn leave_room(
    body: ValidatedJson<PlayerActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    match app_state.rooms().leave_room(&code, player_id).await {
        Ok(LeaveOutcome::Left(outcome)) => {
            Ok(snapshot_response(&outcome.room, Some(player_id), outcome.events))
        }
        Ok(LeaveOutcome::Deleted(deleted)) => Ok(deleted_response(&deleted)),
        Err(err) => mutation_response(&app_state, &code, player_id, Err(err)).await,
    }
}

/// DELETE /room/{code}
async fn delete_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = require_room_code(&path.into_inner())?;
    record_room(&code);
    app_state.rooms().delete_room(&code).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// POST /room/resign-host
async fn resign_host(
    body: ValidatedJson<PlayerActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    let result = app_state.rooms().resign_host(&code, player_id).await;
    mutation_response(&app_state, &code, player_id, result).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create_room))
        .route("/join", web::post().to(join_room))
        .route("/leave", web::post().to(leave_room))
        .route("/resign-host", web::post().to(resign_host))
        .route("/{code}", web::delete().to(delete_room));
}
