//! Game action routes under `/game`.
//!
//! Every action accepts an optional `If-Match` room ETag; a stale one is
//! rejected with 409 before anything changes.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{mutation_response, PlayerActionRequest};
use crate::domain::{Card, Color};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::extractors::{IfMatch, ValidatedJson};
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayCardRequest {
    pub room_code: String,
    pub player_id: String,
    pub card: Option<Card>,
    pub chosen_color: Option<Color>,
}

/// POST /game/start
async fn start_game(
    body: ValidatedJson<PlayerActionRequest>,
    if_match: IfMatch,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    let result = app_state
        .game_flow()
        .start_game(&code, player_id, if_match.expected_version())
        .await;
    mutation_response(&app_state, &code, player_id, result).await
}

/// POST /game/play
async fn play_card(
    body: ValidatedJson<PlayCardRequest>,
    if_match: IfMatch,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = PlayerActionRequest {
        room_code: body.room_code.clone(),
        player_id: body.player_id.clone(),
    };
    let (code, player_id) = request.parse()?;
    let card = body.card.ok_or_else(|| {
        DomainError::validation(ValidationKind::MissingField, "card is required")
    })?;

    let result = app_state
        .game_flow()
        .play_card(&code, player_id, card, body.chosen_color, if_match.expected_version())
        .await;
    mutation_response(&app_state, &code, player_id, result).await
}

/// POST /game/draw
async fn draw_card(
    body: ValidatedJson<PlayerActionRequest>,
    if_match: IfMatch,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    let result = app_state
        .game_flow()
        .draw_card(&code, player_id, if_match.expected_version())
        .await;
    mutation_response(&app_state, &code, player_id, result).await
}

/// POST /game/uno
async fn call_uno(
    body: ValidatedJson<PlayerActionRequest>,
    if_match: IfMatch,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    let result = app_state
        .game_flow()
        .call_uno(&code, player_id, if_match.expected_version())
        .await;
    mutation_response(&app_state, &code, player_id, result).await
}

/// POST /game/pass
async fn pass_turn(
    body: ValidatedJson<PlayerActionRequest>,
    if_match: IfMatch,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (code, player_id) = body.parse()?;
    let result = app_state
        .game_flow()
        .pass_turn(&code, player_id, if_match.expected_version())
        .await;
    mutation_response(&app_state, &code, player_id, result).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/start", web::post().to(start_game))
        .route("/play", web::post().to(play_card))
        .route("/draw", web::post().to(draw_card))
        .route("/uno", web::post().to(call_uno))
        .route("/pass", web::post().to(pass_turn));
}
