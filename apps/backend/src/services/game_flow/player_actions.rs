use tracing::{debug, info};

use super::{GameFlowService, MutationOutcome};
use crate::domain::{Card, Color};
use crate::error::AppError;

impl GameFlowService {
    /// Deal and open the game. Host only.
    pub async fn start_game(
        &self,
        code: &str,
        player_id: &str,
        expected_version: Option<u64>,
    ) -> Result<MutationOutcome, AppError> {
        let outcome = self
            .run_mutation(code, expected_version, |room, rng, now| {
                room.start_game(player_id, rng, now)
            })
            .await?;
        info!(
            room = code,
            players = outcome.room.turn_order().len(),
            "Game started"
        );
        Ok(outcome)
    }

    pub async fn play_card(
        &self,
        code: &str,
        player_id: &str,
        card: Card,
        chosen_color: Option<Color>,
        expected_version: Option<u64>,
    ) -> Result<MutationOutcome, AppError> {
        debug!(room = code, player_id, %card, ?chosen_color, "Playing card");
        let rules = self.config().rules;
        self.run_mutation(code, expected_version, |room, rng, now| {
            room.play_card(player_id, card, chosen_color, &rules, rng, now)
        })
        .await
    }

    pub async fn draw_card(
        &self,
        code: &str,
        player_id: &str,
        expected_version: Option<u64>,
    ) -> Result<MutationOutcome, AppError> {
        debug!(room = code, player_id, "Drawing");
        self.run_mutation(code, expected_version, |room, rng, now| {
            room.draw(player_id, rng, now)
        })
        .await
    }

    pub async fn call_uno(
        &self,
        code: &str,
        player_id: &str,
        expected_version: Option<u64>,
    ) -> Result<MutationOutcome, AppError> {
        debug!(room = code, player_id, "Calling UNO");
        self.run_mutation(code, expected_version, |room, _rng, now| {
            room.call_uno(player_id, now)
        })
        .await
    }

    pub async fn pass_turn(
        &self,
        code: &str,
        player_id: &str,
        expected_version: Option<u64>,
    ) -> Result<MutationOutcome, AppError> {
        debug!(room = code, player_id, "Passing turn");
        self.run_mutation(code, expected_version, |room, rng, now| {
            room.pass_turn(player_id, rng, now)
        })
        .await
    }
}
