//! Room administration: create, join, leave, delete, host hand-off and
//! heartbeats.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::{Departure, DeletionReason, GameEvent, GameEventKind, Room, RoomDeleted};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::services::game_flow::{GameFlowService, MutationOutcome};

/// Attempts at a join that keeps losing the version race.
const JOIN_ATTEMPTS: usize = 3;

#[derive(Debug)]
pub enum LeaveOutcome {
    Left(MutationOutcome),
    Deleted(RoomDeleted),
}

#[derive(Clone)]
pub struct RoomService {
    flow: GameFlowService,
}

impl RoomService {
    pub fn new(flow: GameFlowService) -> Self {
        Self { flow }
    }

    /// Open a lobby with the creator seated first as host.
    pub async fn create_room(
        &self,
        code: &str,
        player_id: &str,
        player_name: &str,
    ) -> Result<MutationOutcome, AppError> {
        let now = OffsetDateTime::now_utc();
        let room = Room::new(code.to_string(), player_id.to_string(), player_name.to_string(), now);
        self.flow.store().insert(room.clone()).await?;
        info!(room = code, host = player_id, "Room created");

        let joined = GameEvent::new(
            GameEventKind::PlayerJoined,
            Some(player_id),
            serde_json::json!({ "name": player_name, "seat": 1, "isSpectator": false }),
            now,
        );
        Ok(MutationOutcome {
            room,
            events: vec![joined],
        })
    }

    /// Add or refresh a player.
    ///
    /// Two joins can race on the same base version. The loser re-reads the
    /// room; if the player is already there the join counts as done,
    /// otherwise it tries again.
    pub async fn join_room(
        &self,
        code: &str,
        player_id: &str,
        player_name: &str,
        spectator: bool,
    ) -> Result<MutationOutcome, AppError> {
        for attempt in 1..=JOIN_ATTEMPTS {
            let result = self
                .flow
                .run_mutation(code, None, |room, _rng, now| {
                    room.join(player_id, player_name, spectator, now)
                })
                .await;

            match result {
                Err(err) if err.code() == ErrorCode::OptimisticLock => {
                    let room = self.flow.store().require(code).await?;
                    if room.player(player_id).is_some() {
                        debug!(room = code, player_id, "Concurrent join already landed");
                        return Ok(MutationOutcome {
                            room,
                            events: Vec::new(),
                        });
                    }
                    debug!(room = code, player_id, attempt, "Join lost the race; retrying");
                }
                other => return other,
            }
        }

        warn!(room = code, player_id, "Join kept conflicting");
        Err(DomainError::conflict(
            ConflictKind::OptimisticLock,
            "Room is busy; try joining again",
        )
        .into())
    }

    /// Remove a player, deleting the room when the host or the last
    /// player leaves.
    pub async fn leave_room(&self, code: &str, player_id: &str) -> Result<LeaveOutcome, AppError> {
        let mut departure = Departure::Left;
        let outcome = self
            .flow
            .run_mutation(code, None, |room, _rng, now| {
                let (result, events) = room.leave(player_id, now)?;
                departure = result;
                Ok(events)
            })
            .await?;

        match departure {
            Departure::Left => {
                debug!(room = code, player_id, "Player left");
                Ok(LeaveOutcome::Left(outcome))
            }
            Departure::RoomClosed(reason) => {
                self.close(code, reason).await?;
                Ok(LeaveOutcome::Deleted(RoomDeleted::new(
                    reason,
                    OffsetDateTime::now_utc(),
                )))
            }
        }
    }

    /// Explicitly delete a room.
    pub async fn delete_room(&self, code: &str) -> Result<(), AppError> {
        if !self.close(code, DeletionReason::HostLeft).await? {
            return Err(DomainError::room_not_found(code).into());
        }
        Ok(())
    }

    pub async fn resign_host(&self, code: &str, player_id: &str) -> Result<MutationOutcome, AppError> {
        let outcome = self
            .flow
            .run_mutation(code, None, |room, rng, now| room.resign_host(player_id, rng, now))
            .await?;
        info!(room = code, new_host = %outcome.room.host_id, "Host changed");
        Ok(outcome)
    }

    /// Mark a player as seen. Never bumps the version.
    pub async fn heartbeat(&self, code: &str, player_id: &str) -> Result<(), AppError> {
        self.flow
            .store()
            .touch_player(code, player_id, OffsetDateTime::now_utc())
            .await?;
        Ok(())
    }

    async fn close(&self, code: &str, reason: DeletionReason) -> Result<bool, AppError> {
        let existed = self.flow.store().delete(code, reason).await?;
        if existed {
            info!(room = code, reason = reason.as_str(), "Room deleted");
        }
        Ok(existed)
    }
}
