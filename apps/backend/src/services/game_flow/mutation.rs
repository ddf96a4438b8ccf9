use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::{derive_transition_events, GameEvent, Room, RoomStatus, ShuffleRng};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::services::deferred::DeferredTask;
use crate::services::game_flow::GameFlowService;

#[derive(Debug)]
pub struct MutationOutcome {
    /// The room as committed.
    pub room: Room,
    pub events: Vec<GameEvent>,
}

impl MutationOutcome {
    pub fn final_version(&self) -> u64 {
        self.room.version()
    }
}

impl GameFlowService {
    /// Load `code`, apply `mutation` to a copy and commit it if the version
    /// is still the one that was read.
    ///
    /// With `expected_version` set, a room already past that version is
    /// rejected before the mutation runs. A mutation that leaves the version
    /// unchanged commits nothing.
    pub async fn run_mutation<F>(
        &self,
        code: &str,
        expected_version: Option<u64>,
        mutation: F,
    ) -> Result<MutationOutcome, AppError>
    where
        F: FnOnce(&mut Room, &mut ShuffleRng, OffsetDateTime) -> Result<Vec<GameEvent>, DomainError>,
    {
        let before = self.store.require(code).await?;
        let old_version = before.version();

        if let Some(expected) = expected_version {
            if expected != old_version {
                return Err(DomainError::optimistic_lock(expected, old_version).into());
            }
        }

        let now = OffsetDateTime::now_utc();
        let mut rng = self.config.rng_for(code, old_version);
        let mut after = before.clone();
        let mut events = mutation(&mut after, &mut rng, now)?;

        if after.version() == old_version {
            return Ok(MutationOutcome { room: after, events });
        }

        self.store.commit(after.clone(), old_version).await?;
        debug!(room = code, old_version, new_version = after.version(), "Room committed");

        events.extend(derive_transition_events(&before, &after, now));
        self.schedule_follow_ups(&before, &after, now);

        Ok(MutationOutcome { room: after, events })
    }

    fn schedule_follow_ups(&self, before: &Room, after: &Room, now: OffsetDateTime) {
        for (player_id, due_at) in &after.game.uno_deadlines {
            if before.game.uno_deadlines.get(player_id) == Some(due_at) {
                continue;
            }
            let delay = (*due_at - now).max(time::Duration::ZERO).unsigned_abs();
            self.deferred.schedule(
                delay,
                DeferredTask::UnoPenalty {
                    room_code: after.code.clone(),
                    player_id: player_id.clone(),
                    due_at: *due_at,
                },
            );
        }

        if before.status != RoomStatus::Finished && after.status == RoomStatus::Finished {
            info!(
                room = %after.code,
                winner = after.game.winner.as_deref().unwrap_or("-"),
                "Game finished"
            );
            self.deferred.schedule(
                self.config.cleanup_delay,
                DeferredTask::RoomCleanup {
                    room_code: after.code.clone(),
                },
            );
        }
    }
}
