//! Delayed side effects: the UNO-call penalty, post-win room cleanup and
//! the idle-room sweeper.
//!
//! A task carries only what it needs to find its target. When it fires it
//! re-reads the room and re-checks its precondition; a task whose
//! precondition no longer holds is discarded.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::app::EngineConfig;
use crate::domain::{shuffle_rng, DeletionReason, PlayerId, RoomStatus};
use crate::errors::domain::DomainError;
use crate::store::RoomStore;

/// Attempts at committing a penalty when other writers keep winning.
const PENALTY_COMMIT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Penalize `player_id` if they still hold one uncalled card at `due_at`.
    UnoPenalty {
        room_code: String,
        player_id: PlayerId,
        due_at: OffsetDateTime,
    },
    /// Delete a finished room.
    RoomCleanup { room_code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Applied,
    Discarded,
}

#[derive(Debug)]
struct Scheduled {
    delay: Duration,
    task: DeferredTask,
}

/// Handle for queueing deferred tasks. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DeferredScheduler {
    tx: mpsc::UnboundedSender<Scheduled>,
}

/// Receiving end, consumed by [`spawn_worker`].
#[derive(Debug)]
pub struct DeferredQueue {
    rx: mpsc::UnboundedReceiver<Scheduled>,
}

impl DeferredScheduler {
    pub fn channel() -> (Self, DeferredQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, DeferredQueue { rx })
    }

    pub fn schedule(&self, delay: Duration, task: DeferredTask) {
        debug!(?task, delay_ms = delay.as_millis() as u64, "Scheduling deferred task");
        if let Err(err) = self.tx.send(Scheduled { delay, task }) {
            warn!(task = ?err.0.task, "Deferred worker is gone; task dropped");
        }
    }
}

/// Run queued tasks after their delay until `shutdown` fires.
pub fn spawn_worker(
    mut queue: DeferredQueue,
    store: Arc<dyn RoomStore>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let scheduled = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                next = queue.rx.recv() => match next {
                    Some(scheduled) => scheduled,
                    None => break,
                },
            };

            let store = store.clone();
            let token = shutdown.child_token();
            tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = tokio::time::sleep(scheduled.delay) => {
                        let task = scheduled.task;
                        match fire(store.as_ref(), &task).await {
                            Ok(outcome) => debug!(?task, ?outcome, "Deferred task finished"),
                            Err(err) => warn!(?task, error = %err, "Deferred task failed"),
                        }
                    }
                }
            });
        }
        debug!("Deferred worker stopped");
    })
}

/// Execute one task against the current state of its room.
pub async fn fire(store: &dyn RoomStore, task: &DeferredTask) -> Result<TaskOutcome, DomainError> {
    match task {
        DeferredTask::UnoPenalty {
            room_code,
            player_id,
            due_at,
        } => enforce_uno_penalty(store, room_code, player_id, *due_at).await,
        DeferredTask::RoomCleanup { room_code } => cleanup_finished(store, room_code).await,
    }
}

async fn enforce_uno_penalty(
    store: &dyn RoomStore,
    room_code: &str,
    player_id: &str,
    due_at: OffsetDateTime,
) -> Result<TaskOutcome, DomainError> {
    for _ in 0..PENALTY_COMMIT_ATTEMPTS {
        let Some(room) = store.load(room_code).await? else {
            return Ok(TaskOutcome::Discarded);
        };
        // The timer may fire a hair early relative to the wall clock.
        let now = OffsetDateTime::now_utc().max(due_at);
        let mut next = room.clone();
        let mut rng = shuffle_rng(None);
        if next.enforce_uno_penalty(player_id, &mut rng, now)?.is_none() {
            return Ok(TaskOutcome::Discarded);
        }

        match store.commit(next, room.version()).await {
            Ok(()) => {
                info!(room = room_code, player_id, "UNO penalty applied");
                return Ok(TaskOutcome::Applied);
            }
            Err(err) if err.is_optimistic_lock() => continue,
            Err(err) if err.is_room_missing() => return Ok(TaskOutcome::Discarded),
            Err(err) => return Err(err),
        }
    }
    warn!(room = room_code, player_id, "UNO penalty lost the race repeatedly");
    Ok(TaskOutcome::Discarded)
}

async fn cleanup_finished(store: &dyn RoomStore, room_code: &str) -> Result<TaskOutcome, DomainError> {
    match store.load(room_code).await? {
        Some(room) if room.status == RoomStatus::Finished => {
            if store.delete(room_code, DeletionReason::GameFinished).await? {
                info!(room = room_code, "Finished room deleted");
                return Ok(TaskOutcome::Applied);
            }
            Ok(TaskOutcome::Discarded)
        }
        _ => Ok(TaskOutcome::Discarded),
    }
}

/// Delete rooms idle for longer than `idle_ttl` and forget old tombstones.
pub async fn sweep_idle(
    store: &dyn RoomStore,
    idle_ttl: Duration,
    now: OffsetDateTime,
) -> Result<usize, DomainError> {
    let cutoff = now - idle_ttl;
    let mut removed = 0;
    for code in store.stale_rooms(cutoff).await? {
        // Re-check under the current state; the room may have woken up.
        let still_idle = store
            .load(&code)
            .await?
            .is_some_and(|room| room.last_activity() < cutoff);
        if still_idle && store.delete(&code, DeletionReason::Idle).await? {
            info!(room = %code, "Idle room deleted");
            removed += 1;
        }
    }
    store.purge_tombstones(cutoff).await?;
    Ok(removed)
}

pub fn spawn_idle_sweeper(
    store: Arc<dyn RoomStore>,
    config: &EngineConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let idle_ttl = config.idle_ttl;
    let period = config.sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    match sweep_idle(store.as_ref(), idle_ttl, OffsetDateTime::now_utc()).await {
                        Ok(0) => {}
                        Ok(removed) => debug!(removed, "Idle sweep complete"),
                        Err(err) => warn!(error = %err, "Idle sweep failed"),
                    }
                }
            }
        }
        debug!("Idle sweeper stopped");
    })
}
