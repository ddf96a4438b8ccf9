//! Version-based catch-up for clients: immediate sync and long-poll.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::time::timeout;
use tracing::debug;

use crate::config::app::EngineConfig;
use crate::domain::{DeletionReason, RoomDeleted, RoomSnapshot};
use crate::error::AppError;
use crate::store::{RoomSignal, RoomStore};

#[derive(Debug)]
pub enum SyncOutcome {
    /// The client already holds the latest version.
    Unchanged,
    Snapshot(Box<RoomSnapshot>),
    Deleted(RoomDeleted),
}

impl SyncOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, SyncOutcome::Unchanged)
    }
}

#[derive(Clone)]
pub struct SyncService {
    store: Arc<dyn RoomStore>,
    config: Arc<EngineConfig>,
}

impl SyncService {
    pub fn new(store: Arc<dyn RoomStore>, config: Arc<EngineConfig>) -> Self {
        Self { store, config }
    }

    /// Snapshot if the room moved past `known_version`, else unchanged.
    pub async fn sync(
        &self,
        code: &str,
        viewer: Option<&str>,
        known_version: u64,
    ) -> Result<SyncOutcome, AppError> {
        let Some(room) = self.store.load(code).await? else {
            return self.deleted(code).await.map(SyncOutcome::Deleted);
        };
        if room.version() <= known_version {
            return Ok(SyncOutcome::Unchanged);
        }
        Ok(SyncOutcome::Snapshot(Box::new(RoomSnapshot::for_viewer(
            &room,
            viewer,
            Vec::new(),
        ))))
    }

    /// Like [`sync`](Self::sync), but waits for a change.
    ///
    /// Waits up to `attempts` intervals of the viewer's tier. Each interval
    /// ends early on a commit or deletion signal and re-reads the room
    /// either way. No lock is held while waiting.
    pub async fn poll(
        &self,
        code: &str,
        viewer: Option<&str>,
        last_known_version: u64,
        spectator: bool,
    ) -> Result<SyncOutcome, AppError> {
        let tier = self.config.poll_tier(spectator);
        // Subscribe before the first read so a commit in between is not missed.
        let Some(mut signals) = self.store.subscribe(code) else {
            return self.deleted(code).await.map(SyncOutcome::Deleted);
        };

        let first = self.sync(code, viewer, last_known_version).await?;
        if !first.is_unchanged() {
            return Ok(first);
        }

        for attempt in 1..=tier.attempts {
            match timeout(tier.interval, signals.changed()).await {
                Ok(Ok(())) => {
                    let signal = *signals.borrow_and_update();
                    match signal {
                        RoomSignal::Deleted(reason) => {
                            return Ok(SyncOutcome::Deleted(RoomDeleted::new(
                                reason,
                                OffsetDateTime::now_utc(),
                            )));
                        }
                        RoomSignal::Version(version) if version <= last_known_version => continue,
                        RoomSignal::Version(_) => {}
                    }
                }
                // Sender gone: the room was removed.
                Ok(Err(_)) => return self.deleted(code).await.map(SyncOutcome::Deleted),
                Err(_elapsed) => debug!(room = code, attempt, "Poll interval elapsed"),
            }

            let outcome = self.sync(code, viewer, last_known_version).await?;
            if !outcome.is_unchanged() {
                return Ok(outcome);
            }
        }
        Ok(SyncOutcome::Unchanged)
    }

    /// The terminal result for a code with no room behind it.
    pub async fn deleted(&self, code: &str) -> Result<RoomDeleted, AppError> {
        let reason = self
            .store
            .deletion_reason(code)
            .await?
            .unwrap_or(DeletionReason::NotFound);
        Ok(RoomDeleted::new(reason, OffsetDateTime::now_utc()))
    }
}
