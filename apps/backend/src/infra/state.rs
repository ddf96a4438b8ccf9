use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::app::EngineConfig;
use crate::error::AppError;
use crate::services::deferred::{spawn_idle_sweeper, spawn_worker, DeferredScheduler};
use crate::state::app_state::AppState;
use crate::store::{MemoryRoomStore, RoomStore};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn RoomStore>>,
    background: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: None,
            background: true,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RoomStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Skip the deferred worker and idle sweeper. Scheduled tasks are dropped.
    pub fn without_background(mut self) -> Self {
        self.background = false;
        self
    }

    /// Must run inside a Tokio runtime when background tasks are enabled.
    pub async fn build(self) -> Result<AppState, AppError> {
        if self.config.participant_poll.attempts == 0 || self.config.spectator_poll.attempts == 0 {
            return Err(AppError::config("Poll attempts must be at least 1"));
        }

        let store: Arc<dyn RoomStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryRoomStore::new()),
        };
        let shutdown = CancellationToken::new();
        let (deferred, queue) = DeferredScheduler::channel();

        if self.background {
            spawn_worker(queue, store.clone(), shutdown.clone());
            spawn_idle_sweeper(store.clone(), &self.config, shutdown.clone());
            info!(
                idle_ttl_secs = self.config.idle_ttl.as_secs(),
                sweep_interval_secs = self.config.sweep_interval.as_secs(),
                "Background tasks started"
            );
        }

        Ok(AppState::new(store, self.config, deferred, shutdown))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
