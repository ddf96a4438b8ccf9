use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::app::EngineConfig;
use crate::services::{DeferredScheduler, GameFlowService, RoomService, SyncService};
use crate::store::RoomStore;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Room storage shared by every worker
    pub store: Arc<dyn RoomStore>,
    pub config: Arc<EngineConfig>,
    /// Queue for delayed side effects
    pub deferred: DeferredScheduler,
    /// Cancels the background worker and sweeper
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RoomStore>,
        config: EngineConfig,
        deferred: DeferredScheduler,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            deferred,
            shutdown,
        }
    }

    pub fn game_flow(&self) -> GameFlowService {
        GameFlowService::new(self.store.clone(), self.config.clone(), self.deferred.clone())
    }

    pub fn rooms(&self) -> RoomService {
        RoomService::new(self.game_flow())
    }

    pub fn sync(&self) -> SyncService {
        SyncService::new(self.store.clone(), self.config.clone())
    }
}
