//! Game flow service: runs domain transitions against stored rooms.

use std::sync::Arc;

use crate::config::app::EngineConfig;
use crate::services::deferred::DeferredScheduler;
use crate::store::RoomStore;

mod mutation;
mod player_actions;

pub use mutation::MutationOutcome;

#[derive(Clone)]
pub struct GameFlowService {
    store: Arc<dyn RoomStore>,
    config: Arc<EngineConfig>,
    deferred: DeferredScheduler,
}

impl GameFlowService {
    pub fn new(
        store: Arc<dyn RoomStore>,
        config: Arc<EngineConfig>,
        deferred: DeferredScheduler,
    ) -> Self {
        Self {
            store,
            config,
            deferred,
        }
    }

    pub fn store(&self) -> &dyn RoomStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
