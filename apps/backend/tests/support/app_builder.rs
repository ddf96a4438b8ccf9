use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use ono_backend::config::app::{EngineConfig, PollTier};
use ono_backend::extractors::JsonBodyLimit;
use ono_backend::infra::state::build_state;
use ono_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use ono_backend::routes;
use ono_backend::state::app_state::AppState;
use ono_backend::store::{MemoryRoomStore, RoomStore};
use ono_backend::AppError;

/// Engine settings for route tests: seeded shuffles and short poll tiers
/// so a long-poll that sees nothing gives up within a few milliseconds.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        shuffle_seed: Some(42),
        participant_poll: PollTier {
            interval: Duration::from_millis(10),
            attempts: 2,
        },
        spectator_poll: PollTier {
            interval: Duration::from_millis(10),
            attempts: 1,
        },
        ..EngineConfig::default()
    }
}

/// Builder for creating test Actix service instances.
///
/// Background tasks stay off: deferred penalties and cleanups are exercised
/// by the service tests, not through HTTP.
pub struct TestAppBuilder {
    config: EngineConfig,
    store: Arc<MemoryRoomStore>,
    body_limit: usize,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            store: Arc::new(MemoryRoomStore::new()),
            body_limit: 16 * 1024,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a store with the test so it can inspect or rig rooms.
    pub fn with_store(mut self, store: Arc<MemoryRoomStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub async fn build_state(&self) -> Result<AppState, AppError> {
        let store: Arc<dyn RoomStore> = self.store.clone();
        build_state()
            .with_config(self.config.clone())
            .with_store(store)
            .without_background()
            .build()
            .await
    }

    /// Build the test service with production routes and tracing middleware.
    pub async fn build(
        self,
    ) -> Result<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>, AppError>
    {
        let state = self.build_state().await?;

        // Wrap AppState with web::Data at the boundary
        let data = web::Data::new(state);
        let body_limit = web::Data::new(JsonBodyLimit(self.body_limit));

        let service = test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(data)
                .app_data(body_limit)
                .configure(routes::configure),
        )
        .await;

        Ok(service)
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new test app builder.
///
/// # Example
/// ```rust,ignore
/// let app = create_test_app().build().await?;
/// ```
pub fn create_test_app() -> TestAppBuilder {
    TestAppBuilder::new()
}
