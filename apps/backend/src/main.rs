use actix_web::{web, App, HttpServer};
use ono_backend::config::app::Config;
use ono_backend::extractors::JsonBodyLimit;
use ono_backend::infra::state::build_state;
use ono_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use ono_backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_config(config.engine.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    let shutdown = app_state.shutdown.clone();

    info!(host = %config.host, port = config.port, "Starting ONO backend");

    let data = web::Data::new(app_state);
    let body_limit = web::Data::new(JsonBodyLimit(config.max_json_payload));
    let cors_origins = config.cors_origins.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(body_limit.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    shutdown.cancel();
    info!("Server stopped");
    result
}
