//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{load_catalog, FileKeyValueStore, SimulatedOtpAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use college_path_core::{KeyValueStore, MemoryKeyValueStore, SessionStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Load the Static Catalog ---
    let catalog = Arc::new(load_catalog(&config.catalog_path)?);

    // --- 3. Hydrate the Session Store ---
    let backend: Box<dyn KeyValueStore> = if config.uses_in_memory_state() {
        info!("Using in-memory session state");
        Box::new(MemoryKeyValueStore::with_quota(config.state_quota_bytes))
    } else {
        info!("Using session state file {}", config.state_path.display());
        Box::new(FileKeyValueStore::open(&config.state_path, config.state_quota_bytes)?)
    };
    let session = SessionStore::initialize(backend, config.on_malformed_state)?;

    // --- 4. Initialize Service Adapters & Shared State ---
    let otp = Arc::new(SimulatedOtpAdapter::new(
        config.otp_send_delay,
        config.otp_verify_delay,
    ));
    let app_state = AppState::new(session, catalog, otp);

    let origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Config(api_lib::config::ConfigError::InvalidValue(
            "ALLOWED_ORIGIN".to_string(),
            e.to_string(),
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(build_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
