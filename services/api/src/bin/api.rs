//! services/api/src/bin/api.rs

use api_lib::{
    adapters::content_llm::OpenAiContentAdapter,
    config::Config,
    error::ApiError,
    web::{
        audio_script_handler, chapter_handler, commentary_handler, page_handler,
        preview_handler, rest::ApiDoc, state::AppState, verse_explanation_handler,
        wisdom_handler, ws_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::Duration as TimeDelta;
use gita_core::{
    ports::{ContentProvider, SystemClock},
    ContentCache, ContentRetrievalService, DeterministicProvider, LiveProvider,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Content Provider ---
    let provider: Arc<dyn ContentProvider> = match &config.openai_api_key {
        Some(api_key) => {
            let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
            if let Some(base_url) = &config.openai_base_url {
                openai_config = openai_config.with_api_base(base_url);
            }
            let generator = Arc::new(OpenAiContentAdapter::new(
                Client::with_config(openai_config),
                config.content_model.clone(),
                config.chapter_model.clone(),
            ));
            Arc::new(LiveProvider::new(generator))
        }
        None => {
            warn!("OPENAI_API_KEY is not set; serving deterministic content only.");
            Arc::new(DeterministicProvider::new())
        }
    };

    // --- 3. Build the Cache and Retrieval Service ---
    let cache = Arc::new(ContentCache::with_ttl(
        TimeDelta::seconds(config.cache_ttl_secs),
        Arc::new(SystemClock),
    ));
    let content = Arc::new(
        ContentRetrievalService::new(provider, cache).with_timeout(config.provider_timeout),
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState { content });

    let allowed_origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/chapters/{chapter}", get(chapter_handler))
        .route("/chapters/{chapter}/wisdom", get(wisdom_handler))
        .route("/chapters/{chapter}/preview", get(preview_handler))
        .route("/chapters/{chapter}/audio", get(audio_script_handler))
        .route("/chapters/{chapter}/commentary", get(commentary_handler))
        .route("/chapters/{chapter}/pages/{page}", get(page_handler))
        .route(
            "/chapters/{chapter}/verses/{verse}/explanation",
            post(verse_explanation_handler),
        )
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
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
