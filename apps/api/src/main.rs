mod cache;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;
mod storage;
mod upload;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::CachedEmbedder;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::OcrConfig;
use crate::llm_client::{ApiKeyPool, GeminiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job-match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize Gemini client
    let keys = ApiKeyPool::new(config.gemini_api_keys.clone())?;
    let key_count = keys.len();
    let gemini = GeminiClient::new(keys, config.gemini_base_url.clone())?;
    info!(
        "Gemini client initialized (models: {}, {}; {} API keys)",
        llm_client::GENERATION_MODEL,
        llm_client::EMBEDDING_MODEL,
        key_count
    );

    let embedder = CachedEmbedder::new(gemini.clone(), redis, config.embedding_cache_ttl_secs);

    let ocr = OcrConfig::from_config(&config);
    info!(
        "OCR tools: pdftoppm={} tesseract={} timeout={:?}",
        ocr.pdftoppm_path, ocr.tesseract_path, ocr.timeout
    );

    // Build app state
    let state = AppState {
        db,
        s3,
        config: config.clone(),
        generator: Arc::new(gemini),
        embedder: Arc::new(embedder),
        ocr,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
