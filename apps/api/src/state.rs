use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::extraction::OcrConfig;
use crate::llm_client::{EmbeddingProvider, TextGenerator};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Text generation backend. Default: `GeminiClient`.
    pub generator: Arc<dyn TextGenerator>,
    /// Embedding backend. Default: `GeminiClient` behind the Redis cache.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub ocr: OcrConfig,
}
