//! Redis-backed embedding cache.
//!
//! Embeddings are keyed by the BLAKE3 hash of the embedded text. Redis is an
//! optimisation only: any cache failure is logged and treated as a miss.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::llm_client::{EmbeddingProvider, LlmError};

const KEY_PREFIX: &str = "embedding:";

pub fn cache_key(text: &str) -> String {
    format!("{KEY_PREFIX}{}", blake3::hash(text.as_bytes()).to_hex())
}

pub struct CachedEmbedder<P> {
    inner: P,
    redis: redis::Client,
    ttl_secs: u64,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    pub fn new(inner: P, redis: redis::Client, ttl_secs: u64) -> Self {
        Self {
            inner,
            redis,
            ttl_secs,
        }
    }

    async fn lookup(&self, key: &str) -> redis::RedisResult<Option<Vec<f32>>> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        Ok(raw.and_then(|r| serde_json::from_str(&r).ok()))
    }

    async fn store(&self, key: &str, values: &[f32]) -> redis::RedisResult<()> {
        let encoded = serde_json::to_string(values).unwrap_or_default();
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        conn.set_ex(key, encoded, self.ttl_secs).await
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let key = cache_key(text);

        match self.lookup(&key).await {
            Ok(Some(values)) => {
                debug!("Embedding cache hit for {key}");
                return Ok(values);
            }
            Ok(None) => debug!("Embedding cache miss for {key}"),
            Err(e) => warn!("Embedding cache unavailable: {e}"),
        }

        let values = self.inner.embed(text).await?;
        if !values.is_empty() {
            if let Err(e) = self.store(&key, &values).await {
                warn!("Failed to cache embedding: {e}");
            }
        }
        Ok(values)
    }
}
