use anyhow::{bail, Context, Result};

/// Highest numbered `GEMINI_API_KEY_n` variable that is read at startup.
const MAX_GEMINI_KEYS: usize = 7;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub gemini_api_keys: Vec<String>,
    pub gemini_base_url: String,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub ocr_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub embedding_cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_keys = collect_gemini_keys(|key| std::env::var(key).ok());
        if gemini_api_keys.is_empty() {
            bail!("At least one GEMINI_API_KEY_<n> environment variable must be set");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            gemini_api_keys,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_BASE_URL.to_string()),
            pdftoppm_path: std::env::var("PDFTOPPM_PATH")
                .unwrap_or_else(|_| "pdftoppm".to_string()),
            tesseract_path: std::env::var("TESSERACT_PATH")
                .unwrap_or_else(|_| "tesseract".to_string()),
            ocr_timeout_secs: parse_env_or("OCR_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            embedding_cache_ttl_secs: parse_env_or("EMBEDDING_CACHE_TTL_SECS", 86_400)?,
            port: parse_env_or("PORT", 5000).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Reads `GEMINI_API_KEY_0` .. `GEMINI_API_KEY_6`, skipping unset or blank entries.
fn collect_gemini_keys(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    (0..MAX_GEMINI_KEYS)
        .filter_map(|i| lookup(&format!("GEMINI_API_KEY_{i}")))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
