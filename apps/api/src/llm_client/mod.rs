/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Callers depend on the `TextGenerator` / `EmbeddingProvider` traits, which
/// `GeminiClient` implements.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod keys;
pub mod prompts;

pub use keys::ApiKeyPool;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Model used for every text generation call.
pub const GENERATION_MODEL: &str = "gemini-1.5-flash";
/// Model used for every embedding call.
pub const EMBEDDING_MODEL: &str = "gemini-embedding-exp-03-07";
const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No Gemini API keys configured")]
    NoApiKeys,
}

/// Free-form text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Dense vector embeddings for a piece of text.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, or an empty string.
    pub fn text(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Embedding,
}

#[derive(Debug, Deserialize)]
pub struct Embedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by all services.
/// Rotates through the configured API keys on every request.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    keys: ApiKeyPool,
    base_url: String,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(keys: ApiKeyPool, base_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            keys,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Delay before retry `attempt` (1-based): base, then doubled.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay * (1 << (attempt - 1))
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1/models/{GENERATION_MODEL}:generateContent",
            self.base_url
        )
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{EMBEDDING_MODEL}:embedContent",
            self.base_url
        )
    }

    /// POSTs `body` to `url` and deserializes the JSON response.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff,
    /// taking the next API key from the pool on every attempt.
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = self.backoff_delay(attempt);
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let key = self.keys.next_key();
            let response = self
                .client
                .post(url)
                .query(&[("key", key)])
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let response: GenerateResponse = self.post_json(&self.generate_url(), &request).await?;
        let text = response.text().to_string();
        debug!("Gemini generation succeeded: {} chars", text.len());
        Ok(text)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = EmbedRequest {
            model: format!("models/{EMBEDDING_MODEL}"),
            content: Content {
                parts: vec![Part { text }],
            },
        };
        let response: EmbedResponse = self.post_json(&self.embed_url(), &request).await?;
        debug!(
            "Gemini embedding succeeded: {} dimensions",
            response.embedding.values.len()
        );
        Ok(response.embedding.values)
    }
}

/// Calls the generator and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<T, LlmError> {
    let text = generator.generate(prompt).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    // Strip markdown code fences if the model wraps JSON in them
    serde_json::from_str(strip_code_fences(&text)).map_err(LlmError::Parse)
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Strips ```lang ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as `json` or `latex` on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) if !rest[..idx].contains(char::is_whitespace) => &rest[idx + 1..],
        _ => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::StatusCode,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_latex_tag() {
        let input = "```latex\n\\section{Education}\n```";
        assert_eq!(strip_code_fences(input), "\\section{Education}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_generate_response_text_first_candidate() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "hello");
    }

    #[test]
    fn test_generate_response_without_candidates_is_empty() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_embed_response_parses_values() {
        let json = r#"{"embedding":{"values":[0.5,-0.25,1.0]}}"#;
        let response: EmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.embedding.values, vec![0.5, -0.25, 1.0]);
    }

    #[test]
    fn test_api_error_message_prefers_structured_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body.to_string()), "API key not valid");
        assert_eq!(api_error_message("plain".to_string()), "plain");
    }

    #[test]
    fn test_request_urls_use_configured_base() {
        let client =
            GeminiClient::new(ApiKeyPool::new(vec!["k".into()]).unwrap(), "http://localhost:9/")
                .unwrap();
        assert_eq!(
            client.generate_url(),
            "http://localhost:9/v1/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            client.embed_url(),
            "http://localhost:9/v1beta/models/gemini-embedding-exp-03-07:embedContent"
        );
    }

    #[test]
    fn test_embed_request_shape() {
        let request = EmbedRequest {
            model: format!("models/{EMBEDDING_MODEL}"),
            content: Content {
                parts: vec![Part { text: "resume" }],
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "models/gemini-embedding-exp-03-07");
        assert_eq!(value["content"]["parts"][0]["text"], "resume");
    }

    /// Local stand-in for the Gemini API: replays scripted responses and
    /// records the `key` query parameter and JSON body of every request.
    #[derive(Default)]
    struct ScriptedGemini {
        responses: Mutex<VecDeque<(StatusCode, Value)>>,
        keys: Mutex<Vec<String>>,
        bodies: Mutex<Vec<Value>>,
    }

    async fn scripted_reply(
        State(server): State<Arc<ScriptedGemini>>,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        server
            .keys
            .lock()
            .unwrap()
            .push(query.get("key").cloned().unwrap_or_default());
        server.bodies.lock().unwrap().push(body);
        let (status, reply) = server
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({})));
        (status, Json(reply))
    }

    async fn spawn_gemini(
        responses: Vec<(StatusCode, Value)>,
    ) -> (Arc<ScriptedGemini>, GeminiClient) {
        let server = Arc::new(ScriptedGemini {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        });
        let app = Router::new()
            .fallback(scripted_reply)
            .with_state(server.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let keys = ApiKeyPool::new(vec!["key-a".into(), "key-b".into()]).unwrap();
        let client = GeminiClient::new(keys, format!("http://{addr}"))
            .unwrap()
            .with_retry_base_delay(Duration::from_millis(1));
        (server, client)
    }

    fn text_reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn test_backoff_doubles_from_one_second() {
        let client =
            GeminiClient::new(ApiKeyPool::new(vec!["k".into()]).unwrap(), DEFAULT_BASE_URL)
                .unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(client.backoff_delay(2), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_with_next_key() {
        let (server, client) = spawn_gemini(vec![
            (StatusCode::TOO_MANY_REQUESTS, json!({})),
            (StatusCode::OK, text_reply("hello")),
        ])
        .await;

        let text = client.generate("Summarize this resume").await.unwrap();

        assert_eq!(text, "hello");
        assert_eq!(*server.keys.lock().unwrap(), vec!["key-a", "key-b"]);
        assert_eq!(
            server.bodies.lock().unwrap()[1],
            json!({ "contents": [{ "parts": [{ "text": "Summarize this resume" }] }] })
        );
    }

    #[tokio::test]
    async fn test_server_errors_give_up_after_three_attempts() {
        let unavailable = (StatusCode::SERVICE_UNAVAILABLE, json!({}));
        let (server, client) = spawn_gemini(vec![
            unavailable.clone(),
            unavailable.clone(),
            unavailable,
        ])
        .await;

        let result = client.generate("prompt").await;

        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
        assert_eq!(*server.keys.lock().unwrap(), vec!["key-a", "key-b", "key-a"]);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (server, client) = spawn_gemini(vec![(
            StatusCode::BAD_REQUEST,
            json!({ "error": { "code": 400, "message": "API key not valid" } }),
        )])
        .await;

        let result = client.generate("prompt").await;

        assert!(matches!(
            result,
            Err(LlmError::Api { status: 400, message }) if message == "API key not valid"
        ));
        assert_eq!(server.keys.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_embed_round_trips_through_api() {
        let (server, client) = spawn_gemini(vec![(
            StatusCode::OK,
            json!({ "embedding": { "values": [0.5, -0.5] } }),
        )])
        .await;

        assert_eq!(client.embed("resume").await.unwrap(), vec![0.5, -0.5]);
        assert_eq!(
            server.bodies.lock().unwrap()[0]["model"],
            "models/gemini-embedding-exp-03-07"
        );
    }

    #[tokio::test]
    async fn test_generate_json_strips_fences() {
        let generator = FixedGenerator("```json\n{\"name\": \"Ada\"}\n```");
        let value: Value = generate_json(&generator, "prompt").await.unwrap();
        assert_eq!(value["name"], "Ada");
    }

    #[tokio::test]
    async fn test_generate_json_empty_is_error() {
        let generator = FixedGenerator("   ");
        let result: Result<Value, _> = generate_json(&generator, "prompt").await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
