use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::LlmError;

/// Round-robin pool of Gemini API keys shared by every clone of the client.
#[derive(Debug, Clone)]
pub struct ApiKeyPool {
    keys: Arc<[String]>,
    cursor: Arc<AtomicUsize>,
}

impl ApiKeyPool {
    pub fn new(keys: Vec<String>) -> Result<Self, LlmError> {
        if keys.is_empty() {
            return Err(LlmError::NoApiKeys);
        }
        Ok(Self {
            keys: keys.into(),
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Returns the next key, wrapping after the last one.
    pub fn next_key(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        &self.keys[idx]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
