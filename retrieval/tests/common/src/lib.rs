//! Deterministic providers and fixtures shared by raglite tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use raglite_completion::{CompletionError, CompletionProvider};
use raglite_embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use raglite_retrieval::Document;

/// Vocabulary used by [`KeywordEmbedder::geography`].
pub const GEOGRAPHY_VOCABULARY: &[&str] = &["capital", "france", "paris", "sky", "blue"];

/// The two-document collection used across scenario tests.
pub fn paris_and_sky() -> Vec<Document> {
    vec![
        Document::new("1", "Paris is the capital of France"),
        Document::new("2", "The sky is blue"),
    ]
}

/// Embeds text as keyword counts over a fixed vocabulary.
///
/// Text with none of the keywords embeds to the zero vector.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail_with: Option<String>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|word| word.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
            delay: None,
            fail_with: None,
        }
    }

    pub fn geography() -> Self {
        Self::new(GEOGRAPHY_VOCABULARY)
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every request with an API error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| **w == term.as_str()).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keyword"
    }

    fn default_model(&self) -> &str {
        "keyword-counts"
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_with {
            return Err(EmbeddingError::ApiRequest(message.clone()));
        }

        let embedding = self.vector_for(&request.text);
        Ok(EmbeddingResponse {
            dimension: embedding.len(),
            embedding,
            model: self.default_model().to_string(),
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Records every prompt and replies with a fixed text.
pub struct RecordingCompletion {
    reply: String,
    prompts: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
    fail_with: Option<String>,
}

impl RecordingCompletion {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
            delay: None,
            fail_with: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// (system, user) prompt pairs received so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for RecordingCompletion {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system_prompt.to_string(), user_prompt.to_string()));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_with {
            return Err(CompletionError::ApiRequest(message.clone()));
        }

        Ok(self.reply.clone())
    }
}
