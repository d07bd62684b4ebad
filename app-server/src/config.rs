//! Server configuration from flags and environment.
//!
//! `dotenvy` loads `.env` before parsing, so every flag can also come from
//! the environment or that file.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use raglite_retrieval::AnswerConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_DOCUMENTS_PATH: &str = "data/documents.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "raglite-server",
    version,
    about = "Answer questions from a small document collection, optionally through a chat model"
)]
pub struct ServerArgs {
    /// Listening port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Listening address
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Document collection: a JSON array of { id, text }
    #[arg(long, env = "DOCUMENTS_PATH", default_value = DEFAULT_DOCUMENTS_PATH)]
    pub documents: PathBuf,

    /// Completion API key; augmented answers are disabled without it
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = raglite_completion::provider::OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Chat model for augmented answers
    #[arg(long, env = "CHAT_MODEL", default_value = raglite_completion::provider::DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Embedding backend (default: openai when --embedding-base-url is set, else local)
    #[arg(long, env = "EMBEDDING_BACKEND", value_enum)]
    pub embedding_backend: Option<EmbeddingBackend>,

    /// Cache directory for the local embedding model
    #[arg(long, env = "EMBEDDING_CACHE_DIR")]
    pub embedding_cache_dir: Option<PathBuf>,

    /// Embedding API key (defaults to the completion key)
    #[arg(long, env = "EMBEDDING_API_KEY", hide_env_values = true)]
    pub embedding_api_key: Option<String>,

    /// Embedding API base URL (defaults to the completion base URL)
    #[arg(long, env = "EMBEDDING_BASE_URL")]
    pub embedding_base_url: Option<String>,

    /// Embedding model for the openai backend
    #[arg(long, env = "EMBEDDING_MODEL", default_value = raglite_embeddings::provider::DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// Timeout for each embedding or completion call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerArgs {
    /// Resolve the arguments into a server configuration.
    pub fn into_config(self) -> ServerConfig {
        let openai_api_key = non_empty(self.openai_api_key);
        let embedding_base_url = non_empty(self.embedding_base_url);

        let backend = self.embedding_backend.unwrap_or(if embedding_base_url.is_some() {
            EmbeddingBackend::Openai
        } else {
            EmbeddingBackend::Local
        });
        let embedding = EmbeddingSettings {
            backend,
            cache_dir: self.embedding_cache_dir,
            api_key: non_empty(self.embedding_api_key).or_else(|| openai_api_key.clone()),
            base_url: embedding_base_url.unwrap_or_else(|| self.openai_base_url.clone()),
            model: self.embedding_model,
        };

        let completion = openai_api_key.map(|api_key| CompletionSettings {
            api_key,
            base_url: self.openai_base_url,
            model: self.chat_model,
        });

        ServerConfig {
            host: self.host,
            port: self.port,
            documents_path: self.documents,
            embedding,
            completion,
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolved server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub documents_path: PathBuf,
    pub embedding: EmbeddingSettings,

    /// `None` disables augmented answers.
    pub completion: Option<CompletionSettings>,

    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn with_documents_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents_path = path.into();
        self
    }

    pub fn with_completion(mut self, completion: CompletionSettings) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn answer_config(&self) -> AnswerConfig {
        AnswerConfig::default().with_request_timeout(self.request_timeout())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            documents_path: PathBuf::from(DEFAULT_DOCUMENTS_PATH),
            embedding: EmbeddingSettings::default(),
            completion: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Which embedder turns text into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// In-process MiniLM model; needs no credential.
    #[default]
    Local,

    /// An OpenAI-compatible `/embeddings` endpoint.
    Openai,
}

/// Where and how to embed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,

    /// Model cache for the local backend; `fastembed` picks one when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Used by the openai backend only.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Local,
            cache_dir: None,
            api_key: None,
            base_url: raglite_embeddings::provider::OPENAI_BASE_URL.to_string(),
            model: raglite_embeddings::provider::DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

/// Chat-completion endpoint for augmented answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(skip_serializing, default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["raglite-server"];
        argv.extend_from_slice(args);
        ServerArgs::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.documents_path, PathBuf::from("data/documents.json"));
        assert!(config.completion.is_none());
        assert_eq!(config.embedding.backend, EmbeddingBackend::Local);
    }

    #[test]
    fn test_local_embeddings_need_no_key() {
        let config = parse(&["--embedding-cache-dir", "/tmp/models"]);

        assert_eq!(config.embedding.backend, EmbeddingBackend::Local);
        assert_eq!(config.embedding.cache_dir, Some(PathBuf::from("/tmp/models")));
    }

    #[test]
    fn test_backend_flag_overrides_inferred_backend() {
        let config = parse(&["--embedding-backend", "openai", "--openai-api-key", "sk-test"]);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Openai);

        let config = parse(&[
            "--embedding-backend",
            "local",
            "--embedding-base-url",
            "http://localhost:11434/v1",
        ]);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Local);
    }

    #[test]
    fn test_completion_key_enables_augmented_mode() {
        let config = parse(&[
            "--openai-api-key",
            "sk-test",
            "--openai-base-url",
            "http://llm.local/v1",
            "--chat-model",
            "gpt-4o-mini",
        ]);

        let completion = config.completion.unwrap();
        assert_eq!(completion.api_key, "sk-test");
        assert_eq!(completion.base_url, "http://llm.local/v1");
        assert_eq!(completion.model, "gpt-4o-mini");

        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.embedding.base_url, "http://llm.local/v1");
    }

    #[test]
    fn test_embedding_settings_override_completion_ones() {
        let config = parse(&[
            "--openai-api-key",
            "sk-chat",
            "--embedding-api-key",
            "sk-embed",
            "--embedding-base-url",
            "http://localhost:11434/v1",
            "--embedding-model",
            "all-minilm",
        ]);

        assert_eq!(config.embedding.backend, EmbeddingBackend::Openai);
        assert_eq!(config.embedding.api_key.as_deref(), Some("sk-embed"));
        assert_eq!(config.embedding.base_url, "http://localhost:11434/v1");
        assert_eq!(config.embedding.model, "all-minilm");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = parse(&["--openai-api-key", "  "]);
        assert!(config.completion.is_none());
    }

    #[test]
    fn test_port_and_timeout_flags() {
        let config = parse(&["--port", "9123", "--request-timeout-secs", "5"]);
        assert_eq!(config.port, 9123);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.answer_config().request_timeout_ms, 5_000);
    }

    #[test]
    fn test_serialized_config_omits_keys() {
        let config = ServerConfig::default().with_completion(CompletionSettings {
            api_key: "sk-secret".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        });

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"), "{json}");
    }
}
