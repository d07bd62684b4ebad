//! In-process embedding provider.
//!
//! Runs `all-MiniLM-L6-v2` through `fastembed` (ONNX runtime), so direct
//! answers need neither a network service nor a credential. The model is
//! fetched into the cache directory on first load.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Name of the bundled local model.
pub const LOCAL_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Output dimension of [`LOCAL_EMBEDDING_MODEL`].
pub const LOCAL_EMBEDDING_DIMENSION: usize = 384;

/// Local embedding provider backed by an ONNX MiniLM model.
pub struct LocalProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalProvider {
    /// Load the model, downloading it into `cache_dir` when missing.
    ///
    /// Loading is blocking work and runs off the async runtime.
    pub async fn load(cache_dir: Option<PathBuf>) -> Result<Self> {
        let model = tokio::task::spawn_blocking(move || {
            let mut options =
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }
            TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| EmbeddingError::ModelLoad(format!("loader task failed: {e}")))?
        .map_err(|e| EmbeddingError::ModelLoad(e.to_string()))?;

        info!("Loaded local embedding model {LOCAL_EMBEDDING_MODEL}");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| EmbeddingError::ModelLoad("model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| EmbeddingError::ApiRequest(format!("local inference failed: {e}")))
        })
        .await
        .map_err(|e| EmbeddingError::ApiRequest(format!("inference task failed: {e}")))?
    }

    fn response(embedding: Embedding) -> EmbeddingResponse {
        EmbeddingResponse {
            dimension: embedding.len(),
            embedding,
            model: LOCAL_EMBEDDING_MODEL.to_string(),
            tokens_used: None,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn default_model(&self) -> &str {
        LOCAL_EMBEDDING_MODEL
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let embedding = self
            .run(vec![request.text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("model returned no embedding".to_string()))?;

        Ok(Self::response(embedding))
    }

    async fn embed_batch(&self, requests: Vec<EmbeddingRequest>) -> Result<Vec<EmbeddingResponse>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let expected = requests.len();
        let texts = requests.into_iter().map(|r| r.text).collect();
        let embeddings = self.run(texts).await?;
        if embeddings.len() != expected {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {expected} embeddings, got {}",
                embeddings.len()
            )));
        }

        debug!("Generated {expected} local embeddings");
        Ok(embeddings.into_iter().map(Self::response).collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}
