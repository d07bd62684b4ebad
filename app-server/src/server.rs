//! HTTP server implementation using Axum.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use raglite_completion::{CompletionProvider, OpenAIChatProvider};
use raglite_embeddings::{EmbeddingProvider, LocalProvider, OpenAIProvider};
use raglite_retrieval::{AnsweringService, load_collection};
use tower_http::trace::TraceLayer;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{EmbeddingBackend, ServerConfig};
use crate::routes;

/// Shared state for request handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnsweringService>,
}

impl AppState {
    pub fn new(service: AnsweringService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/basic", post(routes::basic))
        .route("/with-gpt", post(routes::with_gpt))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Construct the embedding provider selected by `config`.
///
/// The local backend loads its model here, so a failed download is an
/// initialization failure.
pub async fn embedding_provider(
    config: &ServerConfig,
) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding.backend {
        EmbeddingBackend::Local => {
            let provider = LocalProvider::load(config.embedding.cache_dir.clone())
                .await
                .context("failed to load local embedding model")?;
            Ok(Arc::new(provider))
        }
        EmbeddingBackend::Openai => {
            let provider = openai_embedding_provider(config);
            if !provider.is_available() {
                anyhow::bail!(
                    "no embedding API key configured for {}; set OPENAI_API_KEY or EMBEDDING_API_KEY",
                    config.embedding.base_url
                );
            }
            Ok(Arc::new(provider))
        }
    }
}

fn openai_embedding_provider(config: &ServerConfig) -> OpenAIProvider {
    let settings = &config.embedding;
    let mut provider = OpenAIProvider::new()
        .with_base_url(settings.base_url.as_str())
        .with_model(settings.model.as_str())
        .with_timeout(config.request_timeout());
    if let Some(api_key) = &settings.api_key {
        provider = provider.with_api_key(api_key.as_str());
    }
    provider
}

/// Construct the completion provider, if a credential is configured.
pub fn completion_provider(config: &ServerConfig) -> Option<OpenAIChatProvider> {
    config.completion.as_ref().map(|settings| {
        OpenAIChatProvider::new(settings.api_key.as_str())
            .with_base_url(settings.base_url.as_str())
            .with_model(settings.model.as_str())
            .with_timeout(config.request_timeout())
    })
}

/// Load and embed the document collection, then build the service.
///
/// Any failure here is an initialization failure.
pub async fn initialize(config: &ServerConfig) -> anyhow::Result<AnsweringService> {
    let documents = load_collection(&config.documents_path)
        .await
        .context("failed to load document collection")?;

    let embedder = embedding_provider(config).await?;

    let mut builder = AnsweringService::builder(embedder).with_config(config.answer_config());
    match completion_provider(config) {
        Some(completion) => {
            let completion: Arc<dyn CompletionProvider> = Arc::new(completion);
            builder = builder.with_completion(completion);
        }
        None => warn!("OPENAI_API_KEY not set; /with-gpt will answer 400"),
    }

    builder
        .build(documents)
        .await
        .context("failed to build document index")
}

/// Bind the configured host and port. The host may be a name such as
/// `localhost` or a bare IPv6 address.
pub async fn bind_listener(config: &ServerConfig) -> anyhow::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))
}

/// Initialize, bind and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let service = initialize(&config).await?;
    let app = build_router(AppState::new(service));

    let listener = bind_listener(&config).await?;
    let addr = listener.local_addr().context("listener has no local address")?;

    info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
