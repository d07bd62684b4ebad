//! # Completion
//!
//! Chat-completion access for augmented answers: a small
//! [`CompletionProvider`] trait, an OpenAI-compatible implementation, and the
//! prompt that grounds the model in a retrieved document.

pub mod error;
pub mod prompt;
pub mod provider;

pub use error::{CompletionError, Result};
pub use prompt::GroundedPrompt;
pub use provider::{ChatMessage, ChatRole, CompletionProvider, OpenAIChatProvider};
