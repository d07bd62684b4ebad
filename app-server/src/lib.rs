//! HTTP surface of the raglite answering service.
//!
//! - `POST /basic` returns the text of the document nearest to the query.
//! - `POST /with-gpt` answers the query with a chat model, using only that
//!   document as context.
//! - `GET /health` reports index size and whether augmented mode is on.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{ServerArgs, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use server::{AppState, bind_listener, build_router, initialize, run};
