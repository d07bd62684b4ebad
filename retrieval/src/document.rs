//! Documents and the static collection they are loaded from.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::error::{Result, RetrievalError};

/// A document in the collection. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique id. Numeric ids in the collection file are kept in their
    /// decimal string form.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// The document text, returned verbatim in direct mode.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Parse a collection from its JSON text: an array of `{ id, text }`.
pub fn parse_collection(json: &str) -> serde_json::Result<Vec<Document>> {
    serde_json::from_str(json)
}

/// Load the document collection from disk.
pub async fn load_collection(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RetrievalError::CollectionRead {
            path: path.to_path_buf(),
            source,
        })?;

    let documents =
        parse_collection(&content).map_err(|source| RetrievalError::CollectionParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}
