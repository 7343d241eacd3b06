//! Load-once cache for the `OpenAPI` document.

use crate::config::Config;
use crate::document::OpenApiDocument;
use crate::error::{OpenApiToolsError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Owns the parsed `OpenAPI` document for the lifetime of the process.
///
/// The first successful [`Self::load`] reads and parses the document; every later call returns
/// the same `Arc`. A failed load leaves the cell empty, so the next call tries again.
#[derive(Debug, Default)]
pub struct SpecStore {
    /// Fixed document location. `None` means "ask the environment at first load".
    path: Option<PathBuf>,
    document: OnceCell<Arc<OpenApiDocument>>,
}

impl SpecStore {
    /// A store reading from an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            document: OnceCell::new(),
        }
    }

    /// A store reading from `ACOMO_OPENAPI_PATH` (or its default) when first loaded.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Return the cached document, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns a `DocumentUnavailable` error ([`OpenApiToolsError::DocumentRead`] or
    /// [`OpenApiToolsError::DocumentParse`]) if the file cannot be read or parsed.
    pub async fn load(&self) -> Result<Arc<OpenApiDocument>> {
        self.document
            .get_or_try_init(|| async {
                let path = self
                    .path
                    .clone()
                    .unwrap_or_else(|| Config::from_env().openapi_path);
                read_document(&path).await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// Whether a document has been loaded already.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.document.initialized()
    }
}

async fn read_document(path: &Path) -> Result<OpenApiDocument> {
    let path_str = path.display().to_string();
    tracing::info!("Loading OpenAPI document from {path_str}");

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| OpenApiToolsError::DocumentRead {
            path: path_str.clone(),
            source,
        })?;

    let root = parse_document(&text).map_err(|message| OpenApiToolsError::DocumentParse {
        path: path_str.clone(),
        message,
    })?;

    let document = OpenApiDocument::new(root);
    tracing::info!(
        "Loaded OpenAPI document {path_str} ({} paths)",
        document.paths().map_or(0, serde_json::Map::len)
    );
    Ok(document)
}

/// The document must be a JSON object.
fn parse_document(text: &str) -> std::result::Result<Value, String> {
    let root: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if root.is_object() {
        Ok(root)
    } else {
        Err("document root is not an object".to_string())
    }
}
