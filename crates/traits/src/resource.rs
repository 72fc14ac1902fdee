//! AssetProvider trait for abstracting webapp asset loading.
//!
//! The asset server hands every request path to an `AssetProvider`, so the
//! HTTP layer never touches the filesystem directly and can be exercised
//! against in-memory assets.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for asset loading operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset request rejected: {0}")]
    Rejected(String),

    #[error("Failed to load asset '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

/// Shared asset bytes.
pub type SharedAssetData = Arc<Vec<u8>>;

/// A source of static webapp assets addressed by request path.
///
/// Paths are relative, `/`-separated and never start with a slash.
pub trait AssetProvider: Send + Sync + Debug {
    /// Load an asset by its request path.
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError>;

    /// Check if an asset exists.
    fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An asset provider backed by a map of pre-registered assets.
#[derive(Debug, Default)]
pub struct InMemoryAssetProvider {
    assets: RwLock<HashMap<String, SharedAssetData>>,
}

impl InMemoryAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under a request path.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<(), AssetError> {
        let path = path.into();
        let mut assets = self.assets.write().map_err(|_| AssetError::LoadFailed {
            path: path.clone(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets.insert(path, Arc::new(data.into()));
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetProvider for InMemoryAssetProvider {
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError> {
        let assets = self.assets.read().map_err(|_| AssetError::LoadFailed {
            path: path.to_string(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.assets
            .read()
            .map(|a| a.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryAssetProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_provider_add_and_load() {
        let provider = InMemoryAssetProvider::new();
        provider
            .add("transcript-generation.html", "<html></html>")
            .unwrap();

        let data = provider.load("transcript-generation.html").unwrap();
        assert_eq!(&*data, b"<html></html>");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_in_memory_provider_not_found() {
        let provider = InMemoryAssetProvider::new();
        assert!(provider.is_empty());
        assert_eq!(
            provider.load("js/faust.js"),
            Err(AssetError::NotFound("js/faust.js".to_string()))
        );
        assert!(!provider.exists("js/faust.js"));
    }

    #[test]
    fn test_in_memory_provider_overwrite() {
        let provider = InMemoryAssetProvider::new();
        provider.add("a.css", "old").unwrap();
        provider.add("a.css", "new").unwrap();
        assert_eq!(&*provider.load("a.css").unwrap(), b"new");
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::LoadFailed {
            path: "font.woff".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("font.woff"));
        assert!(err.to_string().contains("permission denied"));
    }
}
