//! Filesystem-backed asset provider.
//!
//! Request paths come straight from HTTP clients, so every resolved path is
//! checked to stay within the webapp directory (e.g. `../../etc/passwd` is
//! rejected).

use diplo_traits::{AssetError, AssetProvider, SharedAssetData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads webapp assets from a directory on disk.
///
/// Symlinks pointing outside the directory are rejected once the target
/// exists, since the check runs on canonicalized paths.
#[derive(Debug)]
pub struct FilesystemAssetProvider {
    root: PathBuf,
    canonical_root: Option<PathBuf>,
}

impl FilesystemAssetProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let canonical_root = root.canonicalize().ok();
        if canonical_root.is_none() {
            log::warn!("Asset directory {} does not exist", root.display());
        }
        Self {
            root,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto the webapp directory.
    ///
    /// Returns `None` for absolute paths, parent-directory components, and
    /// anything whose canonical form escapes the root.
    fn resolve(&self, request: &str) -> Option<PathBuf> {
        let relative = Path::new(request.trim_start_matches('/'));
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        let full_path = self.root.join(relative);
        match (full_path.canonicalize(), &self.canonical_root) {
            (Ok(canonical), Some(root)) if canonical.starts_with(root) => Some(canonical),
            (Ok(_), _) => None,
            (Err(_), _) => Some(full_path),
        }
    }
}

impl AssetProvider for FilesystemAssetProvider {
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError> {
        let full_path = self
            .resolve(path)
            .ok_or_else(|| AssetError::Rejected(path.to_string()))?;

        if full_path.is_dir() {
            return Err(AssetError::NotFound(path.to_string()));
        }

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound(path.to_string())
            } else {
                AssetError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemAssetProvider"
    }
}
