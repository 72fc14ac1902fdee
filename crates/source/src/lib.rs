//! Document discovery for the pipeline.
//!
//! The scanner only enumerates files. Whether a file is a well-formed
//! document is decided later, when its pages are first requested.
//!
//! ## Example
//!
//! ```ignore
//! use diplo_source::DocumentScanner;
//!
//! let scanner = DocumentScanner::new("data/xml", "document");
//! for path in scanner.scan()? {
//!     println!("Found: {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Document directory {path} is not accessible: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Finds every document file of a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentScanner {
    root: PathBuf,
    document_dir: PathBuf,
}

impl DocumentScanner {
    pub fn new(root: impl Into<PathBuf>, document_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            document_dir: document_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory actually walked.
    pub fn documents_path(&self) -> PathBuf {
        self.root.join(&self.document_dir)
    }

    /// Returns every `*.xml` file beneath the document directory, sorted.
    ///
    /// Symbolic links are followed. A dangling link or a link cycle below
    /// the document directory is logged and skipped.
    ///
    /// # Errors
    ///
    /// Any other I/O error while walking the tree aborts the scan, including
    /// a missing document directory.
    pub fn scan(&self) -> Result<Vec<PathBuf>, ScanError> {
        let dir = self.documents_path();
        let mut documents = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_broken_link(&e) => {
                    log::warn!("Skipping {}", e);
                    continue;
                }
                Err(source) => {
                    return Err(ScanError::Unreadable {
                        path: source.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone()),
                        source,
                    });
                }
            };
            if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(".xml")
            {
                documents.push(entry.into_path());
            }
        }
        documents.sort();
        log::info!("Found {} documents in {}", documents.len(), dir.display());
        Ok(documents)
    }
}

/// A link below the root whose target is missing or one of its own ancestors.
fn is_broken_link(error: &walkdir::Error) -> bool {
    error.depth() > 0
        && (error.loop_ancestor().is_some()
            || error
                .io_error()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound))
}
