use crate::ids::{Basename, Sigil};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Scheme and authority of the logical URI assigned to every corpus document.
pub const CORPUS_URI_PREFIX: &str = "faust://xml/";

/// Metadata read from a document's header.
///
/// Pages share the header through an `Arc`, so a page can always name its
/// document without the document owning a cycle back to its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Location of the document's XML file.
    pub source_path: PathBuf,
    /// `source_path` relative to the corpus root.
    pub relative: PathBuf,
    /// Resolution base for the page-relative transcript references.
    pub base: Url,
    pub sigil: Sigil,
    pub basename: Basename,
}

impl DocumentHeader {
    /// The stable logical URI of this document, derived from its relative path.
    pub fn logical_uri(&self) -> String {
        logical_uri(&self.relative)
    }
}

/// Builds the logical URI for a document path relative to the corpus root.
pub fn logical_uri(relative: &Path) -> String {
    let rel = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{CORPUS_URI_PREFIX}{rel}")
}

/// The identity of a page: its document's basename plus its page number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub basename: Basename,
    pub page_number: usize,
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.basename, self.page_number)
    }
}

/// One page-level unit of a document, rendered individually.
#[derive(Debug, Clone)]
pub struct TranscriptPage {
    pub document: Arc<DocumentHeader>,
    /// The page-relative reference exactly as declared in the source XML.
    pub page_ref: String,
    /// The reference resolved against the document's base URI.
    pub source_uri: Url,
    /// 1-based, sequential within the document.
    pub page_number: usize,
}

impl TranscriptPage {
    pub fn id(&self) -> PageId {
        PageId {
            basename: self.document.basename.clone(),
            page_number: self.page_number,
        }
    }

    pub fn basename(&self) -> &Basename {
        &self.document.basename
    }

    pub fn sigil(&self) -> &Sigil {
        &self.document.sigil
    }
}

impl PartialEq for TranscriptPage {
    fn eq(&self, other: &Self) -> bool {
        self.document.basename == other.document.basename && self.page_number == other.page_number
    }
}

impl Eq for TranscriptPage {}

impl std::hash::Hash for TranscriptPage {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.document.basename.hash(state);
        self.page_number.hash(state);
    }
}

impl fmt::Display for TranscriptPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} page {}: {}",
            self.document.logical_uri(),
            self.page_number,
            self.source_uri
        )
    }
}
