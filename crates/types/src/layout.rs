//! Filesystem addressing for corpus inputs and pipeline artifacts.
//!
//! Every artifact path is a pure function of `(basename, page number, kind)`
//! and the configured output root. Two pages of distinct documents only
//! collide if their basenames collide, which the corpus must rule out.

use crate::document::{PageId, TranscriptPage};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

/// The kinds of per-page artifacts the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The JSON intermediate consumed by the renderer.
    Json,
    /// The primary diplomatic SVG.
    Svg,
    /// The text-image-link overlay SVG.
    Overlay,
    /// The print-ready SVG produced by post-processing.
    Prepared,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Json,
        ArtifactKind::Svg,
        ArtifactKind::Overlay,
        ArtifactKind::Prepared,
    ];

    fn directory(self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Json => &["pages"],
            ArtifactKind::Svg => &["www", "transcript", "diplomatic"],
            ArtifactKind::Overlay => &["www", "transcript", "overlay"],
            ArtifactKind::Prepared => &["prepared-svg"],
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Json => "json",
            _ => "svg",
        }
    }
}

/// Maps corpus URIs onto files under the corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLayout {
    root: PathBuf,
}

impl CorpusLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a corpus URI by its path component, ignoring scheme and host.
    ///
    /// Segments are percent-decoded, so `Blatt_%C3%A4.xml` names the file
    /// `Blatt_ä.xml`.
    pub fn resolve(&self, uri: &Url) -> PathBuf {
        let mut path = self.root.clone();
        for segment in uri.path().split('/').filter(|s| !s.is_empty()) {
            path.push(percent_decode_str(segment).decode_utf8_lossy().as_ref());
        }
        path
    }

    /// The source XML file of a page.
    pub fn page_source(&self, page: &TranscriptPage) -> PathBuf {
        self.resolve(&page.source_uri)
    }
}

/// Computes where every artifact of a run is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of one page artifact.
    pub fn artifact(&self, page: &PageId, kind: ArtifactKind) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(kind.directory());
        path.push(page.basename.as_str());
        path.push(format!("page_{}.{}", page.page_number, kind.extension()));
        path
    }

    pub fn json(&self, page: &TranscriptPage) -> PathBuf {
        self.artifact(&page.id(), ArtifactKind::Json)
    }

    pub fn svg(&self, page: &TranscriptPage) -> PathBuf {
        self.artifact(&page.id(), ArtifactKind::Svg)
    }

    pub fn overlay(&self, page: &TranscriptPage) -> PathBuf {
        self.artifact(&page.id(), ArtifactKind::Overlay)
    }

    pub fn prepared(&self, page: &TranscriptPage) -> PathBuf {
        self.artifact(&page.id(), ArtifactKind::Prepared)
    }

    /// The corpus-wide render manifest.
    pub fn manifest(&self) -> PathBuf {
        self.root.join("render-job.json")
    }

    /// The job description for one document, consumed by the multi-page renderer.
    pub fn document_job(&self, basename: &str) -> PathBuf {
        self.root.join("render-jobs").join(format!("{basename}.json"))
    }

    /// The PDF a multi-page render of one document is written to.
    pub fn document_pdf(&self, basename: &str) -> PathBuf {
        self.root.join("pdf").join(format!("{basename}.pdf"))
    }
}
