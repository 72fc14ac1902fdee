//! Transform traits for the document conversions the pipeline delegates.

use std::fmt::Debug;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command '{command}' failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Transform produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("Invalid stylesheet reference: {0}")]
    InvalidStylesheet(String),

    #[error("XML error: {0}")]
    Xml(String),
}

/// Converts one page's source XML into the JSON intermediate.
pub trait TranscriptTransform: Send + Sync + Debug {
    /// Returns the serialized JSON for the transcript at `source`.
    fn transform(&self, source: &Path) -> Result<Vec<u8>, TransformError>;
}

/// Rewrites a rendered SVG for print.
pub trait SvgTransform: Send + Sync + Debug {
    /// Validates the stylesheet once, before any page is touched.
    fn prepare(&self, stylesheet: &str) -> Result<(), TransformError>;

    /// Applies the transform to one SVG document.
    fn apply(&self, svg: &[u8], stylesheet: &str) -> Result<Vec<u8>, TransformError>;
}
