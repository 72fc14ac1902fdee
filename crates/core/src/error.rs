//! Defines the error types for pipeline operations.

use diplo_source::ScanError;
use diplo_traits::TransformError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a document yielded no pages.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: XML extraction error: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("{path}: no element carries a '{attribute}' attribute")]
    MissingBase { path: PathBuf, attribute: String },
    #[error("{path}: invalid base URI '{value}': {source}")]
    InvalidBase {
        path: PathBuf,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{path}: no {element}[@type='{kind}'] sigil")]
    MissingSigil {
        path: PathBuf,
        element: String,
        kind: String,
    },
    #[error("{path}: cannot resolve page reference '{reference}': {source}")]
    InvalidPageRef {
        path: PathBuf,
        reference: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a page's JSON intermediate could not be written.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("transform output is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The main error enum for the fatal outcomes of a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Document scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset server error: {0}")]
    Server(String),
    #[error("Interrupted")]
    Interrupted,
    #[error("Other pipeline error: {0}")]
    Other(String),
}
