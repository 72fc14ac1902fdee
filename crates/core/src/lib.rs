//! # diplo-core
//!
//! The rendering pipeline's domain logic, free of process spawning and HTTP:
//! - **document** / **corpus**: lazy parsing and the single corpus snapshot
//! - **export**: JSON intermediates through a [`TranscriptTransform`]
//! - **manifest**: the render job description
//! - **dispatch** / **retry**: render rounds and convergence
//! - **postprocess**: print preparation through an [`SvgTransform`]
//! - **report**: failure accounting and the exit decision
//!
//! External tools are reached through the traits of `diplo-traits`, so
//! everything here is testable with in-process doubles.

pub use diplo_traits as traits;
pub use diplo_types as types;

mod atomic;
pub mod corpus;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod export;
pub mod manifest;
pub mod postprocess;
pub mod report;
pub mod retry;
pub mod schema;

#[cfg(test)]
mod test_support;

pub use atomic::write_atomic;
pub use corpus::Corpus;
pub use dispatch::RenderDispatcher;
pub use document::{Document, image_link};
pub use error::{DocumentError, ExportError, PipelineError};
pub use export::{ExportBatch, TranscriptExporter};
pub use manifest::{DocumentJob, JobManifestWriter, TranscriptEntry};
pub use postprocess::PostProcessor;
pub use report::{ConversionReport, ExitStatus};
pub use retry::{Convergence, DEFAULT_MAX_ROUNDS, RetryPolicy, RoundSummary, converge};
pub use schema::DocumentSchema;

pub use traits::{
    Executor, ImageLinks, Interrupt, RenderJob, RenderOutcome, Renderer, SvgTransform,
    SyncExecutor, TransformError, TranscriptTransform,
};
