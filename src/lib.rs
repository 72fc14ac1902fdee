//! # diplo
//!
//! Renders the diplomatic transcripts of a document corpus to SVG.
//!
//! The binary wires the pieces of the workspace together: configuration and
//! CLI, the local asset server the renderer loads its webapp from, the
//! rendering engine subprocess, the export command, and Ctrl+C handling.
//! The domain logic lives in `diplo-core`.

pub mod cli;
pub mod config;
pub mod interrupt;
pub mod logging;
pub mod pipeline;
pub mod renderer;
pub mod server;
pub mod transform;

pub use cli::Cli;
pub use config::{ConfigError, Engine, EngineSettings, Settings};
pub use pipeline::{ConversionPipeline, PipelineBuilder, PipelineContext, RunSummary};
pub use renderer::ProcessRenderer;
pub use server::{AssetServer, AssetServerGuard};
pub use transform::{CommandTransform, StylesheetInjector};

pub use diplo_core::{ExitStatus, PipelineError};
pub use diplo_executor::ExecutorImpl;
pub use diplo_traits::{Interrupt, RenderJob, RenderOutcome, Renderer};
