//! Stage orchestration for a rendering run.
//!
//! - [`PipelineBuilder`]: Fluent builder wiring settings and collaborators
//! - [`ConversionPipeline`]: Runs the stages in sequence
//! - [`RunSummary`]: What a run did and how it ends
//!
//! # Example
//!
//! ```ignore
//! use diplo::{PipelineBuilder, Settings};
//!
//! let pipeline = PipelineBuilder::new(settings)
//!     .with_interrupt(interrupt)
//!     .build()?;
//! let summary = pipeline.run()?;
//! std::process::exit(summary.status.code().into());
//! ```

mod builder;
pub mod context;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use context::PipelineContext;
pub use orchestrator::{ConversionPipeline, RunSummary};
