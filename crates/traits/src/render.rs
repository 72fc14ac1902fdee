//! Renderer trait for abstracting the external page renderer.
//!
//! The dispatcher only needs to know whether a render of one page succeeded
//! and what it printed. Spawning a headless browser, a test double that
//! fails on purpose, or anything else can sit behind this trait.

use std::fmt::Debug;
use std::path::PathBuf;

/// The image-link input and overlay output of a page whose transcript
/// declares a text-image-link graphic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLinks {
    /// The image-link SVG read by the renderer.
    pub source: PathBuf,
    /// Where the overlay SVG is written.
    pub overlay: PathBuf,
}

/// Everything the renderer needs to produce the SVGs of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Human-readable page identity used in log messages.
    pub label: String,
    pub server_url: String,
    pub json: PathBuf,
    pub svg: PathBuf,
    pub links: Option<ImageLinks>,
}

impl RenderJob {
    /// Every path the renderer writes to.
    pub fn outputs(&self) -> Vec<&PathBuf> {
        let mut outputs = vec![&self.svg];
        if let Some(links) = &self.links {
            outputs.push(&links.overlay);
        }
        outputs
    }
}

/// The result of a single render attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    pub success: bool,
    /// Captured output, already de-duplicated line-wise.
    pub output: String,
}

impl RenderOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Renders one page from its JSON intermediate.
///
/// Implementations must be safe to call from many worker threads at once.
/// They never return an error: every way a render can go wrong is reported
/// as an unsuccessful [`RenderOutcome`].
pub trait Renderer: Send + Sync + Debug {
    fn render(&self, job: &RenderJob) -> RenderOutcome;

    /// The command line a job is run with, for logging at startup.
    fn command_line(&self, _server_url: &str) -> Option<String> {
        None
    }

    /// Returns a human-readable name for this renderer (for logging/debugging).
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_include_overlay_only_with_links() {
        let mut job = RenderJob {
            label: "A#1".to_string(),
            server_url: "http://localhost:1/".to_string(),
            json: PathBuf::from("pages/A/page_1.json"),
            svg: PathBuf::from("diplomatic/A/page_1.svg"),
            links: None,
        };
        assert_eq!(job.outputs(), vec![&PathBuf::from("diplomatic/A/page_1.svg")]);

        job.links = Some(ImageLinks {
            source: PathBuf::from("links/1.svg"),
            overlay: PathBuf::from("overlay/A/page_1.svg"),
        });
        assert_eq!(job.outputs().len(), 2);
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(RenderOutcome::succeeded("").success);
        let failed = RenderOutcome::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.output, "boom");
    }
}
