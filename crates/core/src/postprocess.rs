//! Print preparation of rendered SVGs.

use crate::atomic::write_atomic;
use diplo_traits::{Executor, SvgTransform, TransformError};
use diplo_types::{OutputLayout, TranscriptPage};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PostProcessor {
    output: OutputLayout,
    transform: Arc<dyn SvgTransform>,
    stylesheet: String,
}

impl PostProcessor {
    pub fn new(output: OutputLayout, transform: Arc<dyn SvgTransform>, stylesheet: impl Into<String>) -> Self {
        Self {
            output,
            transform,
            stylesheet: stylesheet.into(),
        }
    }

    /// Prepares the SVGs of all successfully rendered pages.
    ///
    /// Returns the number of prepared pages. A stylesheet that does not
    /// validate skips post-processing entirely; single pages that fail are
    /// logged and skipped. Rendered SVGs are never modified.
    pub fn run<E: Executor>(&self, pages: Vec<TranscriptPage>, executor: &E) -> usize {
        if let Err(e) = self.transform.prepare(&self.stylesheet) {
            log::error!("Skipping SVG post-processing, stylesheet {} is unusable: {}", self.stylesheet, e);
            return 0;
        }
        log::info!("Preparing {} SVGs with {} ...", pages.len(), self.stylesheet);

        let processor = self.clone();
        let prepared = executor
            .execute_all(pages, move |page| match processor.prepare_page(&page) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Failed to prepare SVG for {}: {}", page, e);
                    false
                }
            })
            .into_iter()
            .filter(|ok| *ok)
            .count();
        log::info!("... prepared {} SVGs", prepared);
        prepared
    }

    fn prepare_page(&self, page: &TranscriptPage) -> Result<(), TransformError> {
        let svg = std::fs::read(self.output.svg(page))?;
        let prepared = self.transform.apply(&svg, &self.stylesheet)?;
        write_atomic(&self.output.prepared(page), &prepared)?;
        Ok(())
    }
}
