//! One render round: every page rendered once, in parallel.

use crate::document::image_link;
use crate::schema::DocumentSchema;
use diplo_traits::{Executor, ImageLinks, Interrupt, RenderJob, Renderer};
use diplo_types::{CorpusLayout, OutputLayout, TranscriptPage};
use itertools::Itertools;
use std::sync::Arc;

/// Everything a worker needs to render a page, shared across the pool.
#[derive(Debug, Clone)]
struct JobContext {
    corpus: CorpusLayout,
    output: OutputLayout,
    schema: DocumentSchema,
    renderer: Arc<dyn Renderer>,
    server_url: String,
    interrupt: Interrupt,
    debug: bool,
}

impl JobContext {
    fn job(&self, page: &TranscriptPage) -> RenderJob {
        let links = image_link(&self.corpus, &self.schema, page).map(|source| ImageLinks {
            source,
            overlay: self.output.overlay(page),
        });
        if links.is_none() {
            log::debug!("{} has no text-image-links", page);
        }
        RenderJob {
            label: page.id().to_string(),
            server_url: self.server_url.clone(),
            json: self.output.json(page),
            svg: self.output.svg(page),
            links,
        }
    }

    /// Renders one page, returning it back if the render failed.
    fn render(&self, page: TranscriptPage) -> Option<TranscriptPage> {
        if self.interrupt.is_triggered() {
            return Some(page);
        }
        log::debug!("Converting {}", page);
        let job = self.job(&page);
        let outcome = self.renderer.render(&job);
        if !outcome.success {
            log::error!(
                "Failed to convert SVG for {}. Script output:\n{}",
                page.source_uri,
                outcome.output
            );
            Some(page)
        } else {
            if !self.debug && outcome.output.len() > 2 {
                log::warn!(
                    "Conversion to SVG for {} issued messages:\n{}",
                    page.source_uri,
                    outcome.output
                );
            }
            None
        }
    }
}

/// Runs render rounds over sets of pages.
#[derive(Debug, Clone)]
pub struct RenderDispatcher<E: Executor> {
    executor: E,
    context: Arc<JobContext>,
}

impl<E: Executor> RenderDispatcher<E> {
    pub fn new(
        executor: E,
        renderer: Arc<dyn Renderer>,
        corpus: CorpusLayout,
        output: OutputLayout,
        schema: DocumentSchema,
        server_url: impl Into<String>,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            executor,
            context: Arc::new(JobContext {
                corpus,
                output,
                schema,
                renderer,
                server_url: server_url.into(),
                interrupt,
                debug: false,
            }),
        }
    }

    /// In debug mode, renderer output of successful runs is not echoed.
    pub fn with_debug(mut self, debug: bool) -> Self {
        Arc::make_mut(&mut self.context).debug = debug;
        self
    }

    /// Renders every page once and returns the pages that failed, in input order.
    ///
    /// Pages not yet started when the run is interrupted count as failed.
    pub fn dispatch(&self, pages: Vec<TranscriptPage>) -> Vec<TranscriptPage> {
        log::info!(
            "Rendering {} pages in {} parallel jobs ...",
            pages.len(),
            self.executor.parallelism()
        );
        let context = Arc::clone(&self.context);
        let failed: Vec<TranscriptPage> = self
            .executor
            .execute_all(pages, move |page| context.render(page))
            .into_iter()
            .flatten()
            .collect();
        log::info!(
            "... rendering failed for {} pages:\n\t{}",
            failed.len(),
            failed.iter().join("\n\t")
        );
        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedRenderer, pages};
    use diplo_traits::SyncExecutor;
    use std::path::PathBuf;

    fn dispatcher(renderer: Arc<ScriptedRenderer>, interrupt: Interrupt) -> RenderDispatcher<SyncExecutor> {
        RenderDispatcher::new(
            SyncExecutor::new(),
            renderer,
            CorpusLayout::new("data/xml"),
            OutputLayout::new("target"),
            DocumentSchema::default(),
            "http://localhost:8000/transcript-generation.html",
            interrupt,
        )
    }

    #[test]
    fn test_dispatch_returns_failed_pages() {
        let renderer = Arc::new(ScriptedRenderer::failing(&["A#2", "A#4"]));
        let dispatcher = dispatcher(renderer.clone(), Interrupt::new());

        let failed = dispatcher.dispatch(pages("A", 5));
        assert_eq!(
            failed.iter().map(|p| p.page_number).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(renderer.calls().len(), 5);
    }

    #[test]
    fn test_jobs_address_layout_paths() {
        let renderer = Arc::new(ScriptedRenderer::default());
        let dispatcher = dispatcher(renderer.clone(), Interrupt::new());

        dispatcher.dispatch(pages("2 H", 1));
        let job = &renderer.calls()[0];
        assert_eq!(job.label, "2_H#1");
        assert_eq!(job.json, PathBuf::from("target/pages/2_H/page_1.json"));
        assert_eq!(
            job.svg,
            PathBuf::from("target/www/transcript/diplomatic/2_H/page_1.svg")
        );
        assert_eq!(job.server_url, "http://localhost:8000/transcript-generation.html");
        assert!(job.links.is_none());
    }

    #[test]
    fn test_interrupted_dispatch_skips_renders() {
        let renderer = Arc::new(ScriptedRenderer::default());
        let interrupt = Interrupt::new();
        interrupt.trigger();
        let dispatcher = dispatcher(renderer.clone(), interrupt);

        let failed = dispatcher.dispatch(pages("A", 3));
        assert_eq!(failed.len(), 3);
        assert!(renderer.calls().is_empty());
    }
}
