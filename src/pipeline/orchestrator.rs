use super::context::PipelineContext;
use crate::interrupt::wait_for;
use crate::server::{AssetServer, AssetServerGuard};
use diplo_core::{
    ConversionReport, Convergence, Corpus, ExitStatus, JobManifestWriter, PipelineError,
    PostProcessor, RenderDispatcher, RetryPolicy, TranscriptExporter, converge,
};
use diplo_source::DocumentScanner;
use diplo_traits::{AssetProvider, Renderer, SvgTransform, TranscriptTransform};
use diplo_types::{PageId, TranscriptPage};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Counters of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub pages: usize,
    pub exported: usize,
    pub rendered: usize,
    pub failed: usize,
    pub rounds: usize,
    pub prepared: usize,
    pub status: ExitStatus,
}

impl RunSummary {
    fn empty() -> Self {
        Self {
            documents: 0,
            pages: 0,
            exported: 0,
            rendered: 0,
            failed: 0,
            rounds: 0,
            prepared: 0,
            status: ExitStatus::Success,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} pages: {} exported, {} rendered, {} failed after {} rounds, {} prepared",
            self.documents,
            self.pages,
            self.exported,
            self.rendered,
            self.failed,
            self.rounds,
            self.prepared
        )
    }
}

/// The diplomatic rendering pipeline.
///
/// `run` executes the stages strictly in sequence: scan, snapshot, export,
/// manifest, serve + render until convergence, post-process, report. Each
/// stage takes and returns plain collections.
#[derive(Debug)]
pub struct ConversionPipeline {
    context: PipelineContext,
    renderer: Arc<dyn Renderer>,
    transform: Arc<dyn TranscriptTransform>,
    svg_transform: Arc<dyn SvgTransform>,
    assets: Arc<dyn AssetProvider>,
}

impl ConversionPipeline {
    pub(super) fn new(
        context: PipelineContext,
        renderer: Arc<dyn Renderer>,
        transform: Arc<dyn TranscriptTransform>,
        svg_transform: Arc<dyn SvgTransform>,
        assets: Arc<dyn AssetProvider>,
    ) -> Self {
        Self {
            context,
            renderer,
            transform,
            svg_transform,
            assets,
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Runs the whole conversion.
    ///
    /// # Errors
    ///
    /// Fails on an unreadable corpus, an unwritable manifest, an asset
    /// server that cannot start, and on interruption. Page-level failures
    /// are not errors; they end up in the summary's exit status.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        if self.context.settings.server.server_only {
            return self.serve_only();
        }

        let corpus = self.snapshot(self.scan()?);
        let pages = corpus.pages();
        log::info!(
            "Found {} pages in {} documents",
            pages.len(),
            corpus.documents().len()
        );
        self.context.check_interrupt()?;

        let batch = self.export(pages);
        self.context.check_interrupt()?;
        self.write_manifest(&corpus)?;

        let server = self.start_server()?;
        let convergence = self.render(batch.pages.clone(), server.url());
        server.stop();
        if convergence.interrupted {
            return Err(PipelineError::Interrupted);
        }

        let rendered = succeeded(&batch.pages, &convergence.failed);
        let prepared = self.postprocess(rendered.clone());
        let status = self.report(&convergence);

        Ok(RunSummary {
            documents: corpus.documents().len(),
            pages: batch.pages.len(),
            exported: batch.written,
            rendered: rendered.len(),
            failed: convergence.failed.len(),
            rounds: convergence.tries(),
            prepared,
            status,
        })
    }

    fn serve_only(&self) -> Result<RunSummary, PipelineError> {
        let server = self.start_server()?;
        log::info!("Hit Ctrl+C to interrupt");
        wait_for(&self.context.interrupt);
        server.stop();
        Ok(RunSummary::empty())
    }

    fn scan(&self) -> Result<Vec<std::path::PathBuf>, PipelineError> {
        let corpus = &self.context.settings.corpus;
        Ok(DocumentScanner::new(&corpus.root, &corpus.document_dir).scan()?)
    }

    fn snapshot(&self, paths: Vec<std::path::PathBuf>) -> Corpus {
        Corpus::load(
            self.context.corpus.clone(),
            Arc::new(self.context.settings.corpus.schema.clone()),
            paths,
        )
    }

    fn export(&self, pages: Vec<TranscriptPage>) -> diplo_core::ExportBatch {
        TranscriptExporter::new(
            self.context.corpus.clone(),
            self.context.output.clone(),
            Arc::clone(&self.transform),
        )
        .export_all(pages, &self.context.executor)
    }

    fn write_manifest(&self, corpus: &Corpus) -> Result<(), PipelineError> {
        JobManifestWriter::new(self.context.output.clone())
            .with_per_document_jobs(self.context.settings.output.per_document_jobs)
            .write(corpus)?;
        Ok(())
    }

    fn start_server(&self) -> Result<AssetServerGuard, PipelineError> {
        let server = &self.context.settings.server;
        let guard = AssetServer::new(Arc::clone(&self.assets), &server.entry, server.port).start()?;
        if let Some(command) = self.renderer.command_line(guard.url()) {
            log::info!("Renderer command line: {}", command);
        }
        Ok(guard)
    }

    fn render(&self, pages: Vec<TranscriptPage>, server_url: &str) -> Convergence {
        let render = &self.context.settings.render;
        let dispatcher = RenderDispatcher::new(
            self.context.executor.clone(),
            Arc::clone(&self.renderer),
            self.context.corpus.clone(),
            self.context.output.clone(),
            self.context.settings.corpus.schema.clone(),
            server_url,
            self.context.interrupt.clone(),
        )
        .with_debug(render.debug);

        converge(
            pages,
            RetryPolicy {
                max_rounds: render.max_rounds,
            },
            &self.context.interrupt,
            |pages| dispatcher.dispatch(pages),
        )
    }

    fn postprocess(&self, pages: Vec<TranscriptPage>) -> usize {
        match &self.context.settings.postprocess.stylesheet {
            Some(stylesheet) => PostProcessor::new(
                self.context.output.clone(),
                Arc::clone(&self.svg_transform),
                stylesheet.clone(),
            )
            .run(pages, &self.context.executor),
            None => 0,
        }
    }

    fn report(&self, convergence: &Convergence) -> ExitStatus {
        ConversionReport::new(
            &convergence.failed,
            convergence.tries(),
            self.context.settings.render.allowed_failures,
        )
        .conclude()
    }
}

/// The pages of `all` that are not in `failed`, in order.
fn succeeded(all: &[TranscriptPage], failed: &[TranscriptPage]) -> Vec<TranscriptPage> {
    let failed: HashSet<PageId> = failed.iter().map(TranscriptPage::id).collect();
    all.iter()
        .filter(|p| !failed.contains(&p.id()))
        .cloned()
        .collect()
}
