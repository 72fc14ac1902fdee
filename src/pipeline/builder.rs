use super::context::PipelineContext;
use super::orchestrator::ConversionPipeline;
use crate::config::Settings;
use crate::renderer::ProcessRenderer;
use crate::transform::{CommandTransform, StylesheetInjector};
use diplo_core::PipelineError;
use diplo_executor::ExecutorImpl;
use diplo_resource::FilesystemAssetProvider;
use diplo_traits::{
    AssetProvider, Executor, Interrupt, Renderer, SvgTransform, TranscriptTransform,
};
use std::sync::Arc;

/// A builder for creating a `ConversionPipeline`.
///
/// Every collaborator defaults to the one described by the settings: the
/// configured rendering engine as a subprocess, the export command, the
/// stylesheet injector and the webapp directory on disk.
#[derive(Debug)]
pub struct PipelineBuilder {
    settings: Settings,
    renderer: Option<Arc<dyn Renderer>>,
    transform: Option<Arc<dyn TranscriptTransform>>,
    svg_transform: Option<Arc<dyn SvgTransform>>,
    assets: Option<Arc<dyn AssetProvider>>,
    executor: Option<ExecutorImpl>,
    interrupt: Interrupt,
}

impl PipelineBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            renderer: None,
            transform: None,
            svg_transform: None,
            assets: None,
            executor: None,
            interrupt: Interrupt::new(),
        }
    }

    /// Replaces the rendering engine subprocess.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Replaces the export command.
    pub fn with_transform(mut self, transform: Arc<dyn TranscriptTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_svg_transform(mut self, transform: Arc<dyn SvgTransform>) -> Self {
        self.svg_transform = Some(transform);
        self
    }

    /// Serves assets from `provider` instead of the webapp directory.
    pub fn with_asset_provider(mut self, provider: Arc<dyn AssetProvider>) -> Self {
        self.assets = Some(provider);
        self
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Shares the run's cancellation flag, usually wired to Ctrl+C.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Consumes the builder and creates the `ConversionPipeline`.
    pub fn build(self) -> Result<ConversionPipeline, PipelineError> {
        let settings = self.settings;
        let executor = match self.executor {
            Some(executor) => executor,
            None => ExecutorImpl::with_threads(settings.render.threads)
                .map_err(|e| PipelineError::Config(e.to_string()))?,
        };
        log::debug!(
            "Using {} with {} workers",
            executor.name(),
            executor.parallelism()
        );

        let renderer = match self.renderer {
            Some(renderer) => renderer,
            None => {
                let engine = settings.render.active_engine();
                Arc::new(
                    ProcessRenderer::new(engine, self.interrupt.clone())
                        .with_debug(settings.render.debug, &engine.debug_flag)
                        .with_timeout(settings.render.timeout()),
                )
            }
        };

        let transform = match self.transform {
            Some(transform) => transform,
            None if settings.export.command.is_empty() && !settings.server.server_only => {
                return Err(PipelineError::Config(
                    "No export command configured. Set `export.command` or use `with_transform`."
                        .to_string(),
                ));
            }
            None => Arc::new(CommandTransform::new(settings.export.command.clone())),
        };

        let svg_transform = self
            .svg_transform
            .unwrap_or_else(|| Arc::new(StylesheetInjector::new()));
        let assets = self
            .assets
            .unwrap_or_else(|| Arc::new(FilesystemAssetProvider::new(&settings.server.webapp_dir)));

        let context = PipelineContext::new(settings, executor, self.interrupt);
        Ok(ConversionPipeline::new(
            context,
            renderer,
            transform,
            svg_transform,
            assets,
        ))
    }
}
