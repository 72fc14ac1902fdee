use crate::config::Settings;
use diplo_executor::ExecutorImpl;
use diplo_traits::Interrupt;
use diplo_types::{CorpusLayout, OutputLayout};
use std::sync::Arc;

/// A container for the shared, read-only state of one run.
/// Created once by the `PipelineBuilder` and handed to every stage.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub settings: Arc<Settings>,
    pub corpus: CorpusLayout,
    pub output: OutputLayout,
    pub executor: ExecutorImpl,
    pub interrupt: Interrupt,
}

impl PipelineContext {
    pub fn new(settings: Settings, executor: ExecutorImpl, interrupt: Interrupt) -> Self {
        Self {
            corpus: CorpusLayout::new(&settings.corpus.root),
            output: OutputLayout::new(&settings.output.root),
            settings: Arc::new(settings),
            executor,
            interrupt,
        }
    }

    /// Fails with `Interrupted` once Ctrl+C was hit.
    pub fn check_interrupt(&self) -> Result<(), diplo_core::PipelineError> {
        if self.interrupt.is_triggered() {
            Err(diplo_core::PipelineError::Interrupted)
        } else {
            Ok(())
        }
    }
}
