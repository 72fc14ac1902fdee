//! Serializes page transcripts into the JSON intermediates the renderer reads.

use crate::atomic::write_atomic;
use crate::error::ExportError;
use diplo_traits::{Executor, TranscriptTransform};
use diplo_types::{CorpusLayout, OutputLayout, TranscriptPage};
use serde::de::IgnoredAny;
use std::sync::Arc;

/// The pages of an export run and how many of them got their JSON.
#[derive(Debug)]
pub struct ExportBatch {
    pub pages: Vec<TranscriptPage>,
    pub written: usize,
}

/// Writes the JSON intermediate of each page.
///
/// Export never fails a page outright: errors are logged and the page is
/// passed on, so the renderer reports it as a failure later.
#[derive(Debug, Clone)]
pub struct TranscriptExporter {
    corpus: CorpusLayout,
    output: OutputLayout,
    transform: Arc<dyn TranscriptTransform>,
}

impl TranscriptExporter {
    pub fn new(
        corpus: CorpusLayout,
        output: OutputLayout,
        transform: Arc<dyn TranscriptTransform>,
    ) -> Self {
        Self {
            corpus,
            output,
            transform,
        }
    }

    /// Exports one page and hands it back.
    pub fn export(&self, page: TranscriptPage) -> TranscriptPage {
        self.export_logged(page).0
    }

    fn export_logged(&self, page: TranscriptPage) -> (TranscriptPage, bool) {
        match self.try_export(&page) {
            Ok(()) => (page, true),
            Err(e) => {
                log::error!("Failed to generate JSON for {}: {}", page.source_uri, e);
                (page, false)
            }
        }
    }

    /// Exports one page, reporting whether its JSON was written.
    pub fn try_export(&self, page: &TranscriptPage) -> Result<(), ExportError> {
        let source = self.corpus.page_source(page);
        let json = self.transform.transform(&source)?;
        serde_json::from_slice::<IgnoredAny>(&json)?;
        write_atomic(&self.output.json(page), &json)?;
        Ok(())
    }

    /// Exports all pages on the executor.
    ///
    /// Every page is passed on, in input order, whether or not its export
    /// succeeded.
    pub fn export_all<E: Executor>(&self, pages: Vec<TranscriptPage>, executor: &E) -> ExportBatch {
        log::info!("Converting {} diplomatic transcripts to JSON ...", pages.len());
        let exporter = self.clone();
        let results = executor.execute_all(pages, move |page| exporter.export_logged(page));
        let written = results.iter().filter(|(_, ok)| *ok).count();
        ExportBatch {
            pages: results.into_iter().map(|(page, _)| page).collect(),
            written,
        }
    }
}
