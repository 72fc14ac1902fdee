//! The render manifest: every document, page and render parameter of a run.

use crate::atomic::write_atomic;
use crate::corpus::Corpus;
use crate::document::image_link;
use crate::error::PipelineError;
use diplo_types::{Basename, OutputLayout, TranscriptPage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One page of a document job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub json: String,
    #[serde(rename = "pageNo")]
    pub page_no: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,
    pub out: String,
}

/// All pages of one document, as read by the multi-page renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentJob {
    pub sigil: String,
    pub pdfname: String,
    pub transcripts: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone)]
pub struct JobManifestWriter {
    output: OutputLayout,
    per_document_jobs: bool,
}

impl JobManifestWriter {
    pub fn new(output: OutputLayout) -> Self {
        Self {
            output,
            per_document_jobs: false,
        }
    }

    /// Also write one job file per document under `render-jobs/`.
    pub fn with_per_document_jobs(mut self, enabled: bool) -> Self {
        self.per_document_jobs = enabled;
        self
    }

    /// Describes every document that has pages.
    pub fn build(&self, corpus: &Corpus) -> Vec<DocumentJob> {
        self.build_keyed(corpus).into_iter().map(|(_, job)| job).collect()
    }

    fn build_keyed(&self, corpus: &Corpus) -> Vec<(Basename, DocumentJob)> {
        corpus
            .documents()
            .iter()
            .filter(|d| !d.pages().is_empty())
            .filter_map(|d| {
                let header = d.header()?;
                let job = DocumentJob {
                    sigil: header.sigil.to_string(),
                    pdfname: display(&self.output.document_pdf(header.basename.as_str())),
                    transcripts: d
                        .pages()
                        .iter()
                        .map(|page| self.entry(corpus, page))
                        .collect(),
                };
                Some((header.basename.clone(), job))
            })
            .collect()
    }

    fn entry(&self, corpus: &Corpus, page: &TranscriptPage) -> TranscriptEntry {
        TranscriptEntry {
            json: display(&self.output.json(page)),
            page_no: page.page_number,
            links: image_link(corpus.layout(), corpus.schema(), page).map(|p| display(&p)),
            out: display(&self.output.svg(page)),
        }
    }

    /// Writes `render-job.json` (and the per-document files, if enabled).
    pub fn write(&self, corpus: &Corpus) -> Result<Vec<DocumentJob>, PipelineError> {
        let keyed = self.build_keyed(corpus);
        let jobs: Vec<&DocumentJob> = keyed.iter().map(|(_, job)| job).collect();
        let manifest = self.output.manifest();
        write_atomic(&manifest, &serde_json::to_vec_pretty(&jobs)?)?;
        log::info!(
            "Wrote render manifest for {} documents to {}",
            jobs.len(),
            manifest.display()
        );

        if self.per_document_jobs {
            for (basename, job) in &keyed {
                write_atomic(
                    &self.output.document_job(basename.as_str()),
                    &serde_json::to_vec_pretty(job)?,
                )?;
            }
            log::debug!("Wrote {} per-document render jobs", keyed.len());
        }
        Ok(keyed.into_iter().map(|(_, job)| job).collect())
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
