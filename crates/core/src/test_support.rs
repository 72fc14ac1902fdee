//! Fixtures shared by the unit tests of this crate.

use diplo_traits::{RenderJob, RenderOutcome, Renderer, SvgTransform, TransformError, TranscriptTransform};
use diplo_types::{Basename, DocumentHeader, Sigil, TranscriptPage, Url};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;

pub fn header(sigil: &str) -> Arc<DocumentHeader> {
    let sigil = Sigil::new(sigil);
    let basename = Basename::from_sigil(&sigil);
    Arc::new(DocumentHeader {
        source_path: PathBuf::from(format!("document/{basename}.xml")),
        relative: PathBuf::from(format!("document/{basename}.xml")),
        base: Url::parse(&format!("faust://xml/transcript/{basename}/")).unwrap(),
        basename,
        sigil,
    })
}

pub fn page_of(header: &Arc<DocumentHeader>, n: usize) -> TranscriptPage {
    let page_ref = format!("{n:04}.xml");
    TranscriptPage {
        document: Arc::clone(header),
        source_uri: header.base.join(&page_ref).unwrap(),
        page_ref,
        page_number: n,
    }
}

pub fn page(sigil: &str, n: usize) -> TranscriptPage {
    page_of(&header(sigil), n)
}

pub fn pages(sigil: &str, count: usize) -> Vec<TranscriptPage> {
    let header = header(sigil);
    (1..=count).map(|n| page_of(&header, n)).collect()
}

/// A transcript transform that returns the same bytes for every page.
#[derive(Debug)]
pub struct FixedTransform {
    output: Option<String>,
}

impl FixedTransform {
    pub fn json(output: &str) -> Self {
        Self {
            output: Some(output.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { output: None }
    }
}

impl TranscriptTransform for FixedTransform {
    fn transform(&self, source: &Path) -> Result<Vec<u8>, TransformError> {
        self.output
            .as_ref()
            .map(|s| s.as_bytes().to_vec())
            .ok_or_else(|| TransformError::InvalidOutput(source.display().to_string()))
    }
}

/// An SVG transform that appends a marker comment.
#[derive(Debug, Default)]
pub struct MarkingTransform;

impl SvgTransform for MarkingTransform {
    fn prepare(&self, stylesheet: &str) -> Result<(), TransformError> {
        if stylesheet.is_empty() {
            return Err(TransformError::InvalidStylesheet("empty".to_string()));
        }
        Ok(())
    }

    fn apply(&self, svg: &[u8], stylesheet: &str) -> Result<Vec<u8>, TransformError> {
        if svg.is_empty() {
            return Err(TransformError::Xml("empty document".to_string()));
        }
        let mut out = svg.to_vec();
        out.extend_from_slice(format!("<!-- {stylesheet} -->").as_bytes());
        Ok(out)
    }
}

/// A renderer that fails a fixed set of jobs and records every call.
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    failing: HashSet<String>,
    calls: Mutex<Vec<RenderJob>>,
}

impl ScriptedRenderer {
    /// Fails every job whose label is listed.
    pub fn failing(labels: &[&str]) -> Self {
        Self {
            failing: labels.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RenderJob> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for ScriptedRenderer {
    fn render(&self, job: &RenderJob) -> RenderOutcome {
        self.calls.lock().unwrap().push(job.clone());
        if self.failing.contains(&job.label) {
            RenderOutcome::failed("render failed\nrender failed")
        } else {
            RenderOutcome::succeeded("")
        }
    }

    fn name(&self) -> &'static str {
        "ScriptedRenderer"
    }
}
