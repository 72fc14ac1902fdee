//! Shared fixtures for the integration tests: a corpus on disk, a renderer
//! that writes SVGs without a browser, and a canned export transform.
#![allow(dead_code)]

use diplo::config::Settings;
use diplo_traits::{
    InMemoryAssetProvider, RenderJob, RenderOutcome, Renderer, TransformError, TranscriptTransform,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#;

/// A corpus and an output directory in a temporary location.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("xml/document"))?;
        Ok(Self { dir })
    }

    pub fn corpus_root(&self) -> PathBuf {
        self.dir.path().join("xml")
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Writes a document with `pages` page transcripts under `transcript/<slug>/`.
    pub fn add_document(&self, file: &str, sigil: &str, slug: &str, pages: usize) -> std::io::Result<()> {
        let refs: String = (1..=pages)
            .map(|n| format!("    <docTranscript uri=\"{n:04}.xml\"/>\n"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xml:base="faust://xml/transcript/{slug}/">
  <teiHeader>
    <fileDesc>
      <publicationStmt><idno type="faustedition">{sigil}</idno></publicationStmt>
    </fileDesc>
  </teiHeader>
  <sourceDoc>
{refs}  </sourceDoc>
</TEI>
"#
        );
        std::fs::write(self.corpus_root().join("document").join(file), xml)?;

        let transcripts = self.corpus_root().join("transcript").join(slug);
        std::fs::create_dir_all(&transcripts)?;
        for n in 1..=pages {
            std::fs::write(
                transcripts.join(format!("{n:04}.xml")),
                r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><text/></TEI>"#,
            )?;
        }
        Ok(())
    }

    /// Declares a text-image-link graphic in one page transcript.
    pub fn add_image_link(&self, slug: &str, page: usize, url: &str) -> std::io::Result<()> {
        let xml = format!(
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><facsimile><graphic mimeType="image/svg+xml" url="{url}"/></facsimile><text/></TEI>"#
        );
        std::fs::write(
            self.corpus_root()
                .join("transcript")
                .join(slug)
                .join(format!("{page:04}.xml")),
            xml,
        )
    }

    pub fn add_raw_document(&self, file: &str, contents: &str) -> std::io::Result<()> {
        std::fs::write(self.corpus_root().join("document").join(file), contents)
    }

    /// Settings pointing at this workspace, single-threaded.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.corpus.root = self.corpus_root();
        settings.output.root = self.output_root();
        settings.export.command = vec!["unused".to_string()];
        settings.render.threads = 1;
        settings
    }

    pub fn read(&self, relative: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.output_root().join(relative))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.output_root().join(relative).is_file()
    }
}

/// The webapp the renderer would load, held in memory.
pub fn webapp() -> InMemoryAssetProvider {
    let provider = InMemoryAssetProvider::new();
    provider
        .add("transcript-generation.html", b"<html><body>diplomatic</body></html>".to_vec())
        .unwrap();
    provider.add("js/render.js", b"console.log('render');".to_vec()).unwrap();
    provider
}

/// Returns the same JSON for every transcript.
#[derive(Debug)]
pub struct StaticJson(pub &'static str);

impl TranscriptTransform for StaticJson {
    fn transform(&self, source: &Path) -> Result<Vec<u8>, TransformError> {
        if !source.is_file() {
            return Err(TransformError::InvalidOutput(format!("{} is missing", source.display())));
        }
        Ok(self.0.as_bytes().to_vec())
    }
}

/// Writes an SVG for every job except those whose label keeps failing.
///
/// A label in `flaky` fails its first `n` attempts only.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    failing: HashSet<String>,
    flaky: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn failing(labels: &[&str]) -> Self {
        Self {
            failing: labels.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn flaky(mut self, label: &str, failures: usize) -> Self {
        self.flaky.get_mut().unwrap().insert(label.to_string(), failures);
        self
    }

    /// The labels of every job, in the order they ran.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn should_fail(&self, label: &str) -> bool {
        if self.failing.contains(label) {
            return true;
        }
        let mut flaky = self.flaky.lock().unwrap();
        match flaky.get_mut(label) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

impl Renderer for FakeRenderer {
    fn render(&self, job: &RenderJob) -> RenderOutcome {
        self.calls.lock().unwrap().push(job.label.clone());
        if !job.json.is_file() {
            return RenderOutcome::failed(format!("{} missing", job.json.display()));
        }
        if self.should_fail(&job.label) {
            return RenderOutcome::failed("TypeError: undefined is not a function");
        }
        for output in job.outputs() {
            let written = output
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|_| std::fs::write(output, SVG));
            if let Err(e) = written {
                return RenderOutcome::failed(e.to_string());
            }
        }
        RenderOutcome::succeeded("")
    }

    fn name(&self) -> &'static str {
        "FakeRenderer"
    }
}
