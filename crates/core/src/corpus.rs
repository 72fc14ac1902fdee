//! The in-memory snapshot of a corpus.
//!
//! The corpus is traversed once. Export, the manifest and rendering all work
//! from this snapshot, so they can never disagree about which pages exist.

use crate::document::Document;
use crate::schema::DocumentSchema;
use diplo_types::{CorpusLayout, TranscriptPage};
use itertools::Itertools;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct Corpus {
    layout: CorpusLayout,
    schema: Arc<DocumentSchema>,
    documents: Vec<Document>,
}

impl Corpus {
    /// Builds the snapshot for the given document files.
    ///
    /// Documents are parsed eagerly here, in path order.
    pub fn load(layout: CorpusLayout, schema: Arc<DocumentSchema>, paths: Vec<PathBuf>) -> Self {
        let documents: Vec<Document> = paths
            .into_iter()
            .map(|path| Document::new(path, layout.root(), Arc::clone(&schema)))
            .collect();
        for document in &documents {
            document.pages();
        }

        let corpus = Self {
            layout,
            schema,
            documents,
        };
        for basename in corpus
            .documents
            .iter()
            .filter_map(|d| d.header())
            .map(|h| &h.basename)
            .duplicates()
        {
            log::warn!(
                "Several documents share the basename '{}'; their artifacts overwrite each other",
                basename
            );
        }
        corpus
    }

    pub fn layout(&self) -> &CorpusLayout {
        &self.layout
    }

    pub fn schema(&self) -> &DocumentSchema {
        &self.schema
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Every page of every document, in document order.
    pub fn pages(&self) -> Vec<TranscriptPage> {
        self.documents
            .iter()
            .flat_map(|d| d.pages().iter().cloned())
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.documents.iter().map(|d| d.pages().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn doc(sigil: &str, pages: usize) -> String {
        let refs: String = (1..=pages)
            .map(|i| format!(r#"<docTranscript uri="{i:04}.xml"/>"#))
            .collect();
        format!(
            r#"<document xml:base="faust://xml/transcript/{sigil}/"><idno type="faustedition">{sigil}</idno>{refs}</document>"#
        )
    }

    #[test]
    fn test_pages_flattened_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("document");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("a.xml"), doc("A", 2)).unwrap();
        fs::write(docs.join("b.xml"), "<broken").unwrap();
        fs::write(docs.join("c.xml"), doc("C", 1)).unwrap();

        let corpus = Corpus::load(
            CorpusLayout::new(dir.path()),
            Arc::new(DocumentSchema::default()),
            vec![docs.join("a.xml"), docs.join("b.xml"), docs.join("c.xml")],
        );

        assert_eq!(corpus.documents().len(), 3);
        assert_eq!(corpus.page_count(), 3);
        let ids: Vec<String> = corpus.pages().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["A#1", "A#2", "C#1"]);
    }
}
