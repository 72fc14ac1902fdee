//! Lazy parsing of corpus documents into transcript pages.

use crate::error::DocumentError;
use crate::schema::DocumentSchema;
use diplo_types::{Basename, CorpusLayout, DocumentHeader, Sigil, TranscriptPage, Url, logical_uri};
use once_cell::sync::OnceCell;
use roxmltree::Node;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
struct Parsed {
    header: Arc<DocumentHeader>,
    pages: Vec<TranscriptPage>,
}

/// A document file of the corpus.
///
/// Nothing is read until the header or the pages are first requested; the
/// result of that first parse, including a failure, is kept for the lifetime
/// of the value.
#[derive(Debug)]
pub struct Document {
    source_path: PathBuf,
    relative: PathBuf,
    schema: Arc<DocumentSchema>,
    parsed: OnceCell<Option<Parsed>>,
}

impl Document {
    pub fn new(source_path: PathBuf, corpus_root: &Path, schema: Arc<DocumentSchema>) -> Self {
        let relative = source_path
            .strip_prefix(corpus_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| source_path.clone());
        Self {
            source_path,
            relative,
            schema,
            parsed: OnceCell::new(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn logical_uri(&self) -> String {
        logical_uri(&self.relative)
    }

    /// The header, or `None` if the document failed to parse.
    pub fn header(&self) -> Option<&Arc<DocumentHeader>> {
        self.parsed().map(|p| &p.header)
    }

    /// The pages in document order, numbered from 1.
    ///
    /// A document that fails to parse has no pages; the failure is logged
    /// once as a warning.
    pub fn pages(&self) -> &[TranscriptPage] {
        self.parsed().map(|p| p.pages.as_slice()).unwrap_or(&[])
    }

    fn parsed(&self) -> Option<&Parsed> {
        self.parsed
            .get_or_init(|| match self.parse() {
                Ok(parsed) => {
                    log::debug!(
                        "{}: {} pages ({})",
                        self.source_path.display(),
                        parsed.pages.len(),
                        parsed.header.sigil
                    );
                    Some(parsed)
                }
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            })
            .as_ref()
    }

    fn parse(&self) -> Result<Parsed, DocumentError> {
        let path = &self.source_path;
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = parse_xml(&text).map_err(|source| DocumentError::Xml {
            path: path.clone(),
            source,
        })?;
        let schema = &*self.schema;

        let base_value = doc
            .descendants()
            .filter(Node::is_element)
            .find_map(|n| local_attribute(n, &schema.base_attribute))
            .ok_or_else(|| DocumentError::MissingBase {
                path: path.clone(),
                attribute: schema.base_attribute.clone(),
            })?;
        let base = Url::parse(base_value).map_err(|source| DocumentError::InvalidBase {
            path: path.clone(),
            value: base_value.to_string(),
            source,
        })?;

        let sigil = doc
            .descendants()
            .find(|n| {
                is_element_named(*n, &schema.sigil_element)
                    && local_attribute(*n, "type") == Some(schema.sigil_type.as_str())
            })
            .map(|n| Sigil::new(text_content(n)))
            .filter(|s| !s.is_blank())
            .ok_or_else(|| DocumentError::MissingSigil {
                path: path.clone(),
                element: schema.sigil_element.clone(),
                kind: schema.sigil_type.clone(),
            })?;

        let header = Arc::new(DocumentHeader {
            source_path: path.clone(),
            relative: self.relative.clone(),
            base,
            basename: Basename::from_sigil(&sigil),
            sigil,
        });

        let pages = doc
            .descendants()
            .filter(|n| is_element_named(*n, &schema.page_element))
            .filter_map(|n| local_attribute(n, &schema.page_uri_attribute))
            .enumerate()
            .map(|(i, reference)| {
                let source_uri =
                    header
                        .base
                        .join(reference)
                        .map_err(|source| DocumentError::InvalidPageRef {
                            path: path.clone(),
                            reference: reference.to_string(),
                            source,
                        })?;
                Ok(TranscriptPage {
                    document: Arc::clone(&header),
                    page_ref: reference.to_string(),
                    source_uri,
                    page_number: i + 1,
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        Ok(Parsed { header, pages })
    }
}

/// Locates the text-image-link SVG a page transcript declares, if any.
///
/// Reads the page's source XML. An unreadable transcript counts as having no
/// links; the renderer reports the real problem when it runs.
pub fn image_link(
    corpus: &CorpusLayout,
    schema: &DocumentSchema,
    page: &TranscriptPage,
) -> Option<PathBuf> {
    let source = corpus.page_source(page);
    let text = match std::fs::read_to_string(&source) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("{}: cannot look up text-image-links: {}", source.display(), e);
            return None;
        }
    };
    let doc = parse_xml(&text).ok()?;
    let url = doc
        .descendants()
        .filter(|n| is_element_named(*n, &schema.graphic_element))
        .find(|n| local_attribute(*n, "mimeType") == Some(schema.graphic_mime_type.as_str()))
        .and_then(|n| local_attribute(n, &schema.graphic_url_attribute))?;
    match page.source_uri.join(url) {
        Ok(uri) => Some(corpus.resolve(&uri)),
        Err(e) => {
            log::warn!("{}: invalid text-image-link '{}': {}", page, url, e);
            None
        }
    }
}

fn parse_xml(text: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(text, options)
}

fn is_element_named(node: Node<'_, '_>, local: &str) -> bool {
    node.is_element() && node.tag_name().name() == local
}

/// Attribute lookup by local name, in any namespace.
fn local_attribute<'a>(node: Node<'a, '_>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == local)
        .map(|a| a.value())
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
