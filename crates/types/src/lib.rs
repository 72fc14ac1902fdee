pub mod document;
pub mod ids;
pub mod layout;

pub use document::{CORPUS_URI_PREFIX, DocumentHeader, PageId, TranscriptPage, logical_uri};
pub use ids::{Basename, Sigil};
pub use layout::{ArtifactKind, CorpusLayout, OutputLayout};
pub use url::Url;
