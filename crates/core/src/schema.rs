use serde::{Deserialize, Serialize};

/// Element and attribute names the document parser looks for.
///
/// All names are matched against local names, so namespace prefixes in the
/// source XML never matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSchema {
    /// Attribute holding the base URI of the page references (`xml:base`).
    pub base_attribute: String,
    /// Element declaring one transcript page.
    pub page_element: String,
    /// Attribute of `page_element` holding the page reference.
    pub page_uri_attribute: String,
    /// Element holding the sigil.
    pub sigil_element: String,
    /// Required `type` attribute value of `sigil_element`.
    pub sigil_type: String,
    /// Element declaring a graphic in a page transcript.
    pub graphic_element: String,
    /// `mimeType` that marks a graphic as the text-image-link SVG.
    pub graphic_mime_type: String,
    /// Attribute of `graphic_element` holding the link URI.
    pub graphic_url_attribute: String,
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self {
            base_attribute: "base".to_string(),
            page_element: "docTranscript".to_string(),
            page_uri_attribute: "uri".to_string(),
            sigil_element: "idno".to_string(),
            sigil_type: "faustedition".to_string(),
            graphic_element: "graphic".to_string(),
            graphic_mime_type: "image/svg+xml".to_string(),
            graphic_url_attribute: "url".to_string(),
        }
    }
}
