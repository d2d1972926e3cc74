//! Album page metadata extraction
//!
//! Walks a parsed HTML document in document order looking for the two
//! `<meta>` tags that carry the artwork URL and the album title.

use scraper::{ElementRef, Html};

use crate::config::ExtractionConfig;
use crate::types::AlbumMetadata;

/// Field name reported when the artwork tag is missing
pub const IMAGE_FIELD: &str = "image";
/// Field name reported when the title tag is missing
pub const TITLE_FIELD: &str = "title";

/// Result of scanning one page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Both fields were found
    Complete(AlbumMetadata),
    /// The document ended before both fields were found
    Incomplete {
        /// Names of the fields that were not found
        missing: Vec<String>,
    },
}

/// Extracts [`AlbumMetadata`] from album pages
#[derive(Clone, Debug, Default)]
pub struct PageExtractor {
    config: ExtractionConfig,
}

impl PageExtractor {
    /// Create an extractor for the configured tag/attribute names
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Parse an HTML document
    ///
    /// html5ever recovers from malformed markup, so parsing itself never fails.
    pub fn parse(body: &str) -> Html {
        Html::parse_document(body)
    }

    /// Scan a document for the artwork URL and title
    ///
    /// The first matching tag with non-blank content wins for each field, and
    /// its content is recorded verbatim. Traversal stops as soon as both
    /// fields are recorded.
    pub fn extract(&self, document: &Html) -> ExtractOutcome {
        let mut image: Option<String> = None;
        let mut title: Option<String> = None;

        // descendants() is a pre-order walk: node, then children in sibling order
        for node in document.tree.root().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            if !element.value().name().eq_ignore_ascii_case(&self.config.tag) {
                continue;
            }
            let Some(key) = element.value().attr(&self.config.key_attribute) else {
                continue;
            };

            let slot = if key == self.config.image_key {
                &mut image
            } else if key == self.config.title_key {
                &mut title
            } else {
                continue;
            };
            if slot.is_some() {
                continue;
            }
            if let Some(content) = element
                .value()
                .attr(&self.config.content_attribute)
                .filter(|c| !c.trim().is_empty())
            {
                *slot = Some(content.to_string());
            }

            if image.is_some() && title.is_some() {
                break;
            }
        }

        match (image, title) {
            (Some(image), Some(title)) => ExtractOutcome::Complete(AlbumMetadata { image, title }),
            (image, title) => {
                let mut missing = Vec::new();
                if image.is_none() {
                    missing.push(IMAGE_FIELD.to_string());
                }
                if title.is_none() {
                    missing.push(TITLE_FIELD.to_string());
                }
                ExtractOutcome::Incomplete { missing }
            }
        }
    }
}

/// Whether a `Content-Type` header value names an HTML (or unspecified text) document
pub(crate) fn is_html_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty()
        || mime == "text/html"
        || mime == "application/xhtml+xml"
        || mime == "text/plain"
}
