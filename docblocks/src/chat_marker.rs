//! In-band document marker on chat messages
//!
//! Human chat messages carry the id of the document being edited as a
//! leading `<current_doc>{id}</current_doc>` tag. The assistant runtime reads
//! it; the chat view strips it before display.

use regex::Regex;
use std::sync::OnceLock;

static MARKER: OnceLock<Regex> = OnceLock::new();

fn marker_pattern() -> &'static Regex {
    MARKER.get_or_init(|| {
        Regex::new(r"(?is)^<current_doc>(.*?)</current_doc>\s*").expect("marker pattern is valid")
    })
}

/// Prefix a message with the current document marker
///
/// Without a current document (or with an unsaved one) the text is returned
/// unchanged.
pub fn tag_message(document_id: Option<&str>, text: &str) -> String {
    match document_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("<current_doc>{}</current_doc>{}", id, text),
        None => text.to_string(),
    }
}

/// Document id carried by a leading marker, if any
pub fn extract_document_id(text: &str) -> Option<&str> {
    marker_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

/// Message text with a leading marker and the whitespace after it removed
pub fn strip_marker(text: &str) -> &str {
    match marker_pattern().find(text) {
        Some(found) => &text[found.end()..],
        None => text,
    }
}
