//! Table of contents for a document

use crate::document_model::Document;
use std::fmt;

/// One line of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Hierarchical number, e.g. "2" or "2.1"
    pub number: String,
    /// Title to display; untitled nodes get a placeholder
    pub title: String,
    /// 0 for sections, 1 for subsections
    pub depth: usize,
    /// Scroll anchor: the section id, or "{section id}-{subsection id}"
    pub anchor: String,
}

impl fmt::Display for OutlineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", "  ".repeat(self.depth), self.number, self.title)
    }
}

/// Build the table of contents in document order
pub fn build_outline(doc: &Document) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();

    for (i, section) in doc.sections.iter().enumerate() {
        entries.push(OutlineEntry {
            number: (i + 1).to_string(),
            title: display_title(&section.title, "Untitled Section"),
            depth: 0,
            anchor: section.id.to_string(),
        });

        for (j, subsection) in section.subsections.iter().enumerate() {
            entries.push(OutlineEntry {
                number: format!("{}.{}", i + 1, j + 1),
                title: display_title(&subsection.title, "Untitled Subsection"),
                depth: 1,
                anchor: format!("{}-{}", section.id, subsection.id),
            });
        }
    }

    entries
}

pub(crate) fn display_title(title: &str, placeholder: &str) -> String {
    if title.trim().is_empty() {
        placeholder.to_string()
    } else {
        title.to_string()
    }
}
