//! Markdown exporter for documents
//!
//! This module renders a Document to a single markdown file with:
//! - Numbered headings (sections as `## 1`, subsections as `### 1.1`)
//! - Table blocks re-serialized in canonical form
//! - Image blocks as markdown image links to their URL

use crate::document_model::{Block, BlockKind, Document};
use crate::outline::display_title;
use crate::table_codec;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during markdown export
#[derive(Error, Debug)]
pub enum MarkdownExportError {
    #[error("IO error writing {path}: {source}", path = .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Export a document to a markdown file
///
/// # Parameters
/// * `doc` - The document to export
/// * `output_path` - Path where the markdown file will be written
///
/// # Returns
/// * `Ok(())` - Successfully exported to markdown
/// * `Err(MarkdownExportError)` - Error writing the file
pub fn to_markdown(doc: &Document, output_path: &Path) -> Result<(), MarkdownExportError> {
    let output = render_markdown(doc);

    fs::write(output_path, output).map_err(|source| MarkdownExportError::IoError {
        path: output_path.to_path_buf(),
        source,
    })?;

    log::info!("Wrote markdown export to {}", output_path.display());
    Ok(())
}

/// Render a document to a markdown string in document order
pub fn render_markdown(doc: &Document) -> String {
    let mut output = String::new();

    if !doc.title.is_empty() {
        output.push_str(&format!("# {}\n\n", doc.title));
    }
    if let Some(subtitle) = doc.subtitle.as_deref().filter(|s| !s.is_empty()) {
        output.push_str(&format!("_{}_\n\n", subtitle));
    }

    write_metadata(&mut output, doc);

    for (i, section) in doc.sections.iter().enumerate() {
        output.push_str(&format!(
            "## {} {}\n\n",
            i + 1,
            display_title(&section.title, "Untitled Section")
        ));
        write_blocks(&mut output, &section.blocks);

        for (j, subsection) in section.subsections.iter().enumerate() {
            output.push_str(&format!(
                "### {}.{} {}\n\n",
                i + 1,
                j + 1,
                display_title(&subsection.title, "Untitled Subsection")
            ));
            write_blocks(&mut output, &subsection.blocks);
        }
    }

    // Single trailing newline
    let trimmed_len = output.trim_end().len();
    output.truncate(trimmed_len);
    output.push('\n');
    output
}

/// Write the metadata list (only fields that are set)
fn write_metadata(output: &mut String, doc: &Document) {
    let mut lines = Vec::new();

    if let Some(client) = &doc.client {
        lines.push(format!("- **Client:** {}", client));
    }
    if let Some(authors) = doc.authors.as_ref().filter(|a| !a.is_empty()) {
        lines.push(format!("- **Authors:** {}", authors.join(", ")));
    }
    if let Some(classified) = doc.classified {
        let label = if classified { "Classified" } else { "Unclassified" };
        lines.push(format!("- **Classification:** {}", label));
    }
    if let Some(date) = &doc.last_revision {
        lines.push(format!("- **Last revision:** {}", date));
    }
    if let Some(contacts) = &doc.contacts {
        let joined = contacts
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        lines.push(format!("- **Contacts:** {}", joined));
    }

    if !lines.is_empty() {
        output.push_str(&lines.join("\n"));
        output.push_str("\n\n");
    }
}

/// Write blocks, skipping those without content
fn write_blocks(output: &mut String, blocks: &[Block]) {
    for block in blocks {
        if block.content.trim().is_empty() {
            continue;
        }

        match block.kind {
            BlockKind::Text | BlockKind::List => {
                output.push_str(block.content.trim_end());
            }
            BlockKind::Table => {
                output.push_str(&table_codec::normalize(&block.content));
            }
            BlockKind::Image => {
                output.push_str(&format!("![]({})", block.content.trim()));
            }
        }
        output.push_str("\n\n");
    }
}
