//! The document aggregate

use super::collaborator::Collaborator;
use super::ordering::{self, Direction};
use super::section::Section;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root of the document tree, in the JSON shape the document API uses
///
/// Structural edits consume the document and return the edited value;
/// untouched sections are moved across unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned identifier, empty until the first save
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// Client the document is written for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Author names (legacy field, collaborators carry the richer form)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<Collaborator>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classified: Option<bool>,

    /// Date of the last revision (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_revision: Option<String>,

    /// Free-form contact information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Document {
    /// Create an unsaved, empty document shell
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the document has been assigned an identifier by the API
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Number of top-level sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of blocks across all sections and subsections
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(Section::block_count).sum()
    }

    /// Append an empty section with a fresh identifier
    pub fn add_section(mut self) -> Self {
        self.sections.push(Section::new());
        self
    }

    /// Replace the section at `index`
    pub fn update_section(mut self, index: usize, section: Section) -> Self {
        if !ordering::replace_at(&mut self.sections, index, section) {
            log::debug!("update_section ignored: index {} out of range", index);
        }
        self
    }

    /// Remove the section at `index` with all of its subsections and blocks
    pub fn delete_section(mut self, index: usize) -> Self {
        if !ordering::remove_at(&mut self.sections, index) {
            log::debug!("delete_section ignored: index {} out of range", index);
        }
        self
    }

    /// Swap the section at `index` with its neighbour
    pub fn move_section(mut self, index: usize, direction: Direction) -> Self {
        ordering::swap_adjacent(&mut self.sections, index, direction);
        self
    }

    /// Load a document from a JSON file
    ///
    /// # Parameters
    /// * `path` - Path to a JSON file in the document API shape
    ///
    /// # Returns
    /// * `Ok(Document)` - Successfully loaded document
    /// * `Err(DocumentFileError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocumentFileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| DocumentFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the document to a JSON file (pretty printed)
    ///
    /// # Parameters
    /// * `path` - Destination path, overwritten if it exists
    ///
    /// # Returns
    /// * `Ok(())` - Successfully written
    /// * `Err(DocumentFileError)` - Error serializing or writing the file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentFileError> {
        let path = path.as_ref();
        let mut content = serde_json::to_string_pretty(self).map_err(DocumentFileError::Serialize)?;
        content.push('\n');

        fs::write(path, content).map_err(|source| DocumentFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors that can occur when loading or saving a document file
#[derive(Error, Debug)]
pub enum DocumentFileError {
    #[error("IO error for {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document JSON in {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
