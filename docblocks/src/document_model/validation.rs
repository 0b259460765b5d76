//! Structural checks over a document tree

use super::block::{Block, BlockKind};
use super::document::Document;
use super::ids::NodeId;
use crate::table_codec;
use std::collections::HashSet;

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A node has an empty identifier
    EmptyId { location: String },
    /// Two nodes of the document share an identifier
    DuplicateId { id: NodeId, location: String },
    /// A table block whose second non-blank line is not a separator row;
    /// parsing drops that line
    TableWithoutSeparator { block_id: NodeId, location: String },
    /// Multiple validation errors
    Multiple(Vec<ValidationError>),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyId { location } => {
                write!(f, "Empty identifier at {}", location)
            }
            ValidationError::DuplicateId { id, location } => {
                write!(f, "Duplicate identifier '{}' at {}", id, location)
            }
            ValidationError::TableWithoutSeparator { block_id, location } => {
                write!(
                    f,
                    "Table block '{}' at {} has no separator row as its second line; that line will be dropped",
                    block_id, location
                )
            }
            ValidationError::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for error in errors {
                    writeln!(f, "  - {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl Document {
    /// Check identifiers and table blocks across the whole tree
    ///
    /// # Returns
    /// * `Ok(())` - Every identifier is present and unique, every table has a separator row
    /// * `Err(ValidationError)` - One or more problems, in document order
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checker = Checker::default();

        for (i, section) in self.sections.iter().enumerate() {
            let location = format!("section {}", i + 1);
            checker.check_id(&section.id, &location);
            checker.check_blocks(&section.blocks, &location);

            for (j, subsection) in section.subsections.iter().enumerate() {
                let location = format!("section {}.{}", i + 1, j + 1);
                checker.check_id(&subsection.id, &location);
                checker.check_blocks(&subsection.blocks, &location);
            }
        }

        match checker.errors.len() {
            0 => Ok(()),
            1 => Err(checker.errors.remove(0)),
            _ => Err(ValidationError::Multiple(checker.errors)),
        }
    }
}

#[derive(Default)]
struct Checker<'a> {
    seen: HashSet<&'a NodeId>,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    fn check_id(&mut self, id: &'a NodeId, location: &str) {
        if id.is_empty() {
            self.errors.push(ValidationError::EmptyId {
                location: location.to_string(),
            });
        } else if !self.seen.insert(id) {
            self.errors.push(ValidationError::DuplicateId {
                id: id.clone(),
                location: location.to_string(),
            });
        }
    }

    fn check_blocks(&mut self, blocks: &'a [Block], parent: &str) {
        for (k, block) in blocks.iter().enumerate() {
            let location = format!("{}, block {}", parent, k + 1);
            self.check_id(&block.id, &location);

            if block.kind == BlockKind::Table
                && !block.content.trim().is_empty()
                && !table_codec::has_separator_row(&block.content)
            {
                log::warn!("Table block {} at {} has no separator row", block.id, location);
                self.errors.push(ValidationError::TableWithoutSeparator {
                    block_id: block.id.clone(),
                    location,
                });
            }
        }
    }
}
