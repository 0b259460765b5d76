//! Document tree model
//!
//! A document holds an ordered list of sections; a section holds blocks and
//! an ordered list of subsections; a subsection holds blocks. Every
//! structural edit takes the container by value and returns the edited
//! container, so callers always work with whole new values.

mod block;
mod collaborator;
mod document;
mod ids;
mod metadata;
mod ordering;
mod section;
mod validation;

pub use block::{Block, BlockKind};
pub use collaborator::{Collaborator, Profile, Role};
pub use document::{Document, DocumentFileError};
pub use ids::{NodeId, NodeKind};
pub use metadata::{normalize_revision_date, parse_authors, MetadataError, MetadataUpdate};
pub use ordering::Direction;
pub use section::{BlockContainer, Section, Subsection};
pub use validation::ValidationError;
