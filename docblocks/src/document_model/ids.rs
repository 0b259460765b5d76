//! Node identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of tree node an identifier is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Section,
    Subsection,
    Block,
}

impl NodeKind {
    /// Prefix placed in front of generated identifiers
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Section => "section",
            NodeKind::Subsection => "subsection",
            NodeKind::Block => "block",
        }
    }
}

/// Identifier of a section, subsection or block
///
/// Identifiers coming from the document API are arbitrary strings, so the
/// newtype wraps a `String` and serializes transparently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh identifier for a node of the given kind
    ///
    /// UUIDv7 values are time-ordered and carry random bits, so two nodes
    /// created within the same millisecond still get distinct identifiers.
    ///
    /// # Returns
    /// * `NodeId` - e.g. `section-01890a5d-ac96-774b-bcce-b302099a8057`
    pub fn generate(kind: NodeKind) -> Self {
        Self(format!("{}-{}", kind.prefix(), uuid::Uuid::now_v7()))
    }

    /// View the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (never valid for a tree node)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
