//! Leaf content blocks

use super::ids::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a block, deciding how its content string is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Free text
    #[default]
    Text,
    /// Free text shown as a list
    List,
    /// Pipe-delimited markdown table
    Table,
    /// Image URL
    Image,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Text => "text",
            BlockKind::List => "list",
            BlockKind::Table => "table",
            BlockKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// Leaf content unit of a section or subsection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Raw content, interpreted according to `kind`
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Block {
    /// Create an empty block of the given kind with a fresh identifier
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: NodeId::generate(NodeKind::Block),
            kind,
            content: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Return the block with its content replaced
    pub fn with_content(self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self
        }
    }

    /// Return the block with its type tag replaced (content is kept as-is)
    pub fn with_kind(self, kind: BlockKind) -> Self {
        Self { kind, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_json_uses_type_key() {
        let block = Block {
            id: NodeId::from("block-1"),
            kind: BlockKind::Table,
            content: "| A |\n| --- |\n| 1 |".to_string(),
            created_at: None,
            updated_at: None,
        };

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "table");
        assert_eq!(value["id"], "block-1");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_block_without_content_deserializes_empty() {
        let block: Block = serde_json::from_str(r#"{"id":"b","type":"image"}"#).unwrap();
        assert_eq!(block.kind, BlockKind::Image);
        assert!(block.content.is_empty());
    }

    #[test]
    fn test_new_block_defaults() {
        let block = Block::new(BlockKind::default());
        assert_eq!(block.kind, BlockKind::Text);
        assert!(block.content.is_empty());
        assert!(block.id.as_str().starts_with("block-"));
    }
}
