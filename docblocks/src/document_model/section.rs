//! Sections, subsections and the block operations they share
//!
//! The tree is exactly two levels deep below the document: a section holds
//! blocks and subsections, a subsection holds blocks only.

use super::block::{Block, BlockKind};
use super::ids::{NodeId, NodeKind};
use super::ordering::{self, Direction};
use serde::{Deserialize, Serialize};

/// Ordered block operations shared by sections and subsections
///
/// Every operation consumes the container and returns the edited one.
/// Out-of-range indices leave the container unchanged.
pub trait BlockContainer: Sized {
    /// Blocks in display order
    fn blocks(&self) -> &[Block];

    /// Mutable access to the block sequence
    fn blocks_mut(&mut self) -> &mut Vec<Block>;

    /// Append an empty block of the given kind
    fn add_block(mut self, kind: BlockKind) -> Self {
        self.blocks_mut().push(Block::new(kind));
        self
    }

    /// Replace the block at `index`
    fn update_block(mut self, index: usize, block: Block) -> Self {
        if !ordering::replace_at(self.blocks_mut(), index, block) {
            log::debug!("update_block ignored: index {} out of range", index);
        }
        self
    }

    /// Remove the block at `index`
    fn delete_block(mut self, index: usize) -> Self {
        if !ordering::remove_at(self.blocks_mut(), index) {
            log::debug!("delete_block ignored: index {} out of range", index);
        }
        self
    }

    /// Swap the block at `index` with its neighbour
    fn move_block(mut self, index: usize, direction: Direction) -> Self {
        ordering::swap_adjacent(self.blocks_mut(), index, direction);
        self
    }
}

/// Second-level container: a titled run of blocks inside a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub id: NodeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Subsection {
    /// Create an untitled, empty subsection with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: NodeId::generate(NodeKind::Subsection),
            title: String::new(),
            blocks: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Return the subsection with a new title
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    /// A subsection with no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Subsection {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockContainer for Subsection {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// Top-level container of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: NodeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subsections: Vec<Subsection>,

    /// Section-level blocks, shown before the subsections
    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Section {
    /// Create an untitled, empty section with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: NodeId::generate(NodeKind::Section),
            title: String::new(),
            subsections: Vec::new(),
            blocks: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Return the section with a new title
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    /// A section with neither blocks nor subsections
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.subsections.is_empty()
    }

    /// Number of blocks in the section, including those of its subsections
    pub fn block_count(&self) -> usize {
        self.blocks.len()
            + self
                .subsections
                .iter()
                .map(|sub| sub.blocks.len())
                .sum::<usize>()
    }

    /// Append an empty subsection
    pub fn add_subsection(mut self) -> Self {
        self.subsections.push(Subsection::new());
        self
    }

    /// Replace the subsection at `index`
    pub fn update_subsection(mut self, index: usize, subsection: Subsection) -> Self {
        if !ordering::replace_at(&mut self.subsections, index, subsection) {
            log::debug!("update_subsection ignored: index {} out of range", index);
        }
        self
    }

    /// Remove the subsection at `index` together with its blocks
    pub fn delete_subsection(mut self, index: usize) -> Self {
        if !ordering::remove_at(&mut self.subsections, index) {
            log::debug!("delete_subsection ignored: index {} out of range", index);
        }
        self
    }

    /// Swap the subsection at `index` with its neighbour
    pub fn move_subsection(mut self, index: usize, direction: Direction) -> Self {
        ordering::swap_adjacent(&mut self.subsections, index, direction);
        self
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockContainer for Section {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(id: &str) -> Block {
        Block {
            id: NodeId::from(id),
            kind: BlockKind::Text,
            content: id.to_uppercase(),
            created_at: None,
            updated_at: None,
        }
    }

    fn block_ids(container: &impl BlockContainer) -> Vec<&str> {
        container.blocks().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_add_block_appends_with_kind() {
        let sub = Subsection::new()
            .add_block(BlockKind::Text)
            .add_block(BlockKind::Image);

        assert_eq!(sub.blocks.len(), 2);
        assert_eq!(sub.blocks[1].kind, BlockKind::Image);
        assert_ne!(sub.blocks[0].id, sub.blocks[1].id);
    }

    #[test]
    fn test_block_operations_behave_the_same_on_both_levels() {
        let mut section = Section::new();
        section.blocks = vec![text_block("a"), text_block("b"), text_block("c")];
        let mut sub = Subsection::new();
        sub.blocks = section.blocks.clone();

        let section = section.move_block(0, Direction::Down).delete_block(2);
        let sub = sub.move_block(0, Direction::Down).delete_block(2);

        assert_eq!(block_ids(&section), vec!["b", "a"]);
        assert_eq!(block_ids(&section), block_ids(&sub));
    }

    #[test]
    fn test_update_block_replaces_only_target() {
        let mut sub = Subsection::new();
        sub.blocks = vec![text_block("a"), text_block("b")];
        let original = sub.clone();

        let replacement = sub.blocks[1].clone().with_content("edited");
        let sub = sub.update_block(1, replacement);

        assert_eq!(sub.blocks[0], original.blocks[0]);
        assert_eq!(sub.blocks[1].content, "edited");
        assert_eq!(sub.blocks[1].id, original.blocks[1].id);
    }

    #[test]
    fn test_out_of_range_block_edits_are_noops() {
        let mut sub = Subsection::new();
        sub.blocks = vec![text_block("a")];
        let original = sub.clone();

        let sub = sub
            .delete_block(4)
            .update_block(9, text_block("z"))
            .move_block(3, Direction::Up);

        assert_eq!(sub, original);
    }

    #[test]
    fn test_subsection_moves_and_deletes() {
        let section = Section::new()
            .add_subsection()
            .add_subsection()
            .add_subsection();
        let ids: Vec<NodeId> = section.subsections.iter().map(|s| s.id.clone()).collect();

        let moved = section.clone().move_subsection(2, Direction::Up);
        assert_eq!(
            moved.subsections.iter().map(|s| &s.id).collect::<Vec<_>>(),
            vec![&ids[0], &ids[2], &ids[1]]
        );

        let deleted = section.delete_subsection(0);
        assert_eq!(deleted.subsections.len(), 2);
        assert_eq!(deleted.subsections[0].id, ids[1]);
    }

    #[test]
    fn test_emptiness_and_block_count() {
        let section = Section::new();
        assert!(section.is_empty());

        let section = section
            .add_block(BlockKind::Text)
            .add_subsection()
            .update_subsection(0, Subsection::new().add_block(BlockKind::List));
        assert!(!section.is_empty());
        assert_eq!(section.block_count(), 2);
    }

    #[test]
    fn test_missing_arrays_deserialize_empty() {
        let section: Section = serde_json::from_str(r#"{"id":"s1","title":"Intro"}"#).unwrap();
        assert!(section.blocks.is_empty());
        assert!(section.subsections.is_empty());
    }
}
