//! Structural edits as commands
//!
//! [`Edit`] names one structural change by position in the tree. Applying
//! it checks the positions against the current document (they usually come
//! from user input), enforces the confirmation guard on deleting non-empty
//! containers and then delegates to the pure operations of the document
//! model.

use crate::document_model::{
    Block, BlockContainer, BlockKind, Direction, Document, NodeId, Section, Subsection,
};
use crate::table_codec::{self, TableEdit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container holding a block: a section itself or one of its subsections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum BlockParent {
    Section { section: usize },
    Subsection { section: usize, subsection: usize },
}

/// Structural edit addressed by indices into the current document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    SetTitle {
        title: String,
    },
    SetSubtitle {
        subtitle: Option<String>,
    },
    AddSection,
    RenameSection {
        section: usize,
        title: String,
    },
    DeleteSection {
        section: usize,
    },
    MoveSection {
        section: usize,
        direction: Direction,
    },
    AddSubsection {
        section: usize,
    },
    RenameSubsection {
        section: usize,
        subsection: usize,
        title: String,
    },
    DeleteSubsection {
        section: usize,
        subsection: usize,
    },
    MoveSubsection {
        section: usize,
        subsection: usize,
        direction: Direction,
    },
    AddBlock {
        parent: BlockParent,
        #[serde(default)]
        kind: BlockKind,
    },
    SetBlockContent {
        parent: BlockParent,
        block: usize,
        content: String,
    },
    SetBlockKind {
        parent: BlockParent,
        block: usize,
        kind: BlockKind,
    },
    DeleteBlock {
        parent: BlockParent,
        block: usize,
    },
    MoveBlock {
        parent: BlockParent,
        block: usize,
        direction: Direction,
    },
    /// Grid edit on a table block's content
    Table {
        parent: BlockParent,
        block: usize,
        edit: TableEdit,
    },
}

/// Errors raised when an edit does not fit the current document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Section {index} does not exist (document has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("Subsection {index} does not exist in section {section} ({len} subsections)")]
    SubsectionOutOfRange {
        section: usize,
        index: usize,
        len: usize,
    },

    #[error("Block {index} does not exist in this container ({len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },

    #[error("Deleting {target} also deletes its {contents}; confirm to proceed")]
    ConfirmationRequired { target: String, contents: String },

    #[error("Block {id} is a {kind} block, not a table")]
    NotATable { id: NodeId, kind: BlockKind },
}

impl Edit {
    /// Apply the edit, returning the edited document
    ///
    /// # Parameters
    /// * `doc` - Current document, consumed
    /// * `confirmed` - Whether the user confirmed destructive deletes
    ///
    /// # Returns
    /// * `Ok(Document)` - The edited document
    /// * `Err(EditError)` - An index is out of range, confirmation is missing,
    ///   or a table edit targets a non-table block
    pub fn apply(&self, doc: Document, confirmed: bool) -> Result<Document, EditError> {
        log::debug!("Applying {:?}", self);

        match self {
            Edit::SetTitle { title } => Ok(Document {
                title: title.clone(),
                ..doc
            }),

            Edit::SetSubtitle { subtitle } => Ok(Document {
                subtitle: subtitle.clone().filter(|s| !s.trim().is_empty()),
                ..doc
            }),

            Edit::AddSection => Ok(doc.add_section()),

            Edit::RenameSection { section, title } => {
                let renamed = section_at(&doc, *section)?.clone().with_title(title.as_str());
                Ok(doc.update_section(*section, renamed))
            }

            Edit::DeleteSection { section } => {
                let target = section_at(&doc, *section)?;
                if !confirmed && !target.is_empty() {
                    return Err(EditError::ConfirmationRequired {
                        target: format!("section {} '{}'", section + 1, target.title),
                        contents: describe_contents(target.blocks.len(), target.subsections.len()),
                    });
                }
                Ok(doc.delete_section(*section))
            }

            Edit::MoveSection { section, direction } => {
                section_at(&doc, *section)?;
                Ok(doc.move_section(*section, *direction))
            }

            Edit::AddSubsection { section } => {
                let updated = section_at(&doc, *section)?.clone().add_subsection();
                Ok(doc.update_section(*section, updated))
            }

            Edit::RenameSubsection {
                section,
                subsection,
                title,
            } => {
                let parent = section_at(&doc, *section)?.clone();
                let renamed = subsection_at(&parent, *section, *subsection)?
                    .clone()
                    .with_title(title.as_str());
                let parent = parent.update_subsection(*subsection, renamed);
                Ok(doc.update_section(*section, parent))
            }

            Edit::DeleteSubsection {
                section,
                subsection,
            } => {
                let parent = section_at(&doc, *section)?;
                let target = subsection_at(parent, *section, *subsection)?;
                if !confirmed && !target.is_empty() {
                    return Err(EditError::ConfirmationRequired {
                        target: format!(
                            "subsection {}.{} '{}'",
                            section + 1,
                            subsection + 1,
                            target.title
                        ),
                        contents: describe_contents(target.blocks.len(), 0),
                    });
                }
                let parent = parent.clone().delete_subsection(*subsection);
                Ok(doc.update_section(*section, parent))
            }

            Edit::MoveSubsection {
                section,
                subsection,
                direction,
            } => {
                let parent = section_at(&doc, *section)?;
                subsection_at(parent, *section, *subsection)?;
                let parent = parent.clone().move_subsection(*subsection, *direction);
                Ok(doc.update_section(*section, parent))
            }

            Edit::AddBlock { parent, kind } => apply_block_op(doc, *parent, BlockOp::Add(*kind)),

            Edit::SetBlockContent {
                parent,
                block,
                content,
            } => {
                let updated = block_at(&doc, *parent, *block)?
                    .clone()
                    .with_content(content.as_str());
                apply_block_op(doc, *parent, BlockOp::Replace(*block, updated))
            }

            Edit::SetBlockKind {
                parent,
                block,
                kind,
            } => {
                let updated = block_at(&doc, *parent, *block)?.clone().with_kind(*kind);
                apply_block_op(doc, *parent, BlockOp::Replace(*block, updated))
            }

            Edit::DeleteBlock { parent, block } => {
                block_at(&doc, *parent, *block)?;
                apply_block_op(doc, *parent, BlockOp::Delete(*block))
            }

            Edit::MoveBlock {
                parent,
                block,
                direction,
            } => {
                block_at(&doc, *parent, *block)?;
                apply_block_op(doc, *parent, BlockOp::Move(*block, *direction))
            }

            Edit::Table {
                parent,
                block,
                edit,
            } => {
                let target = block_at(&doc, *parent, *block)?;
                if target.kind != BlockKind::Table {
                    return Err(EditError::NotATable {
                        id: target.id.clone(),
                        kind: target.kind,
                    });
                }
                let content = table_codec::edit_table_content(&target.content, edit);
                let updated = target.clone().with_content(content);
                apply_block_op(doc, *parent, BlockOp::Replace(*block, updated))
            }
        }
    }
}

/// Apply a sequence of edits in order, stopping at the first failure
pub fn apply_all(doc: Document, edits: &[Edit], confirmed: bool) -> Result<Document, EditError> {
    edits
        .iter()
        .try_fold(doc, |doc, edit| edit.apply(doc, confirmed))
}

/// Block-level operation, independent of the container it runs on
enum BlockOp {
    Add(BlockKind),
    Replace(usize, Block),
    Delete(usize),
    Move(usize, Direction),
}

impl BlockOp {
    fn run<C: BlockContainer>(self, container: C) -> C {
        match self {
            BlockOp::Add(kind) => container.add_block(kind),
            BlockOp::Replace(index, block) => container.update_block(index, block),
            BlockOp::Delete(index) => container.delete_block(index),
            BlockOp::Move(index, direction) => container.move_block(index, direction),
        }
    }
}

fn apply_block_op(doc: Document, parent: BlockParent, op: BlockOp) -> Result<Document, EditError> {
    match parent {
        BlockParent::Section { section } => {
            let updated = op.run(section_at(&doc, section)?.clone());
            Ok(doc.update_section(section, updated))
        }
        BlockParent::Subsection {
            section,
            subsection,
        } => {
            let parent = section_at(&doc, section)?.clone();
            let updated = op.run(subsection_at(&parent, section, subsection)?.clone());
            let parent = parent.update_subsection(subsection, updated);
            Ok(doc.update_section(section, parent))
        }
    }
}

fn section_at(doc: &Document, index: usize) -> Result<&Section, EditError> {
    doc.sections
        .get(index)
        .ok_or(EditError::SectionOutOfRange {
            index,
            len: doc.sections.len(),
        })
}

fn subsection_at(section: &Section, section_index: usize, index: usize) -> Result<&Subsection, EditError> {
    section
        .subsections
        .get(index)
        .ok_or(EditError::SubsectionOutOfRange {
            section: section_index,
            index,
            len: section.subsections.len(),
        })
}

fn block_at(doc: &Document, parent: BlockParent, index: usize) -> Result<&Block, EditError> {
    let blocks = match parent {
        BlockParent::Section { section } => section_at(doc, section)?.blocks(),
        BlockParent::Subsection {
            section,
            subsection,
        } => subsection_at(section_at(doc, section)?, section, subsection)?.blocks(),
    };

    blocks.get(index).ok_or(EditError::BlockOutOfRange {
        index,
        len: blocks.len(),
    })
}

fn describe_contents(blocks: usize, subsections: usize) -> String {
    match (blocks, subsections) {
        (b, 0) => format!("{} block(s)", b),
        (0, s) => format!("{} subsection(s)", s),
        (b, s) => format!("{} block(s) and {} subsection(s)", b, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_codec::parse_markdown_table;

    fn sample() -> Document {
        let doc = Document::new("Sample").add_section().add_section();
        let first = doc.sections[0]
            .clone()
            .with_title("Intro")
            .add_block(BlockKind::Text)
            .add_subsection();
        doc.update_section(0, first)
    }

    const IN_SUB: BlockParent = BlockParent::Subsection {
        section: 0,
        subsection: 0,
    };

    #[test]
    fn test_out_of_range_indices_are_errors() {
        let doc = sample();

        let err = Edit::DeleteSection { section: 5 }.apply(doc.clone(), true).unwrap_err();
        assert_eq!(err, EditError::SectionOutOfRange { index: 5, len: 2 });

        let err = Edit::MoveSubsection {
            section: 0,
            subsection: 3,
            direction: Direction::Up,
        }
        .apply(doc.clone(), false)
        .unwrap_err();
        assert_eq!(
            err,
            EditError::SubsectionOutOfRange {
                section: 0,
                index: 3,
                len: 1
            }
        );

        let err = Edit::DeleteBlock {
            parent: IN_SUB,
            block: 0,
        }
        .apply(doc, false)
        .unwrap_err();
        assert_eq!(err, EditError::BlockOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_deleting_non_empty_section_needs_confirmation() {
        let doc = sample();

        let err = Edit::DeleteSection { section: 0 }
            .apply(doc.clone(), false)
            .unwrap_err();
        assert!(matches!(err, EditError::ConfirmationRequired { .. }));
        assert!(err.to_string().contains("1 block(s) and 1 subsection(s)"));

        let doc = Edit::DeleteSection { section: 0 }.apply(doc, true).unwrap();
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_deleting_empty_section_needs_no_confirmation() {
        let doc = sample();
        let kept = doc.sections[0].clone();

        let doc = Edit::DeleteSection { section: 1 }.apply(doc, false).unwrap();
        assert_eq!(doc.sections, vec![kept]);
    }

    #[test]
    fn test_block_edits_inside_subsection() {
        let doc = sample();
        let untouched = doc.sections[1].clone();

        let doc = apply_all(
            doc,
            &[
                Edit::AddBlock {
                    parent: IN_SUB,
                    kind: BlockKind::Text,
                },
                Edit::AddBlock {
                    parent: IN_SUB,
                    kind: BlockKind::Image,
                },
                Edit::SetBlockContent {
                    parent: IN_SUB,
                    block: 1,
                    content: "https://cdn.test/a.png".to_string(),
                },
                Edit::MoveBlock {
                    parent: IN_SUB,
                    block: 1,
                    direction: Direction::Up,
                },
            ],
            false,
        )
        .unwrap();

        let blocks = &doc.sections[0].subsections[0].blocks;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Image);
        assert_eq!(blocks[0].content, "https://cdn.test/a.png");
        assert_eq!(doc.sections[1], untouched);
    }

    #[test]
    fn test_table_edit_rewrites_content() {
        let parent = BlockParent::Section { section: 0 };
        let doc = apply_all(
            sample(),
            &[
                Edit::SetBlockKind {
                    parent,
                    block: 0,
                    kind: BlockKind::Table,
                },
                Edit::Table {
                    parent,
                    block: 0,
                    edit: TableEdit::SetHeader {
                        column: 0,
                        value: "Name".to_string(),
                    },
                },
                Edit::Table {
                    parent,
                    block: 0,
                    edit: TableEdit::AddRow,
                },
            ],
            false,
        )
        .unwrap();

        let table = parse_markdown_table(&doc.sections[0].blocks[0].content);
        assert_eq!(table.headers, vec!["Name".to_string()]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_table_edit_on_text_block_is_rejected() {
        let err = Edit::Table {
            parent: BlockParent::Section { section: 0 },
            block: 0,
            edit: TableEdit::AddColumn,
        }
        .apply(sample(), false)
        .unwrap_err();
        assert!(matches!(err, EditError::NotATable { kind: BlockKind::Text, .. }));
    }

    #[test]
    fn test_blank_subtitle_is_cleared() {
        let doc = Edit::SetSubtitle {
            subtitle: Some("  ".to_string()),
        }
        .apply(sample(), false)
        .unwrap();
        assert_eq!(doc.subtitle, None);
    }

    #[test]
    fn test_edit_script_json() {
        let json = r#"[
            {"op": "add_section"},
            {"op": "rename_section", "section": 2, "title": "Appendix"},
            {"op": "add_block", "parent": {"level": "section", "section": 2}, "kind": "list"},
            {"op": "move_section", "section": 2, "direction": "up"}
        ]"#;
        let edits: Vec<Edit> = serde_json::from_str(json).unwrap();
        let doc = apply_all(sample(), &edits, false).unwrap();

        assert_eq!(doc.sections[1].title, "Appendix");
        assert_eq!(doc.sections[1].blocks[0].kind, BlockKind::List);
    }
}
