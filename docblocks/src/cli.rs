//! Command-line interface definitions for docblocks

use clap::{Args, Parser, Subcommand, ValueEnum};
use docblocks::document_model::{BlockKind, Direction};
use docblocks::edit::{BlockParent, Edit};
use docblocks::table_codec::TableEdit;
use std::path::PathBuf;

/// CLI structure for the docblocks application
#[derive(Parser)]
#[command(name = "docblocks")]
#[command(version)]
#[command(about = "Edit structured documents and sync them with the document API", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./docblocks.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for docblocks
#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty, unsaved document file
    New {
        /// Document file to create
        file: PathBuf,

        /// Document title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Apply one structural edit to a document file
    ///
    /// Positions are 1-based, as printed by `outline`.
    Edit {
        /// Document file to edit in place
        file: PathBuf,

        /// Confirm deleting sections or subsections that still have content
        #[arg(short, long, global = true)]
        yes: bool,

        #[command(subcommand)]
        command: EditCommand,
    },

    /// Apply a JSON list of edits (0-based positions) to a document file
    Apply {
        /// Document file to edit in place
        file: PathBuf,

        /// JSON file holding an array of edits
        script: PathBuf,

        /// Confirm deleting sections or subsections that still have content
        #[arg(short, long)]
        yes: bool,
    },

    /// Change document metadata; omitted options keep their current value
    Settings {
        /// Document file to edit in place
        file: PathBuf,

        /// Client name (empty clears it)
        #[arg(long)]
        client: Option<String>,

        /// Comma-separated author names (empty clears them)
        #[arg(long)]
        authors: Option<String>,

        /// Classification flag
        #[arg(long)]
        classified: Option<bool>,

        /// Last revision date, YYYY-MM-DD (empty clears it)
        #[arg(long)]
        last_revision: Option<String>,

        /// Contact information (empty clears it)
        #[arg(long)]
        contacts: Option<String>,
    },

    /// Print the table of contents
    Outline {
        /// Document file
        file: PathBuf,
    },

    /// Export a document file to markdown
    Export {
        /// Document file
        file: PathBuf,

        /// Output path (defaults to the input path with a .md extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check identifiers and table blocks of a document file
    Check {
        /// Document file
        file: PathBuf,
    },

    /// List images referenced by OLD but no longer by NEW
    Orphans {
        /// Earlier version of the document
        old: PathBuf,

        /// Later version of the document
        new: PathBuf,
    },

    /// Print a chat message tagged with the current document
    Chat {
        /// Message text
        text: String,

        /// Document id to tag the message with
        #[arg(long, conflicts_with = "file")]
        doc: Option<String>,

        /// Document file whose id tags the message
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List documents stored by the API
    List,

    /// Download a document into a file
    Pull {
        /// Document id
        id: String,

        /// Output file (defaults to <id>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save a document file to the API (create when unsaved, overwrite otherwise)
    Push {
        /// Document file; rewritten with the server's copy afterwards
        file: PathBuf,
    },

    /// Delete a document from the API
    Delete {
        /// Document id
        id: String,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
}

/// Move direction
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveDirection {
    /// Towards the start
    Up,
    /// Towards the end
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// Block type
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum KindArg {
    /// Free text
    #[default]
    Text,
    /// List text
    List,
    /// Markdown table
    Table,
    /// Image URL
    Image,
}

impl From<KindArg> for BlockKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => BlockKind::Text,
            KindArg::List => BlockKind::List,
            KindArg::Table => BlockKind::Table,
            KindArg::Image => BlockKind::Image,
        }
    }
}

/// Container of blocks: a section, or a subsection when given
#[derive(Debug, Clone, Copy, Args)]
pub struct ContainerArgs {
    /// Section position
    #[arg(long, value_parser = parse_position)]
    pub section: usize,

    /// Subsection position within the section
    #[arg(long, value_parser = parse_position)]
    pub subsection: Option<usize>,
}

impl From<ContainerArgs> for BlockParent {
    fn from(args: ContainerArgs) -> Self {
        match args.subsection {
            Some(subsection) => BlockParent::Subsection {
                section: args.section,
                subsection,
            },
            None => BlockParent::Section {
                section: args.section,
            },
        }
    }
}

/// Structural edits
#[derive(Subcommand)]
pub enum EditCommand {
    /// Set the document title
    Title { title: String },

    /// Set or clear the document subtitle
    Subtitle { subtitle: Option<String> },

    /// Append an empty section
    AddSection,

    /// Rename a section
    RenameSection {
        #[arg(value_parser = parse_position)]
        section: usize,
        title: String,
    },

    /// Delete a section with its subsections and blocks
    DeleteSection {
        #[arg(value_parser = parse_position)]
        section: usize,
    },

    /// Move a section one position
    MoveSection {
        #[arg(value_parser = parse_position)]
        section: usize,
        #[arg(value_enum)]
        direction: MoveDirection,
    },

    /// Append an empty subsection to a section
    AddSubsection {
        #[arg(value_parser = parse_position)]
        section: usize,
    },

    /// Rename a subsection
    RenameSubsection {
        #[arg(value_parser = parse_position)]
        section: usize,
        #[arg(value_parser = parse_position)]
        subsection: usize,
        title: String,
    },

    /// Delete a subsection with its blocks
    DeleteSubsection {
        #[arg(value_parser = parse_position)]
        section: usize,
        #[arg(value_parser = parse_position)]
        subsection: usize,
    },

    /// Move a subsection one position within its section
    MoveSubsection {
        #[arg(value_parser = parse_position)]
        section: usize,
        #[arg(value_parser = parse_position)]
        subsection: usize,
        #[arg(value_enum)]
        direction: MoveDirection,
    },

    /// Append an empty block
    AddBlock {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(long, value_enum, default_value = "text")]
        kind: KindArg,
    },

    /// Replace a block's content
    SetContent {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(value_parser = parse_position)]
        block: usize,
        content: String,
    },

    /// Change a block's type (content is kept)
    SetKind {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(value_parser = parse_position)]
        block: usize,
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Delete a block
    DeleteBlock {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(value_parser = parse_position)]
        block: usize,
    },

    /// Move a block one position within its container
    MoveBlock {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(value_parser = parse_position)]
        block: usize,
        #[arg(value_enum)]
        direction: MoveDirection,
    },

    /// Edit the grid of a table block
    Table {
        #[command(flatten)]
        at: ContainerArgs,
        #[arg(value_parser = parse_position)]
        block: usize,
        #[command(subcommand)]
        command: TableCommand,
    },
}

/// Table grid edits (row and column positions are 1-based)
#[derive(Subcommand)]
pub enum TableCommand {
    /// Append a blank row
    AddRow,
    /// Delete a row (the last row is kept)
    DeleteRow {
        #[arg(value_parser = parse_position)]
        row: usize,
    },
    /// Append a blank column
    AddColumn,
    /// Delete a column (the last column is kept)
    DeleteColumn {
        #[arg(value_parser = parse_position)]
        column: usize,
    },
    /// Set one cell
    SetCell {
        #[arg(value_parser = parse_position)]
        row: usize,
        #[arg(value_parser = parse_position)]
        column: usize,
        value: String,
    },
    /// Set one column label
    SetHeader {
        #[arg(value_parser = parse_position)]
        column: usize,
        value: String,
    },
}

impl From<TableCommand> for TableEdit {
    fn from(command: TableCommand) -> Self {
        match command {
            TableCommand::AddRow => TableEdit::AddRow,
            TableCommand::DeleteRow { row } => TableEdit::DeleteRow { row },
            TableCommand::AddColumn => TableEdit::AddColumn,
            TableCommand::DeleteColumn { column } => TableEdit::DeleteColumn { column },
            TableCommand::SetCell { row, column, value } => {
                TableEdit::SetCell { row, column, value }
            }
            TableCommand::SetHeader { column, value } => TableEdit::SetHeader { column, value },
        }
    }
}

impl From<EditCommand> for Edit {
    fn from(command: EditCommand) -> Self {
        match command {
            EditCommand::Title { title } => Edit::SetTitle { title },
            EditCommand::Subtitle { subtitle } => Edit::SetSubtitle { subtitle },
            EditCommand::AddSection => Edit::AddSection,
            EditCommand::RenameSection { section, title } => Edit::RenameSection { section, title },
            EditCommand::DeleteSection { section } => Edit::DeleteSection { section },
            EditCommand::MoveSection { section, direction } => Edit::MoveSection {
                section,
                direction: direction.into(),
            },
            EditCommand::AddSubsection { section } => Edit::AddSubsection { section },
            EditCommand::RenameSubsection {
                section,
                subsection,
                title,
            } => Edit::RenameSubsection {
                section,
                subsection,
                title,
            },
            EditCommand::DeleteSubsection {
                section,
                subsection,
            } => Edit::DeleteSubsection {
                section,
                subsection,
            },
            EditCommand::MoveSubsection {
                section,
                subsection,
                direction,
            } => Edit::MoveSubsection {
                section,
                subsection,
                direction: direction.into(),
            },
            EditCommand::AddBlock { at, kind } => Edit::AddBlock {
                parent: at.into(),
                kind: kind.into(),
            },
            EditCommand::SetContent { at, block, content } => Edit::SetBlockContent {
                parent: at.into(),
                block,
                content,
            },
            EditCommand::SetKind { at, block, kind } => Edit::SetBlockKind {
                parent: at.into(),
                block,
                kind: kind.into(),
            },
            EditCommand::DeleteBlock { at, block } => Edit::DeleteBlock {
                parent: at.into(),
                block,
            },
            EditCommand::MoveBlock {
                at,
                block,
                direction,
            } => Edit::MoveBlock {
                parent: at.into(),
                block,
                direction: direction.into(),
            },
            EditCommand::Table { at, block, command } => Edit::Table {
                parent: at.into(),
                block,
                edit: command.into(),
            },
        }
    }
}

/// Parse a 1-based position into a 0-based index
fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(position) => Ok(position - 1),
        Err(e) => Err(format!("'{}' is not a position: {}", raw, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(parse_position("1"), Ok(0));
        assert_eq!(parse_position("12"), Ok(11));
        assert!(parse_position("0").is_err());
        assert!(parse_position("x").is_err());
    }

    #[test]
    fn test_edit_subcommand_maps_to_edit() {
        let cli = Cli::try_parse_from([
            "docblocks",
            "edit",
            "doc.json",
            "move-block",
            "--section",
            "2",
            "--subsection",
            "1",
            "3",
            "up",
        ])
        .unwrap();

        let Commands::Edit { command, yes, .. } = cli.command else {
            panic!("expected edit command");
        };
        assert!(!yes);
        assert_eq!(
            Edit::from(command),
            Edit::MoveBlock {
                parent: BlockParent::Subsection {
                    section: 1,
                    subsection: 0
                },
                block: 2,
                direction: Direction::Up,
            }
        );
    }

    #[test]
    fn test_table_subcommand_maps_to_table_edit() {
        let cli = Cli::try_parse_from([
            "docblocks", "edit", "doc.json", "table", "--section", "1", "2", "set-cell", "1", "2",
            "value",
        ])
        .unwrap();

        let Commands::Edit { command, .. } = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(
            Edit::from(command),
            Edit::Table {
                parent: BlockParent::Section { section: 0 },
                block: 1,
                edit: TableEdit::SetCell {
                    row: 0,
                    column: 1,
                    value: "value".to_string()
                },
            }
        );
    }
}
