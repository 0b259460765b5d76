//! Markdown table codec
//!
//! Converts between the pipe-delimited markdown stored in a table block and
//! an editable grid. Every [`TableData`] produced here satisfies two
//! invariants: at least one header and one row, and every row exactly as
//! long as the header list.

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

static SEPARATOR_ROW: OnceLock<Regex> = OnceLock::new();

fn separator_row_pattern() -> &'static Regex {
    SEPARATOR_ROW.get_or_init(|| {
        Regex::new(r"^\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?$")
            .expect("separator row pattern is valid")
    })
}

/// Parsed grid form of a table block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Column labels
    pub headers: Vec<String>,
    /// Data rows, each `headers.len()` cells long
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Build a table, padding or truncating rows to the header length
    ///
    /// Empty headers become a single blank column and an empty row list
    /// becomes a single blank row.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = if headers.is_empty() {
            vec![String::new()]
        } else {
            headers
        };
        let width = headers.len();

        let mut rows: Vec<Vec<String>> = rows.into_iter().map(|row| fit_row(row, width)).collect();
        if rows.is_empty() {
            rows.push(vec![String::new(); width]);
        }

        Self { headers, rows }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a blank row
    pub fn add_row(mut self) -> Self {
        self.rows.push(vec![String::new(); self.headers.len()]);
        self
    }

    /// Remove the row at `index`; a table keeps at least one row
    pub fn delete_row(mut self, index: usize) -> Self {
        if self.rows.len() > 1 && index < self.rows.len() {
            self.rows.remove(index);
        }
        self
    }

    /// Append a blank column
    pub fn add_column(mut self) -> Self {
        self.headers.push(String::new());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self
    }

    /// Remove the column at `index`; a table keeps at least one column
    pub fn delete_column(mut self, index: usize) -> Self {
        if self.headers.len() > 1 && index < self.headers.len() {
            self.headers.remove(index);
            for row in &mut self.rows {
                if index < row.len() {
                    row.remove(index);
                }
            }
        }
        self
    }

    /// Set the value of one cell; out-of-range coordinates change nothing
    pub fn update_cell(mut self, row: usize, column: usize, value: impl Into<String>) -> Self {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value.into();
        }
        self
    }

    /// Set the label of one column; out-of-range columns change nothing
    pub fn update_header(mut self, column: usize, value: impl Into<String>) -> Self {
        if let Some(header) = self.headers.get_mut(column) {
            *header = value.into();
        }
        self
    }
}

impl Default for TableData {
    /// A 1x1 blank table
    fn default() -> Self {
        Self {
            headers: vec![String::new()],
            rows: vec![vec![String::new()]],
        }
    }
}

impl fmt::Display for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize_to_markdown(self))
    }
}

/// Parse a pipe-delimited markdown table
///
/// Blank lines are ignored. The first line holds the headers and the second
/// line is skipped as the separator row without looking at it. Malformed
/// input never fails: fewer than two lines yields a 1x1 blank table.
///
/// # Parameters
/// * `markdown` - Table text, e.g. `| A | B |\n|---|---|\n| 1 | 2 |`
///
/// # Returns
/// * `TableData` - Grid with every row padded or truncated to the header count
pub fn parse_markdown_table(markdown: &str) -> TableData {
    let lines: Vec<&str> = markdown.lines().filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return TableData::default();
    }

    let headers = split_cells(lines[0]);
    let rows = lines[2..].iter().map(|line| split_cells(line)).collect();

    TableData::new(headers, rows)
}

/// Serialize a table to pipe-delimited markdown
///
/// Emits the header row, a `---` separator per column and one line per row.
/// Rows are padded or truncated to the header count. Pipes inside cells are
/// escaped and line breaks become spaces, since both would end the cell.
pub fn serialize_to_markdown(data: &TableData) -> String {
    let width = data.headers.len();

    let header_row = format_row(data.headers.iter().map(String::as_str));
    let separator_row = format_row(std::iter::repeat("---").take(width));

    let data_rows = data.rows.iter().map(|row| {
        format_row(
            row.iter()
                .map(String::as_str)
                .chain(std::iter::repeat(""))
                .take(width),
        )
    });

    std::iter::once(header_row)
        .chain(std::iter::once(separator_row))
        .chain(data_rows)
        .join("\n")
}

/// Whether the line [`parse_markdown_table`] skips is really a separator row
///
/// Looks at the second non-blank line only, the same line the parser drops.
/// Alignment colons are accepted and the column count is not compared with
/// the header. Text with fewer than two non-blank lines has no separator.
pub fn has_separator_row(markdown: &str) -> bool {
    markdown
        .lines()
        .filter(|line| !line.trim().is_empty())
        .nth(1)
        .is_some_and(|line| separator_row_pattern().is_match(line.trim()))
}

/// Single edit applied to a table's grid form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TableEdit {
    AddRow,
    DeleteRow { row: usize },
    AddColumn,
    DeleteColumn { column: usize },
    SetCell { row: usize, column: usize, value: String },
    SetHeader { column: usize, value: String },
}

impl TableEdit {
    /// Apply the edit to a table
    pub fn apply(&self, data: TableData) -> TableData {
        match self {
            TableEdit::AddRow => data.add_row(),
            TableEdit::DeleteRow { row } => data.delete_row(*row),
            TableEdit::AddColumn => data.add_column(),
            TableEdit::DeleteColumn { column } => data.delete_column(*column),
            TableEdit::SetCell { row, column, value } => {
                data.update_cell(*row, *column, value.as_str())
            }
            TableEdit::SetHeader { column, value } => data.update_header(*column, value.as_str()),
        }
    }
}

/// Parse a block's content, apply one edit and serialize it back
pub fn edit_table_content(content: &str, edit: &TableEdit) -> String {
    serialize_to_markdown(&edit.apply(parse_markdown_table(content)))
}

/// Re-serialize table content in canonical form
pub fn normalize(content: &str) -> String {
    serialize_to_markdown(&parse_markdown_table(content))
}

/// Split one table line into trimmed cells
///
/// A single leading and trailing pipe delimit the row and produce no cell;
/// empty cells between pipes are kept. `\|` is a literal pipe.
fn split_cells(line: &str) -> Vec<String> {
    let mut body = line.trim();
    body = body.strip_prefix('|').unwrap_or(body);
    if body.ends_with('|') && !body.ends_with("\\|") {
        body = &body[..body.len() - 1];
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    format!("| {} |", cells.map(escape_cell).join(" | "))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}
