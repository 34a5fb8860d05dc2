// src/notion/types.rs
//! The slice of Notion's block JSON this crate reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TABLE_ROW: &str = "table_row";

/// Styled text fragment; only the plain text is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// One cell = an ordered run of fragments.
pub type Cell = Vec<RichText>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A child block. Only `table_row` blocks carry cell data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub table_row: Option<TableRow>,
}

impl Block {
    /// Build a `table_row` block from plain strings (one fragment per cell).
    pub fn row<S: AsRef<str>>(cells: &[S]) -> Self {
        Self {
            id: None,
            kind: TABLE_ROW.to_string(),
            table_row: Some(TableRow {
                cells: cells
                    .iter()
                    .map(|c| {
                        vec![RichText {
                            plain_text: c.as_ref().to_string(),
                        }]
                    })
                    .collect(),
            }),
        }
    }

    /// Cells when this is a well-formed table row.
    pub fn row_cells(&self) -> Option<&[Cell]> {
        if self.kind != TABLE_ROW {
            return None;
        }
        self.table_row.as_ref().map(|r| r.cells.as_slice())
    }
}

/// Join a cell's fragments with single spaces.
pub fn flatten_cell(cell: &[RichText]) -> String {
    cell.iter()
        .map(|t| t.plain_text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn flatten_cells(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(|c| flatten_cell(c)).collect()
}

/// Pagination hints from a block-children page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

pub fn page_info(body: &Value) -> PageInfo {
    PageInfo {
        has_more: body.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        next_cursor: body
            .get("next_cursor")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Pull the ordered child blocks out of a block-children body.
///
/// A body without a `results` array yields nothing. Entries that do not decode as a
/// block are kept as untyped placeholders so positional handling stays intact and the
/// mapper skips them.
pub fn rows_from_body(body: &Value) -> Vec<Block> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        tracing::warn!("notion body has no `results` array; treating as empty");
        return Vec::new();
    };

    results
        .iter()
        .map(|v| {
            serde_json::from_value::<Block>(v.clone()).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "undecodable block entry");
                Block::default()
            })
        })
        .collect()
}
