//! Row and cell value types.

use std::collections::BTreeMap;
use std::fmt;

use super::identifiers::{ColumnName, RowId};

/// Display value of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Free text.
    Text(String),
    /// Orderable number.
    Number(f64),
}

impl CellValue {
    /// Numeric view of the cell.
    ///
    /// Text that parses as a float counts as a number, so numeric columns
    /// loaded from string-typed sources still sort numerically.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One list entry.
///
/// The id never changes; reordering moves the row, it never rebuilds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    columns: BTreeMap<ColumnName, CellValue>,
    tags: Vec<String>,
}

impl Row {
    /// Create a row with no cells.
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            columns: BTreeMap::new(),
            tags: Vec::new(),
        }
    }

    /// Builder: set a cell.
    pub fn with_cell(mut self, column: ColumnName, value: impl Into<CellValue>) -> Self {
        self.columns.insert(column, value.into());
        self
    }

    /// Builder: add a presentation tag (duplicates are ignored).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Value of one column.
    pub fn cell(&self, column: &ColumnName) -> Option<&CellValue> {
        self.columns.get(column)
    }

    /// Column names present on this row, sorted.
    pub fn column_names(&self) -> impl Iterator<Item = &ColumnName> {
        self.columns.keys()
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.columns.len()
    }

    /// Opaque presentation labels.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the row carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
