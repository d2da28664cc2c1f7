//! Column descriptors and the fixed column set of a store.

use super::error::ListError;
use super::identifiers::ColumnName;

/// How values in a column compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Lexicographic, case-sensitive.
    #[default]
    Text,
    /// Numeric comparison.
    Numeric,
}

/// A sortable field of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name, also the header label.
    pub name: ColumnName,
    /// Preferred width in terminal cells (presentation only).
    pub width_hint: u16,
    /// Comparison rule.
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Default width used when none is configured.
    pub const DEFAULT_WIDTH: u16 = 16;

    /// Create a text column with the default width.
    pub fn text(name: ColumnName) -> Self {
        Self {
            name,
            width_hint: Self::DEFAULT_WIDTH,
            kind: ColumnKind::Text,
        }
    }

    /// Create a numeric column with the default width.
    pub fn numeric(name: ColumnName) -> Self {
        Self {
            name,
            width_hint: Self::DEFAULT_WIDTH,
            kind: ColumnKind::Numeric,
        }
    }

    /// Override the width hint.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width_hint = width;
        self
    }

    /// Whether the column compares numerically.
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Ordered, fixed set of columns.
///
/// Names are unique and the set is never empty. Fixed for the lifetime of a
/// store: there is no API to add or remove columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Build a column set, rejecting duplicates and empty input.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, ListError> {
        if columns.is_empty() {
            return Err(ListError::EmptyColumnSet);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ListError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate descriptors in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Descriptor at a display position.
    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Look up a descriptor by name.
    pub fn find(&self, name: &ColumnName) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| &c.name == name)
    }

    /// Display position of a column.
    pub fn position(&self, name: &ColumnName) -> Option<usize> {
        self.columns.iter().position(|c| &c.name == name)
    }

    /// Whether a column with this name is registered.
    pub fn contains(&self, name: &ColumnName) -> bool {
        self.find(name).is_some()
    }

    /// First column in display order.
    pub fn first(&self) -> &ColumnDescriptor {
        // Non-empty by construction.
        &self.columns[0]
    }
}
