//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use std::fmt;

/// Stable identifier of a row within a store.
///
/// Caller-supplied. Survives every reorder; only the row's position changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Smart constructor: validates non-empty row id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRowId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidRowId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a registered column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnName(String);

impl ColumnName {
    /// Smart constructor: validates non-empty column name
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidColumnName> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidColumnName::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum InvalidRowId {
    #[error("Row ID cannot be empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum InvalidColumnName {
    #[error("Column name cannot be empty")]
    Empty,
}

// ===== Tests =====
