//! Error types for sortlist.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping all domain-specific failures
//!   - [`ListError`] - Contract violations of the list model (store, sort, drag, header)
//!   - [`SourceError`] - Row file reading failures
//!   - [`PersistError`] - Saved-order file failures
//!   - `std::io::Error` - Terminal failures
//!
//! # Recovery Strategy
//!
//! [`ListError::NotFound`] is benign: it means a stale row reference and the
//! presentation layer drops it. Every other [`ListError`] variant signals a
//! broken caller assumption and is logged as an error, never silently
//! recovered.

use std::path::PathBuf;
use thiserror::Error;

use super::identifiers::{ColumnName, RowId};

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// List model contract violation.
    #[error("List model error: {0}")]
    List(#[from] ListError),

    /// Failed to load rows.
    #[error("Failed to load rows: {0}")]
    Source(#[from] SourceError),

    /// Failed to read or write the saved order.
    #[error("Saved order error: {0}")]
    Persist(#[from] PersistError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors raised by the list model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The referenced row is not in the store.
    ///
    /// Benign: the caller holds a stale id and should drop it.
    #[error("Row not found: {0}")]
    NotFound(RowId),

    /// `apply_order` was given ids that are not exactly the live ids.
    #[error("Invalid permutation: expected {expected} live ids, got {got}")]
    InvalidPermutation {
        /// Number of live rows.
        expected: usize,
        /// Number of ids supplied.
        got: usize,
    },

    /// A drag lifecycle method was called outside its legal state.
    #[error("Invalid state: cannot {operation} while {state}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the controller was in.
        state: &'static str,
    },

    /// `insert` was given an index past the end of the store.
    #[error("Index {index} out of range for {len} rows")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current row count.
        len: usize,
    },

    /// A row with this id is live or was removed earlier.
    #[error("Duplicate row id: {0}")]
    DuplicateId(RowId),

    /// The row's cells do not match the registered columns.
    #[error("Row {id} does not match the column set ({detail})")]
    ColumnMismatch {
        /// Offending row.
        id: RowId,
        /// What was missing or extra.
        detail: String,
    },

    /// The column is not registered.
    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnName),

    /// Two columns share a name.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(ColumnName),

    /// A column set needs at least one column.
    #[error("Column set cannot be empty")]
    EmptyColumnSet,
}

impl ListError {
    /// Whether the caller may drop this error as a stale reference.
    pub fn is_benign(&self) -> bool {
        matches!(self, ListError::NotFound(_))
    }
}

/// Errors encountered when loading rows from a file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The row file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// No usable record was found, so no columns could be inferred.
    #[error("No columns configured and none could be inferred from {path}")]
    NoColumns {
        /// Source file.
        path: PathBuf,
    },

    /// The loaded rows violate a store invariant.
    #[error("Invalid rows: {0}")]
    List(#[from] ListError),

    /// Generic I/O error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading or writing the saved order file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// I/O failure on the order file.
    #[error("Failed to access order file {path}: {source}")]
    Io {
        /// Order file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The order file is not valid JSON.
    #[error("Invalid order file {path}: {source}")]
    Format {
        /// Order file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
