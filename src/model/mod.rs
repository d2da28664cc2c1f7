//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod column;
pub mod error;
pub mod geometry;
pub mod identifiers;
pub mod row;

// Re-export for convenience
pub use column::{ColumnDescriptor, ColumnKind, ColumnSet};
pub use error::{AppError, ListError, PersistError, SourceError};
pub use geometry::{Bounds, Position, RowGeometry, RowHit};
pub use identifiers::{ColumnName, InvalidColumnName, InvalidRowId, RowId};
pub use row::{CellValue, Row};
