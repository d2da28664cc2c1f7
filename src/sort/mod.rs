//! Sort engine (pure).
//!
//! Computes a new total order for a slice of rows without touching them.
//! The result is a sequence of ids for [`RowStore::apply_order`].
//!
//! Sorting is stable in both directions. Descending flips the comparator,
//! it does not reverse the ascending result, so rows with equal keys keep
//! their input order either way.
//!
//! [`RowStore::apply_order`]: crate::store::RowStore::apply_order

use std::cmp::Ordering;

use crate::model::{CellValue, ColumnKind, ColumnName, ColumnSet, ListError, Row, RowId};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Order `rows` by `column` in `direction`, returning the ids.
///
/// # Errors
///
/// [`ListError::UnknownColumn`] when `column` is not in `columns`.
pub fn compute_order(
    rows: &[Row],
    columns: &ColumnSet,
    column: &ColumnName,
    direction: SortDirection,
) -> Result<Vec<RowId>, ListError> {
    let kind = columns
        .find(column)
        .map(|c| c.kind)
        .ok_or_else(|| ListError::UnknownColumn(column.clone()))?;

    let mut keyed: Vec<(&RowId, Option<&CellValue>)> =
        rows.iter().map(|r| (r.id(), r.cell(column))).collect();

    // slice::sort_by is stable: ties keep input order in both directions.
    keyed.sort_by(|(_, a), (_, b)| {
        let ord = compare_cells(*a, *b, kind);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    Ok(keyed.into_iter().map(|(id, _)| id.clone()).collect())
}

/// Compare two cells under a column's rule.
///
/// Numeric: numbers (including numeric text) first, by value; then other
/// text, lexicographically. Text: lexicographic on the display form.
/// Missing cells sort before everything.
pub fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>, kind: ColumnKind) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match kind {
        ColumnKind::Numeric => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(a, b),
        },
        ColumnKind::Text => compare_text(a, b),
    }
}

fn compare_text(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
