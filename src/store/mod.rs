//! Row store: the single source of truth for the current order.
//!
//! The store owns every live row exactly once. It never creates or destroys
//! rows on its own; the owning application inserts and removes them, and the
//! ordering components reposition them through [`RowStore::move_to`] and
//! [`RowStore::apply_order`].
//!
//! Rows live behind an `Arc`. [`RowStore::snapshot`] hands out a clone of
//! that `Arc`, and every mutation goes through `Arc::make_mut`, so a snapshot
//! taken before a mutation keeps seeing the old order in full.

use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::model::{ColumnSet, ListError, Row, RowId};

/// Point-in-time, read-only view of the store's rows in order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rows: Arc<Vec<Row>>,
}

impl Snapshot {
    /// Row ids in order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id().clone()).collect()
    }

    /// Position of a row in this snapshot.
    pub fn index_of(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }
}

impl Deref for Snapshot {
    type Target = [Row];

    fn deref(&self) -> &[Row] {
        &self.rows
    }
}

/// Ordered collection of rows over a fixed column set.
#[derive(Debug, Clone)]
pub struct RowStore {
    columns: ColumnSet,
    rows: Arc<Vec<Row>>,
    /// Ids that were removed; never accepted again.
    retired: HashSet<RowId>,
}

impl RowStore {
    /// Create an empty store.
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            columns,
            rows: Arc::new(Vec::new()),
            retired: HashSet::new(),
        }
    }

    /// Create a store and append `rows` in order.
    pub fn with_rows(columns: ColumnSet, rows: Vec<Row>) -> Result<Self, ListError> {
        let mut store = Self::new(columns);
        for row in rows {
            store.push(row)?;
        }
        Ok(store)
    }

    /// The fixed column set.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current position of a row.
    pub fn index_of(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }

    /// Whether a row is live.
    pub fn contains(&self, id: &RowId) -> bool {
        self.index_of(id).is_some()
    }

    /// Look up a live row.
    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Row at a position.
    pub fn row_at_index(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Ids in current order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id().clone()).collect()
    }

    /// Point-in-time view of the rows; later mutations are not visible in it.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: Arc::clone(&self.rows),
        }
    }

    /// Insert a row at `at_index` (`0..=len`).
    ///
    /// Unlike [`move_to`](Self::move_to) this does not clamp: insertion
    /// indices are computed by the caller and a bad one is a logic error.
    pub fn insert(&mut self, row: Row, at_index: usize) -> Result<(), ListError> {
        let len = self.rows.len();
        if at_index > len {
            return Err(ListError::IndexOutOfRange {
                index: at_index,
                len,
            });
        }
        self.validate_new_row(&row)?;

        debug!(id = %row.id(), at_index, "insert row");
        Arc::make_mut(&mut self.rows).insert(at_index, row);
        Ok(())
    }

    /// Append a row at the end.
    pub fn push(&mut self, row: Row) -> Result<(), ListError> {
        let len = self.rows.len();
        self.insert(row, len)
    }

    /// Remove a row; its id is retired and will not be accepted again.
    pub fn remove(&mut self, id: &RowId) -> Result<Row, ListError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ListError::NotFound(id.clone()))?;

        debug!(%id, index, "remove row");
        let row = Arc::make_mut(&mut self.rows).remove(index);
        self.retired.insert(id.clone());
        Ok(row)
    }

    /// Relocate a row so that it ends up at `target_index`.
    ///
    /// The target is clamped to `[0, len - 1]`; drag input is approximate and
    /// overshooting the list is not an error. Returns the final index.
    pub fn move_to(&mut self, id: &RowId, target_index: usize) -> Result<usize, ListError> {
        let from = self
            .index_of(id)
            .ok_or_else(|| ListError::NotFound(id.clone()))?;
        let to = target_index.min(self.rows.len() - 1);

        if from == to {
            return Ok(to);
        }

        debug!(%id, from, to, "move row");
        let rows = Arc::make_mut(&mut self.rows);
        if from < to {
            rows[from..=to].rotate_left(1);
        } else {
            rows[to..=from].rotate_right(1);
        }
        Ok(to)
    }

    /// Replace the whole ordering with a permutation of the live ids.
    ///
    /// Fails without touching the store when `ordered_ids` is not exactly the
    /// set of live ids (missing, extra, unknown or repeated ids).
    pub fn apply_order(&mut self, ordered_ids: &[RowId]) -> Result<(), ListError> {
        let len = self.rows.len();
        let invalid = || ListError::InvalidPermutation {
            expected: len,
            got: ordered_ids.len(),
        };

        if ordered_ids.len() != len {
            return Err(invalid());
        }

        let positions: HashMap<&RowId, usize> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id(), i))
            .collect();

        let mut taken = vec![false; len];
        let mut order = Vec::with_capacity(len);
        for id in ordered_ids {
            let &index = positions.get(id).ok_or_else(invalid)?;
            if std::mem::replace(&mut taken[index], true) {
                return Err(invalid());
            }
            order.push(index);
        }

        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return Ok(());
        }

        debug!(rows = len, "apply order");
        let reordered: Vec<Row> = order.into_iter().map(|i| self.rows[i].clone()).collect();
        self.rows = Arc::new(reordered);
        Ok(())
    }

    fn validate_new_row(&self, row: &Row) -> Result<(), ListError> {
        let id = row.id();
        if self.retired.contains(id) || self.contains(id) {
            return Err(ListError::DuplicateId(id.clone()));
        }

        let missing: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| row.cell(&c.name).is_none())
            .map(|c| c.name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ListError::ColumnMismatch {
                id: id.clone(),
                detail: format!("missing {}", missing.join(", ")),
            });
        }

        let extra: Vec<&str> = row
            .column_names()
            .filter(|name| !self.columns.contains(name))
            .map(|name| name.as_str())
            .collect();
        if !extra.is_empty() {
            return Err(ListError::ColumnMismatch {
                id: id.clone(),
                detail: format!("unexpected {}", extra.join(", ")),
            });
        }

        Ok(())
    }
}

/// Merge a preferred order with the live ids.
///
/// Preferred ids that are still live come first, in preferred order; live
/// ids the preference does not mention follow in their live order. The
/// result is always a permutation of `live`.
pub fn reconcile<S>(preferred: &[S], live: &[RowId]) -> Vec<RowId>
where
    S: AsRef<str>,
{
    let live_set: HashSet<&str> = live.iter().map(RowId::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(live.len());
    let mut order = Vec::with_capacity(live.len());

    for raw in preferred {
        let raw = raw.as_ref();
        if live_set.contains(raw) && seen.insert(raw) {
            if let Some(id) = live.iter().find(|id| id.as_str() == raw) {
                order.push(id.clone());
            }
        }
    }
    order.extend(live.iter().filter(|id| !seen.contains(id.as_str())).cloned());
    order
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
