//! Header state: the active sort column and its direction.
//!
//! A flat two-field state machine with one event, [`HeaderState::activate`].
//! Activating the active column toggles the direction; activating any other
//! column makes it active and resets the direction to ascending.

use tracing::debug;

use crate::model::{ColumnName, ListError};
use crate::sort::{SortDirection, compute_order};
use crate::state::notifier::ReorderNotifier;
use crate::store::RowStore;

/// `(active column, direction)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    /// Column currently sorted on, if any.
    pub column: Option<ColumnName>,
    /// Direction for that column.
    pub direction: SortDirection,
}

impl SortState {
    /// Ascending on `column`.
    pub fn ascending(column: ColumnName) -> Self {
        Self {
            column: Some(column),
            direction: SortDirection::Ascending,
        }
    }

    /// The state after a header activation of `column`.
    pub fn toggled(&self, column: &ColumnName) -> Self {
        match &self.column {
            Some(active) if active == column => Self {
                column: Some(column.clone()),
                direction: self.direction.toggled(),
            },
            _ => Self::ascending(column.clone()),
        }
    }

    /// Whether `column` is the active one.
    pub fn is_active(&self, column: &ColumnName) -> bool {
        self.column.as_ref() == Some(column)
    }
}

/// Tracks the sort header and applies sorts to the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderState {
    state: SortState,
}

impl HeaderState {
    /// Start with `default_column` ascending.
    pub fn new(default_column: ColumnName) -> Self {
        Self {
            state: SortState::ascending(default_column),
        }
    }

    /// Current sort state.
    pub fn sort_state(&self) -> &SortState {
        &self.state
    }

    /// Active column.
    pub fn active_column(&self) -> Option<&ColumnName> {
        self.state.column.as_ref()
    }

    /// Active direction.
    pub fn direction(&self) -> SortDirection {
        self.state.direction
    }

    /// Handle a header activation.
    ///
    /// Transitions the state, sorts a snapshot of the store, adopts the
    /// result with `apply_order` and notifies once. On error nothing
    /// changes: not the state, not the store, and no notification is sent.
    pub fn activate(
        &mut self,
        column: &ColumnName,
        store: &mut RowStore,
        notifier: &mut ReorderNotifier,
    ) -> Result<&SortState, ListError> {
        let next = self.state.toggled(column);

        let snapshot = store.snapshot();
        let order = compute_order(&snapshot, store.columns(), column, next.direction)?;
        store.apply_order(&order)?;

        debug!(column = %column, direction = ?next.direction, "header activated");
        self.state = next;
        notifier.notify(&order);
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnDescriptor, ColumnSet, Row, RowId};
    use std::sync::mpsc;

    fn col(name: &str) -> ColumnName {
        ColumnName::new(name).unwrap()
    }

    fn store() -> RowStore {
        let columns = ColumnSet::new(vec![
            ColumnDescriptor::text(col("a")),
            ColumnDescriptor::numeric(col("b")),
        ])
        .unwrap();
        let rows = [("x", "3", 1i64), ("y", "1", 3), ("z", "2", 2)]
            .into_iter()
            .map(|(id, a, b)| {
                Row::new(RowId::new(id).unwrap())
                    .with_cell(col("a"), a)
                    .with_cell(col("b"), b)
            })
            .collect();
        RowStore::with_rows(columns, rows).unwrap()
    }

    fn order(store: &RowStore) -> Vec<String> {
        store.ids().iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn same_column_toggles_direction() {
        let state = SortState::ascending(col("a"));
        let next = state.toggled(&col("a"));
        assert_eq!(next.column, Some(col("a")));
        assert_eq!(next.direction, SortDirection::Descending);
    }

    #[test]
    fn other_column_resets_to_ascending() {
        let state = SortState::ascending(col("a")).toggled(&col("a"));
        let next = state.toggled(&col("b"));
        assert_eq!(next, SortState::ascending(col("b")));
    }

    #[test]
    fn unsorted_state_activates_ascending() {
        let next = SortState::default().toggled(&col("b"));
        assert_eq!(next, SortState::ascending(col("b")));
    }

    #[test]
    fn activate_sorts_store_and_notifies_once() {
        let mut store = store();
        let (tx, rx) = mpsc::channel();
        let mut notifier = ReorderNotifier::new(tx);
        let mut header = HeaderState::new(col("a"));

        // Default is (a, asc): activating a flips to descending.
        let state = header.activate(&col("a"), &mut store, &mut notifier).unwrap();
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(order(&store), ["x", "z", "y"]);

        let sent = rx.try_recv().unwrap();
        assert_eq!(sent, store.ids());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn activate_other_column_sorts_ascending() {
        let mut store = store();
        let mut notifier = ReorderNotifier::silent();
        let mut header = HeaderState::new(col("a"));

        header.activate(&col("a"), &mut store, &mut notifier).unwrap();
        let state = header.activate(&col("b"), &mut store, &mut notifier).unwrap();

        assert_eq!(state, &SortState::ascending(col("b")));
        assert_eq!(order(&store), ["x", "z", "y"]);
        assert_eq!(notifier.notifications(), 2);
    }

    #[test]
    fn unknown_column_changes_nothing() {
        let mut store = store();
        let mut notifier = ReorderNotifier::silent();
        let mut header = HeaderState::new(col("a"));

        let err = header
            .activate(&col("nope"), &mut store, &mut notifier)
            .unwrap_err();

        assert_eq!(err, ListError::UnknownColumn(col("nope")));
        assert_eq!(header.sort_state(), &SortState::ascending(col("a")));
        assert_eq!(order(&store), ["x", "y", "z"]);
        assert_eq!(notifier.notifications(), 0);
    }
}
