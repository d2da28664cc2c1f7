//! The list model facade.
//!
//! [`SortableList`] owns the row store, the header state, the drag
//! controller and the notifier, and is the only thing the presentation layer
//! talks to. Inbound events arrive as method calls; geometry is passed in per
//! call because only the renderer knows where rows were drawn.
//!
//! Besides routing, the facade remembers the last manual order (the initial
//! load, a committed drag, a keyboard move) so a header sort can be undone
//! with [`SortableList::restore_manual_order`].

use tracing::debug;

use crate::model::{ColumnName, ListError, Position, Row, RowGeometry, RowId};
use crate::state::drag_session::{DragController, DragSession, DragState};
use crate::state::header_state::{HeaderState, SortState};
use crate::state::notifier::ReorderNotifier;
use crate::store::{reconcile, RowStore, Snapshot};

/// Reorderable, sortable list.
#[derive(Debug)]
pub struct SortableList {
    store: RowStore,
    header: HeaderState,
    drag: DragController,
    notifier: ReorderNotifier,
    manual_order: Vec<RowId>,
}

impl SortableList {
    /// Wrap a populated store.
    ///
    /// The header starts on `default_column`, ascending. The rows are not
    /// sorted: their current order is the initial manual order.
    ///
    /// # Errors
    ///
    /// [`ListError::UnknownColumn`] when `default_column` is not in the store's
    /// column set.
    pub fn new(
        store: RowStore,
        default_column: ColumnName,
        notifier: ReorderNotifier,
    ) -> Result<Self, ListError> {
        if !store.columns().contains(&default_column) {
            return Err(ListError::UnknownColumn(default_column));
        }
        let manual_order = store.ids();
        Ok(Self {
            store,
            header: HeaderState::new(default_column),
            drag: DragController::new(),
            notifier,
            manual_order,
        })
    }

    // ===== Queries =====

    /// The underlying store.
    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// Point-in-time view of the rows.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Ids in current order.
    pub fn ids(&self) -> Vec<RowId> {
        self.store.ids()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Active sort column and direction.
    pub fn sort_state(&self) -> &SortState {
        self.header.sort_state()
    }

    /// Drag controller state.
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// The live gesture, if any.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Whether a gesture is live.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Last remembered manual order.
    pub fn manual_order(&self) -> &[RowId] {
        &self.manual_order
    }

    /// Notifications sent so far.
    pub fn notifications(&self) -> u64 {
        self.notifier.notifications()
    }

    // ===== Inbound events =====

    /// Header click on `column`.
    ///
    /// # Errors
    ///
    /// - [`ListError::InvalidState`] while a gesture is live.
    /// - [`ListError::UnknownColumn`] for a column not in the set.
    pub fn on_header_click(&mut self, column: &ColumnName) -> Result<&SortState, ListError> {
        self.require_idle("sort")?;
        self.header
            .activate(column, &mut self.store, &mut self.notifier)
    }

    /// Pointer pressed. Starts a gesture when the pointer is over a row.
    ///
    /// Returns whether a gesture started.
    pub fn on_pointer_down<G>(&mut self, pos: Position, geometry: &G) -> Result<bool, ListError>
    where
        G: RowGeometry + ?Sized,
    {
        let Some(hit) = geometry.row_at(pos) else {
            return Ok(false);
        };
        match self.drag.begin(hit.id, pos, &self.store) {
            Ok(_) => Ok(true),
            Err(err) => tolerate(err).map(|()| false),
        }
    }

    /// Pointer moved. Ignored unless a gesture is live.
    ///
    /// Hover is routine, so the idle case is filtered here instead of
    /// surfacing the controller's `InvalidState`.
    ///
    /// Returns the dragged row's index after the move, if it moved.
    pub fn on_pointer_move<G>(
        &mut self,
        pos: Position,
        geometry: &G,
    ) -> Result<Option<usize>, ListError>
    where
        G: RowGeometry + ?Sized,
    {
        if !self.drag.is_dragging() {
            return Ok(None);
        }
        match self.drag.move_pointer(pos, &mut self.store, geometry) {
            Ok(index) => Ok(index),
            Err(err) => tolerate(err).map(|()| None),
        }
    }

    /// Pointer released. Applies a final move at `pos` and commits the
    /// gesture. Ignored when idle: a plain click releases without a gesture,
    /// so the controller's `InvalidState` is filtered here.
    ///
    /// Returns the committed order when a gesture ended.
    pub fn on_pointer_up<G>(
        &mut self,
        pos: Position,
        geometry: &G,
    ) -> Result<Option<Vec<RowId>>, ListError>
    where
        G: RowGeometry + ?Sized,
    {
        if !self.drag.is_dragging() {
            return Ok(None);
        }
        if let Err(err) = self.drag.move_pointer(pos, &mut self.store, geometry) {
            tolerate(err)?;
        }
        let order = self.drag.end(&self.store, &mut self.notifier)?;
        self.manual_order = order.clone();
        Ok(Some(order))
    }

    /// Gesture cancelled (Esc, focus loss). Ignored when idle, since Esc and
    /// focus loss arrive whether or not a gesture is live; the controller's
    /// `InvalidState` is filtered here.
    pub fn on_drag_cancelled(&mut self) -> Result<(), ListError> {
        if !self.drag.is_dragging() {
            return Ok(());
        }
        self.drag.cancel(&mut self.store)
    }

    // ===== Row lifecycle =====

    /// Insert a row at `at_index`.
    pub fn insert_row(&mut self, row: Row, at_index: usize) -> Result<(), ListError> {
        let id = row.id().clone();
        self.store.insert(row, at_index)?;
        self.drag.row_inserted(at_index, &self.store);

        // Keep the new row next to the same neighbour in the manual order.
        let manual_at = match at_index.checked_sub(1).and_then(|i| self.store.row_at_index(i)) {
            Some(prev) => self
                .manual_order
                .iter()
                .position(|m| m == prev.id())
                .map_or(self.manual_order.len(), |p| p + 1),
            None => 0,
        };
        self.manual_order.insert(manual_at, id);
        Ok(())
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Row) -> Result<(), ListError> {
        let len = self.store.len();
        self.insert_row(row, len)
    }

    /// Remove a row. Removing the dragged row aborts the gesture silently.
    ///
    /// Inserts and removals of other rows during a gesture keep its origin
    /// between the same neighbours.
    pub fn remove_row(&mut self, id: &RowId) -> Result<Row, ListError> {
        let index = self.store.index_of(id);
        let row = self.store.remove(id)?;
        if self.drag.session().is_some_and(|s| &s.dragged_row_id == id) {
            debug!(%id, "dragged row removed, gesture aborted");
            self.drag.abandon();
        } else if let Some(index) = index {
            self.drag.row_removed(index, &self.store);
        }
        self.manual_order.retain(|m| m != id);
        Ok(row)
    }

    // ===== Programmatic reorders =====

    /// Move one row to `target_index` as a complete reorder (one notification).
    ///
    /// # Errors
    ///
    /// - [`ListError::InvalidState`] while a gesture is live.
    /// - [`ListError::NotFound`] for an unknown id.
    pub fn move_row(&mut self, id: &RowId, target_index: usize) -> Result<usize, ListError> {
        self.require_idle("move row")?;
        let index = self.store.move_to(id, target_index)?;
        let order = self.store.ids();
        self.notifier.notify(&order);
        self.manual_order = order;
        Ok(index)
    }

    /// Re-apply the last manual order and notify once.
    ///
    /// The sort state is left as is.
    ///
    /// # Errors
    ///
    /// [`ListError::InvalidState`] while a gesture is live.
    pub fn restore_manual_order(&mut self) -> Result<(), ListError> {
        self.require_idle("restore order")?;
        let order = reconcile(&self.manual_order, &self.store.ids());
        self.store.apply_order(&order)?;
        debug!(rows = order.len(), "manual order restored");
        self.notifier.notify(&order);
        self.manual_order = order;
        Ok(())
    }

    /// Adopt a previously saved order without notifying.
    ///
    /// Saved ids that are gone are dropped; live ids missing from the save
    /// keep their relative order after the saved ones. The result becomes
    /// the manual order.
    pub fn apply_saved_order<S>(&mut self, saved: &[S]) -> Result<(), ListError>
    where
        S: AsRef<str>,
    {
        self.require_idle("apply saved order")?;
        let order = reconcile(saved, &self.store.ids());
        self.store.apply_order(&order)?;
        self.manual_order = order;
        Ok(())
    }

    fn require_idle(&self, operation: &'static str) -> Result<(), ListError> {
        if self.drag.is_dragging() {
            return Err(ListError::InvalidState {
                operation,
                state: "dragging",
            });
        }
        Ok(())
    }
}

/// Swallow stale references on pointer paths; pass everything else on.
fn tolerate(err: ListError) -> Result<(), ListError> {
    if err.is_benign() {
        debug!(error = %err, "ignoring stale pointer target");
        Ok(())
    } else {
        Err(err)
    }
}

#[cfg(test)]
#[path = "list_model_tests.rs"]
mod tests;
