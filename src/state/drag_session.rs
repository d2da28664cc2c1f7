//! Drag session controller.
//!
//! Tracks at most one in-flight reorder gesture:
//!
//! ```text
//! Idle --begin--> Dragging --move--> Dragging
//!                 Dragging --end----> Idle   (one notification)
//!                 Dragging --cancel-> Idle   (row restored, no notification)
//! ```
//!
//! Moves are applied to the store immediately and the view shows the
//! provisional order; `cancel` puts the row back at its origin.

use tracing::debug;

use crate::model::{ListError, Position, RowGeometry, RowId};
use crate::state::notifier::ReorderNotifier;
use crate::store::RowStore;

/// The live gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Row being dragged.
    pub dragged_row_id: RowId,
    /// Index of the row when the gesture started.
    pub origin_index: usize,
    /// Most recent pointer position.
    pub last_pointer_position: Position,
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture.
    #[default]
    Idle,
    /// A gesture is in progress.
    Dragging(DragSession),
}

impl DragState {
    fn name(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::Dragging(_) => "dragging",
        }
    }
}

/// Converts pointer gestures into store moves.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a gesture is live.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// The live gesture, if any.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Start a gesture on `row_id`. Returns the row's origin index.
    ///
    /// # Errors
    ///
    /// - [`ListError::InvalidState`] if a gesture is already live.
    /// - [`ListError::NotFound`] if the row is not in the store.
    pub fn begin(
        &mut self,
        row_id: RowId,
        pointer: Position,
        store: &RowStore,
    ) -> Result<usize, ListError> {
        self.require_idle("begin")?;
        let origin_index = store
            .index_of(&row_id)
            .ok_or_else(|| ListError::NotFound(row_id.clone()))?;

        debug!(id = %row_id, origin_index, "drag begin");
        self.state = DragState::Dragging(DragSession {
            dragged_row_id: row_id,
            origin_index,
            last_pointer_position: pointer,
        });
        Ok(origin_index)
    }

    /// Follow the pointer, moving the dragged row in the store.
    ///
    /// Upper half of the row under the pointer is the gap before that row,
    /// lower half the gap after it; the dragged row lands in that gap.
    /// Returns the dragged row's new index,
    /// or `None` when the pointer is not over any row (store untouched).
    ///
    /// # Errors
    ///
    /// - [`ListError::InvalidState`] when idle.
    /// - [`ListError::NotFound`] when the dragged row left the store.
    pub fn move_pointer<G>(
        &mut self,
        pointer: Position,
        store: &mut RowStore,
        geometry: &G,
    ) -> Result<Option<usize>, ListError>
    where
        G: RowGeometry + ?Sized,
    {
        let session = match &mut self.state {
            DragState::Dragging(session) => session,
            DragState::Idle => return Err(Self::invalid("move", &DragState::Idle)),
        };
        session.last_pointer_position = pointer;

        let Some(hit) = geometry.row_at(pointer) else {
            return Ok(None);
        };
        let Some(hit_index) = store.index_of(&hit.id) else {
            debug!(id = %hit.id, "geometry reported a row that is not in the store");
            return Ok(None);
        };

        // Insertion gap in the current order, counting the dragged row.
        let gap = if hit.bounds.is_upper_half(pointer) {
            hit_index
        } else {
            hit_index + 1
        };
        let current = store
            .index_of(&session.dragged_row_id)
            .ok_or_else(|| ListError::NotFound(session.dragged_row_id.clone()))?;
        // Taking the row out first shifts every gap below it up by one.
        let target = if current < gap { gap - 1 } else { gap };
        let index = store.move_to(&session.dragged_row_id, target)?;
        Ok(Some(index))
    }

    /// Commit the gesture: back to idle, one notification with the final order.
    ///
    /// # Errors
    ///
    /// [`ListError::InvalidState`] when idle.
    pub fn end(
        &mut self,
        store: &RowStore,
        notifier: &mut ReorderNotifier,
    ) -> Result<Vec<RowId>, ListError> {
        let session = self.take_session("end")?;
        let order = store.ids();
        debug!(
            id = %session.dragged_row_id,
            origin_index = session.origin_index,
            final_index = ?store.index_of(&session.dragged_row_id),
            "drag end"
        );
        notifier.notify(&order);
        Ok(order)
    }

    /// Abort the gesture: restore the row to its origin, no notification.
    ///
    /// If the dragged row has left the store meanwhile there is nothing to
    /// restore and the controller simply returns to idle.
    ///
    /// # Errors
    ///
    /// [`ListError::InvalidState`] when idle.
    pub fn cancel(&mut self, store: &mut RowStore) -> Result<(), ListError> {
        let session = self.take_session("cancel")?;
        debug!(id = %session.dragged_row_id, origin_index = session.origin_index, "drag cancel");
        match store.move_to(&session.dragged_row_id, session.origin_index) {
            Ok(_) => Ok(()),
            Err(ListError::NotFound(id)) => {
                debug!(%id, "dragged row vanished before cancel");
                Ok(())
            }
            Err(other) => Err(other),
        }
    }

    /// Shift the origin after a row was inserted at `index` mid-gesture, so a
    /// cancel still returns the dragged row between the same neighbours.
    pub fn row_inserted(&mut self, index: usize, store: &RowStore) {
        let Some((session, dragged)) = self.session_with_index(store) else {
            return;
        };
        let others = if dragged < index { index - 1 } else { index };
        if others < session.origin_index || (others == session.origin_index && index < dragged) {
            session.origin_index += 1;
            debug!(origin_index = session.origin_index, "drag origin shifted by insert");
        }
    }

    /// Shift the origin after the row at `index` (its index before removal)
    /// left the store mid-gesture.
    pub fn row_removed(&mut self, index: usize, store: &RowStore) {
        let Some((session, dragged)) = self.session_with_index(store) else {
            return;
        };
        let others = if dragged < index { index - 1 } else { index };
        if others < session.origin_index {
            session.origin_index -= 1;
            debug!(origin_index = session.origin_index, "drag origin shifted by removal");
        }
    }

    /// Drop the gesture without touching the store.
    ///
    /// Used when the dragged row is removed mid-gesture.
    pub fn abandon(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    fn require_idle(&self, operation: &'static str) -> Result<(), ListError> {
        match &self.state {
            DragState::Idle => Ok(()),
            other => Err(Self::invalid(operation, other)),
        }
    }

    /// The live session and the dragged row's current index.
    ///
    /// Moves only relocate the dragged row, so the other rows keep their
    /// gesture-start order and the origin is a gap among them.
    fn session_with_index(&mut self, store: &RowStore) -> Option<(&mut DragSession, usize)> {
        match &mut self.state {
            DragState::Dragging(session) => {
                let index = store.index_of(&session.dragged_row_id)?;
                Some((session, index))
            }
            DragState::Idle => None,
        }
    }

    fn take_session(&mut self, operation: &'static str) -> Result<DragSession, ListError> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Ok(session),
            DragState::Idle => Err(Self::invalid(operation, &DragState::Idle)),
        }
    }

    fn invalid(operation: &'static str, state: &DragState) -> ListError {
        ListError::InvalidState {
            operation,
            state: state.name(),
        }
    }
}

#[cfg(test)]
#[path = "drag_session_tests.rs"]
mod tests;
