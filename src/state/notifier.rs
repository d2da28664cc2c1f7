//! Reorder notifier: the boundary between the list model and persistence.
//!
//! Every logical reorder (a header sort, a committed drag, a keyboard move)
//! results in exactly one [`ReorderNotifier::notify`] call. Intermediate drag
//! moves and cancelled gestures never reach it.

use std::sync::mpsc;

use tracing::{debug, warn};

use crate::model::RowId;

/// Receiver of "order changed" events.
///
/// Called with the complete, valid permutation of the live ids. Durability
/// and failure handling belong to the sink; nothing is reported back.
pub trait OrderSink {
    /// The list order changed to `ordered_ids`.
    fn on_order_changed(&mut self, ordered_ids: &[RowId]);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OrderSink for NullSink {
    fn on_order_changed(&mut self, _ordered_ids: &[RowId]) {}
}

impl OrderSink for mpsc::Sender<Vec<RowId>> {
    fn on_order_changed(&mut self, ordered_ids: &[RowId]) {
        if self.send(ordered_ids.to_vec()).is_err() {
            warn!("order change receiver dropped");
        }
    }
}

/// Forwards completed reorders to an [`OrderSink`].
pub struct ReorderNotifier {
    sink: Box<dyn OrderSink>,
    notifications: u64,
}

impl ReorderNotifier {
    /// Wrap a sink.
    pub fn new(sink: impl OrderSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            notifications: 0,
        }
    }

    /// Notifier that discards events.
    pub fn silent() -> Self {
        Self::new(NullSink)
    }

    /// Forward the full order to the sink.
    pub fn notify(&mut self, ordered_ids: &[RowId]) {
        self.notifications += 1;
        debug!(
            rows = ordered_ids.len(),
            notification = self.notifications,
            "order changed"
        );
        self.sink.on_order_changed(ordered_ids);
    }

    /// Number of notifications sent so far.
    pub fn notifications(&self) -> u64 {
        self.notifications
    }
}

impl std::fmt::Debug for ReorderNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderNotifier")
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl Default for ReorderNotifier {
    fn default() -> Self {
        Self::silent()
    }
}
