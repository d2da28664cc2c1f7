//! Ordering state machines (pure).
//!
//! Everything here is plain data plus transitions over the row store. No
//! terminal, no files: the view and persistence layers sit on top.

pub mod drag_session;
pub mod header_state;
pub mod list_model;
pub mod notifier;

// Re-export for convenience
pub use drag_session::{DragController, DragSession, DragState};
pub use header_state::{HeaderState, SortState};
pub use list_model::SortableList;
pub use notifier::{NullSink, OrderSink, ReorderNotifier};
