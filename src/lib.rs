//! sortlist
//!
//! A reorderable, sortable list model with a terminal table front-end.
//!
//! Rows live in a [`store::RowStore`] in their current order. They are
//! reordered in two ways: by dragging a row ([`state::DragController`]) or
//! by clicking a column header ([`state::HeaderState`]). [`state::SortableList`]
//! ties both together, and every completed reorder is reported once through
//! a [`state::ReorderNotifier`].
//!
//! The core (`model`, `sort`, `store`, `state`) is pure and has no terminal
//! dependency. `source`, `persist` and `view` are the impure shell around it.

pub mod config;
pub mod logging;
pub mod model;
pub mod persist;
pub mod sort;
pub mod source;
pub mod state;
pub mod store;
pub mod view;
