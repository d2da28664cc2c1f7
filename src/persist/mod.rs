//! Saved order: a JSON file holding the last committed row order.
//!
//! [`JsonOrderSink`] plugs into the reorder notifier and rewrites the file on
//! every completed reorder. At startup [`load_order`] reads it back and
//! [`reconcile`] fits it to whatever rows the source produced this time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{PersistError, RowId};
use crate::state::OrderSink;

/// On-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedOrder {
    /// When the order was written.
    pub saved_at: DateTime<Utc>,
    /// Row ids, first to last.
    pub ids: Vec<String>,
}

impl SavedOrder {
    /// Capture `ids` now.
    pub fn now(ids: &[RowId]) -> Self {
        Self::at(ids, Utc::now())
    }

    /// Capture `ids` with an explicit timestamp.
    pub fn at(ids: &[RowId], saved_at: DateTime<Utc>) -> Self {
        Self {
            saved_at,
            ids: ids.iter().map(|id| id.as_str().to_string()).collect(),
        }
    }
}

/// Write `order` to `path`, creating parent directories.
pub fn save_order(path: &Path, order: &SavedOrder) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(order).map_err(|source| PersistError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_err)
}

/// Read a saved order. A missing file is `Ok(None)`.
pub fn load_order(path: &Path) -> Result<Option<SavedOrder>, PersistError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved order");
            return Ok(None);
        }
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| PersistError::Format {
            path: path.to_path_buf(),
            source,
        })
}

/// Fit a saved order to the live ids.
///
/// Saved ids that are still live keep their saved order; live ids the save
/// does not know follow in their current order.
pub fn reconcile(saved: &SavedOrder, live: &[RowId]) -> Vec<RowId> {
    crate::store::reconcile(&saved.ids, live)
}

/// Order sink that rewrites a JSON file on every notification.
///
/// Write failures are logged and remembered, never propagated: the list
/// keeps working when the disk does not.
#[derive(Debug)]
pub struct JsonOrderSink {
    path: PathBuf,
    writes: u64,
    last_error: Option<String>,
}

impl JsonOrderSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: 0,
            last_error: None,
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Successful writes so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Message of the most recent failed write, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl OrderSink for JsonOrderSink {
    fn on_order_changed(&mut self, ordered_ids: &[RowId]) {
        match save_order(&self.path, &SavedOrder::now(ordered_ids)) {
            Ok(()) => {
                self.writes += 1;
                self.last_error = None;
                debug!(path = %self.path.display(), rows = ordered_ids.len(), "order saved");
            }
            Err(e) => {
                warn!(error = %e, "failed to save order");
                self.last_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ids(raw: &[&str]) -> Vec<RowId> {
        raw.iter().map(|r| RowId::new(*r).unwrap()).collect()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sortlist_persist_{}", name))
    }

    #[test]
    fn save_then_load_preserves_ids_and_time() {
        let path = temp_path("roundtrip.json");
        let when = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let order = SavedOrder::at(&ids(&["b", "a"]), when);

        save_order(&path, &order).unwrap();
        let loaded = load_order(&path);

        let _ = fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), Some(order));
    }

    #[test]
    fn load_missing_file_is_none() {
        let path = temp_path("missing_98765.json");
        assert_eq!(load_order(&path).unwrap(), None);
    }

    #[test]
    fn load_garbage_is_format_error() {
        let path = temp_path("garbage.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_order(&path);

        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(PersistError::Format { .. })));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = temp_path("nested_dir");
        let path = dir.join("deeper").join("order.json");
        let _ = fs::remove_dir_all(&dir);

        save_order(&path, &SavedOrder::now(&ids(&["x"]))).unwrap();
        let exists = path.exists();

        let _ = fs::remove_dir_all(&dir);
        assert!(exists);
    }

    #[test]
    fn sink_writes_each_notification() {
        let path = temp_path("sink.json");
        let mut sink = JsonOrderSink::new(&path);

        sink.on_order_changed(&ids(&["a", "b"]));
        sink.on_order_changed(&ids(&["b", "a"]));
        let saved = load_order(&path);

        let _ = fs::remove_file(&path);
        assert_eq!(sink.writes(), 2);
        assert_eq!(sink.last_error(), None);
        assert_eq!(saved.unwrap().unwrap().ids, ["b", "a"]);
    }

    #[test]
    fn sink_failure_is_recorded_not_raised() {
        // A regular file where a directory is needed makes the write fail.
        let blocker = temp_path("blocker_file");
        fs::write(&blocker, "").unwrap();
        let mut sink = JsonOrderSink::new(blocker.join("order.json"));

        sink.on_order_changed(&ids(&["a"]));

        let _ = fs::remove_file(&blocker);
        assert_eq!(sink.writes(), 0);
        assert!(sink.last_error().is_some());
    }

    #[test]
    fn reconcile_applies_saved_order_to_live_rows() {
        let saved = SavedOrder::now(&ids(&["c", "gone", "a"]));
        let order = reconcile(&saved, &ids(&["a", "b", "c"]));
        assert_eq!(order, ids(&["c", "a", "b"]));
    }
}
