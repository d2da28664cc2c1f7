//! Acceptance tests for the list model's reorder scenarios.
//!
//! Each test drives the public `SortableList` API the way the terminal front
//! end does, with a stand-in geometry of one line per row, and checks what
//! reaches the order sink.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use sortlist::model::{
    Bounds, ColumnDescriptor, ColumnName, ColumnSet, ListError, Position, Row, RowGeometry,
    RowHit, RowId,
};
use sortlist::persist::{load_order, JsonOrderSink};
use sortlist::sort::SortDirection;
use sortlist::source::{load_file, SourceOptions};
use sortlist::state::{ReorderNotifier, SortableList};
use sortlist::store::RowStore;

// ===== Test Fixtures =====

/// Rows drawn top to bottom, one line each, starting at y = 0.
struct Lines(Vec<RowId>);

impl RowGeometry for Lines {
    fn row_at(&self, pos: Position) -> Option<RowHit> {
        let id = self.0.get(usize::from(pos.y))?.clone();
        Some(RowHit {
            id,
            bounds: Bounds::new(0, pos.y, 80, 1),
        })
    }
}

fn lines(list: &SortableList) -> Lines {
    Lines(list.ids())
}

fn at(y: u16) -> Position {
    Position::new(3, y)
}

fn col(name: &str) -> ColumnName {
    ColumnName::new(name).unwrap()
}

fn id(raw: &str) -> RowId {
    RowId::new(raw).unwrap()
}

fn columns() -> ColumnSet {
    ColumnSet::new(vec![
        ColumnDescriptor::text(col("name")),
        ColumnDescriptor::numeric(col("size")),
    ])
    .unwrap()
}

fn store_of(rows: &[(&str, i64)]) -> RowStore {
    let rows = rows
        .iter()
        .map(|(raw, size)| {
            Row::new(id(raw))
                .with_cell(col("name"), *raw)
                .with_cell(col("size"), *size)
        })
        .collect();
    RowStore::with_rows(columns(), rows).unwrap()
}

/// A list over `(id, size)` pairs with a channel sink.
fn list_of(rows: &[(&str, i64)]) -> (SortableList, Receiver<Vec<RowId>>) {
    let (tx, rx) = mpsc::channel();
    let list = SortableList::new(store_of(rows), col("name"), ReorderNotifier::new(tx)).unwrap();
    (list, rx)
}

fn five() -> (SortableList, Receiver<Vec<RowId>>) {
    list_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)])
}

fn order(list: &SortableList) -> Vec<String> {
    list.ids().iter().map(|id| id.to_string()).collect()
}

fn strings(ids: &[RowId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sortlist_scenario_{}", name))
}

// ===== Sorting =====

#[test]
fn sort_is_stable_in_both_directions() {
    // GIVEN: rows 1..3 with sizes 5, 3, 5
    let (mut list, rx) = list_of(&[("1", 5), ("2", 3), ("3", 5)]);

    // WHEN: size is sorted ascending, then toggled
    list.on_header_click(&col("size")).unwrap();
    assert_eq!(order(&list), ["2", "1", "3"]);

    list.on_header_click(&col("size")).unwrap();
    // THEN: descending keeps 1 before 3
    assert_eq!(order(&list), ["1", "3", "2"]);

    let sent: Vec<Vec<String>> = rx.try_iter().map(|ids| strings(&ids)).collect();
    assert_eq!(sent, [vec!["2", "1", "3"], vec!["1", "3", "2"]]);
}

#[test]
fn header_toggles_then_switches_columns() {
    let (mut list, _rx) = five();

    // Header starts on name, ascending.
    let state = list.on_header_click(&col("name")).unwrap();
    assert_eq!(state.column, Some(col("name")));
    assert_eq!(state.direction, SortDirection::Descending);

    let state = list.on_header_click(&col("size")).unwrap();
    assert_eq!(state.column, Some(col("size")));
    assert_eq!(state.direction, SortDirection::Ascending);
}

#[test]
fn unknown_column_is_rejected_without_notifying() {
    let (mut list, rx) = five();
    let err = list.on_header_click(&col("colour")).unwrap_err();
    assert_eq!(err, ListError::UnknownColumn(col("colour")));
    assert!(rx.try_recv().is_err());
}

// ===== Dragging =====

#[test]
fn drag_commit_notifies_once_with_final_order() {
    let (mut list, rx) = five();

    // begin on "a", then three moves
    assert!(list.on_pointer_down(at(0), &lines(&list)).unwrap());
    list.on_pointer_move(at(2), &lines(&list)).unwrap();
    list.on_pointer_move(at(4), &lines(&list)).unwrap();
    list.on_pointer_move(at(3), &lines(&list)).unwrap();
    assert!(rx.try_recv().is_err(), "moves do not notify");

    let committed = list.on_pointer_up(at(3), &lines(&list)).unwrap();

    let expected = ["b", "c", "d", "a", "e"];
    assert_eq!(order(&list), expected);
    assert_eq!(strings(&committed.unwrap()), expected);
    let sent: Vec<Vec<RowId>> = rx.try_iter().collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(strings(&sent[0]), expected);
}

#[test]
fn drag_cancel_restores_origin_without_notifying() {
    let (mut list, rx) = five();

    // begin at index 2, drag to the top
    list.on_pointer_down(at(2), &lines(&list)).unwrap();
    list.on_pointer_move(at(0), &lines(&list)).unwrap();
    assert_eq!(order(&list), ["c", "a", "b", "d", "e"]);

    list.on_drag_cancelled().unwrap();

    assert_eq!(order(&list), ["a", "b", "c", "d", "e"]);
    assert!(!list.is_dragging());
    assert!(rx.try_recv().is_err());
}

#[test]
fn header_click_during_drag_is_invalid_state() {
    let (mut list, _rx) = five();
    list.on_pointer_down(at(1), &lines(&list)).unwrap();

    let err = list.on_header_click(&col("size")).unwrap_err();

    assert!(matches!(err, ListError::InvalidState { .. }));
    assert!(list.is_dragging(), "gesture survives the rejected click");
}

#[test]
fn removing_dragged_row_abandons_gesture() {
    let (mut list, rx) = five();
    list.on_pointer_down(at(1), &lines(&list)).unwrap();

    list.remove_row(&id("b")).unwrap();

    assert!(!list.is_dragging());
    assert_eq!(list.on_pointer_up(at(0), &lines(&list)).unwrap(), None);
    assert!(rx.try_recv().is_err());
}

// ===== Programmatic reorders =====

#[test]
fn move_row_clamps_overshoot() {
    let (mut list, rx) = five();

    let index = list.move_row(&id("a"), 999).unwrap();

    assert_eq!(index, 4);
    assert_eq!(order(&list), ["b", "c", "d", "e", "a"]);
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn manual_order_survives_sorting() {
    let (mut list, _rx) = list_of(&[("x", 3), ("y", 1), ("z", 2)]);
    list.move_row(&id("z"), 0).unwrap();

    list.on_header_click(&col("size")).unwrap();
    assert_eq!(order(&list), ["y", "z", "x"]);

    list.restore_manual_order().unwrap();
    assert_eq!(order(&list), ["z", "x", "y"]);
    assert_eq!(list.notifications(), 3);
}

// ===== Persistence =====

#[test]
fn committed_order_is_saved_and_restored() {
    let path = temp_path("roundtrip.json");
    let _ = fs::remove_file(&path);

    let mut first = SortableList::new(
        store_of(&[("a", 1), ("b", 2), ("c", 3)]),
        col("name"),
        ReorderNotifier::new(JsonOrderSink::new(&path)),
    )
    .unwrap();
    first.on_pointer_down(at(2), &lines(&first)).unwrap();
    first.on_pointer_move(at(0), &lines(&first)).unwrap();
    first.on_pointer_up(at(0), &lines(&first)).unwrap();

    // A later run: "b" is gone and "d" is new.
    let mut second = SortableList::new(
        store_of(&[("a", 1), ("c", 3), ("d", 4)]),
        col("name"),
        ReorderNotifier::silent(),
    )
    .unwrap();
    let saved = load_order(&path).unwrap().unwrap();
    second.apply_saved_order(&saved.ids).unwrap();

    let _ = fs::remove_file(&path);
    assert_eq!(saved.ids, ["c", "a", "b"]);
    assert_eq!(order(&second), ["c", "a", "d"]);
    assert_eq!(second.notifications(), 0);
}

// ===== Source =====

#[test]
fn jsonl_file_loads_into_a_sortable_list() {
    let path = temp_path("rows.jsonl");
    fs::write(
        &path,
        "{\"id\":\"a\",\"size\":10}\n{\"id\":\"b\",\"size\":9}\nnot json\n{\"id\":\"c\",\"size\":100}\n",
    )
    .unwrap();

    let loaded = load_file(&path, &SourceOptions::default());
    let _ = fs::remove_file(&path);
    let loaded = loaded.unwrap();
    assert_eq!(loaded.report.malformed(), 1);

    let store = loaded.into_store().unwrap();
    let mut list = SortableList::new(store, col("size"), ReorderNotifier::silent()).unwrap();
    list.on_header_click(&col("size")).unwrap();

    // Already on size ascending, so the click toggles. Numeric, not
    // lexicographic: 100 > 10 > 9.
    assert_eq!(order(&list), ["c", "a", "b"]);
}
