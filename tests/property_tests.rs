//! Property-based tests for ordering invariants.
//!
//! Tests validate:
//! 1. Identifier constructors reject empty strings
//! 2. No sequence of moves or permutations creates, drops or duplicates a row
//! 3. Sorting is stable in both directions
//! 4. Re-sorting a sorted list changes nothing

use proptest::prelude::*;
use sortlist::model::{ColumnDescriptor, ColumnName, ColumnSet, Row, RowId};
use sortlist::sort::{compute_order, SortDirection};
use sortlist::store::RowStore;
use std::cmp::Reverse;

fn size() -> ColumnName {
    ColumnName::new("size").unwrap()
}

fn store_with(sizes: &[i64]) -> RowStore {
    let columns = ColumnSet::new(vec![ColumnDescriptor::numeric(size())]).unwrap();
    let rows = sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| Row::new(RowId::new(format!("r{}", i)).unwrap()).with_cell(size(), s))
        .collect();
    RowStore::with_rows(columns, rows).unwrap()
}

fn sorted(mut ids: Vec<RowId>) -> Vec<RowId> {
    ids.sort();
    ids
}

#[derive(Debug, Clone)]
enum Op {
    /// Move the row at index `.0` to target `.1` (may overshoot).
    Move(usize, usize),
    /// Reorder by a permutation of current indices.
    Permute(Vec<usize>),
}

fn ops(n: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (0..n, 0..n + 10).prop_map(|(from, to)| Op::Move(from, to)),
        1 => Just((0..n).collect::<Vec<_>>())
            .prop_shuffle()
            .prop_map(Op::Permute),
    ];
    prop::collection::vec(op, 0..40)
}

// ===== Property 1: Identifier Constructors =====

proptest! {
    #[test]
    fn row_id_accepts_exactly_non_empty_strings(s in any::<String>()) {
        prop_assert_eq!(RowId::new(s.as_str()).is_ok(), !s.is_empty());
    }

    #[test]
    fn column_name_accepts_exactly_non_empty_strings(s in any::<String>()) {
        prop_assert_eq!(ColumnName::new(s.as_str()).is_ok(), !s.is_empty());
    }
}

// ===== Property 2: Identity Preservation =====

proptest! {
    #[test]
    fn reorders_preserve_row_identity(
        (n, script) in (1usize..30).prop_flat_map(|n| (Just(n), ops(n)))
    ) {
        let mut store = store_with(&vec![0; n]);
        let before = sorted(store.ids());

        for op in script {
            let ids = store.ids();
            match op {
                Op::Move(from, to) => {
                    let index = store.move_to(&ids[from], to).unwrap();
                    prop_assert_eq!(index, to.min(n - 1));
                    prop_assert_eq!(store.index_of(&ids[from]), Some(index));
                }
                Op::Permute(perm) => {
                    let order: Vec<RowId> = perm.iter().map(|&i| ids[i].clone()).collect();
                    store.apply_order(&order).unwrap();
                    prop_assert_eq!(store.ids(), order);
                }
            }
            prop_assert_eq!(store.len(), n);
        }

        prop_assert_eq!(sorted(store.ids()), before);
    }

    #[test]
    fn non_permutations_are_rejected_without_change(
        n in 2usize..20,
        drop_index in any::<prop::sample::Index>(),
    ) {
        let mut store = store_with(&vec![0; n]);
        let before = store.ids();

        let mut order = before.clone();
        order.remove(drop_index.index(n));
        prop_assert!(store.apply_order(&order).is_err(), "missing id");

        order.push(order[0].clone());
        prop_assert!(store.apply_order(&order).is_err(), "repeated id");

        prop_assert_eq!(store.ids(), before);
    }
}

// ===== Property 3: Sort Stability =====

proptest! {
    #[test]
    fn ascending_sort_is_stable(sizes in prop::collection::vec(0i64..4, 0..40)) {
        let store = store_with(&sizes);
        let order = compute_order(&store.snapshot(), store.columns(), &size(), SortDirection::Ascending).unwrap();

        let keys: Vec<(i64, usize)> = order
            .iter()
            .map(|id| {
                let i = store.index_of(id).unwrap();
                (sizes[i], i)
            })
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn descending_sort_is_stable(sizes in prop::collection::vec(0i64..4, 0..40)) {
        let store = store_with(&sizes);
        let order = compute_order(&store.snapshot(), store.columns(), &size(), SortDirection::Descending).unwrap();

        let keys: Vec<(Reverse<i64>, usize)> = order
            .iter()
            .map(|id| {
                let i = store.index_of(id).unwrap();
                (Reverse(sizes[i]), i)
            })
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(keys, expected);
    }
}

// ===== Property 4: Idempotent Re-sort =====

proptest! {
    #[test]
    fn resorting_sorted_rows_is_identity(
        sizes in prop::collection::vec(-5i64..5, 0..40),
        descending in any::<bool>(),
    ) {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let mut store = store_with(&sizes);

        let first = compute_order(&store.snapshot(), store.columns(), &size(), direction).unwrap();
        store.apply_order(&first).unwrap();
        let second = compute_order(&store.snapshot(), store.columns(), &size(), direction).unwrap();

        prop_assert_eq!(first, second);
    }
}
