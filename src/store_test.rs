#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn store_with(ids: &[&str]) -> PositionStore {
    let mut store = PositionStore::new();
    for (i, id) in ids.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64 * 10.0;
        store.set(id, pt(x, 0.0));
    }
    store
}

// =============================================================
// get / set / translate
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = PositionStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.get("a").is_none());
}

#[test]
fn set_then_get() {
    let mut store = PositionStore::new();
    store.set("a", pt(1.0, 2.0));
    assert_eq!(store.get("a"), Some(pt(1.0, 2.0)));
    assert!(store.contains("a"));
}

#[test]
fn set_existing_overwrites_center_only() {
    let mut store = store_with(&["a", "b"]);
    store.set("a", pt(99.0, 99.0));
    assert_eq!(store.get("a"), Some(pt(99.0, 99.0)));
    assert_eq!(store.draw_order(), vec!["a", "b"]);
}

#[test]
fn translate_moves_by_delta() {
    let mut store = PositionStore::new();
    store.set("a", pt(10.0, 10.0));
    assert!(store.translate("a", pt(-3.0, 5.0)));
    assert_eq!(store.get("a"), Some(pt(7.0, 15.0)));
}

#[test]
fn translate_unknown_is_false() {
    let mut store = PositionStore::new();
    assert!(!store.translate("ghost", pt(1.0, 1.0)));
    assert!(store.is_empty());
}

// =============================================================
// purge
// =============================================================

#[test]
fn purge_removes_only_missing_ids() {
    let mut store = store_with(&["a", "b", "c"]);
    let keep: HashSet<&str> = ["a", "c"].into_iter().collect();
    let purged = store.purge(&keep);
    assert_eq!(purged, vec!["b".to_owned()]);
    assert_eq!(store.len(), 2);
    assert!(store.contains("a"));
    assert!(store.contains("c"));
}

#[test]
fn purge_with_empty_keep_clears() {
    let mut store = store_with(&["a", "b"]);
    let purged = store.purge(&HashSet::new());
    assert_eq!(purged.len(), 2);
    assert!(store.is_empty());
}

// =============================================================
// draw order
// =============================================================

#[test]
fn draw_order_follows_insertion() {
    let store = store_with(&["c", "a", "b"]);
    assert_eq!(store.draw_order(), vec!["c", "a", "b"]);
}

#[test]
fn raise_to_top_moves_last() {
    let mut store = store_with(&["a", "b", "c"]);
    assert!(store.raise_to_top("a"));
    assert_eq!(store.draw_order(), vec!["b", "c", "a"]);
}

#[test]
fn raise_unknown_is_false() {
    let mut store = store_with(&["a"]);
    assert!(!store.raise_to_top("zzz"));
    assert_eq!(store.draw_order(), vec!["a"]);
}

#[test]
fn iter_visits_all() {
    let store = store_with(&["a", "b"]);
    let mut seen: Vec<&str> = store.iter().map(|(id, _)| id).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec!["a", "b"]);
}
