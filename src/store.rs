//! Position store: the single owner of bubble centers.
//!
//! Layout, the repulsion simulator, and drag handling all mutate bubble
//! positions; they do so only through the entry points here. A key exists iff
//! its task was present with a valid id at the last layout pass. Entries are
//! created lazily on first placement and purged in batches when their task
//! leaves the input list.
//!
//! Each entry also carries a draw-order stamp. Raising a bubble gives it the
//! next stamp, so the most recently interacted bubble is drawn last and
//! hit-tested first.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use crate::camera::Point;
use crate::task::TaskId;

#[derive(Debug, Clone, Copy)]
struct Slot {
    center: Point,
    order: u64,
}

/// Task id -> center in canvas space, plus draw order.
#[derive(Debug, Default)]
pub struct PositionStore {
    slots: HashMap<TaskId, Slot>,
    next_order: u64,
}

impl PositionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Center of a bubble, if it has been placed.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Point> {
        self.slots.get(id).map(|s| s.center)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Place or move a bubble. New ids are stacked on top of existing ones.
    pub fn set(&mut self, id: &str, center: Point) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.center = center;
            return;
        }
        let order = self.bump_order();
        self.slots.insert(id.to_owned(), Slot { center, order });
    }

    /// Move a placed bubble by `delta`. Returns false if the id is unknown.
    pub fn translate(&mut self, id: &str, delta: Point) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        slot.center += delta;
        true
    }

    /// Drop every entry whose id is not in `keep`. Returns the purged ids.
    pub fn purge(&mut self, keep: &HashSet<&str>) -> Vec<TaskId> {
        let doomed: Vec<TaskId> = self
            .slots
            .keys()
            .filter(|id| !keep.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &doomed {
            self.slots.remove(id);
        }
        doomed
    }

    /// Give a bubble the highest draw order. Returns false if the id is unknown.
    pub fn raise_to_top(&mut self, id: &str) -> bool {
        if !self.slots.contains_key(id) {
            return false;
        }
        let order = self.bump_order();
        if let Some(slot) = self.slots.get_mut(id) {
            slot.order = order;
        }
        true
    }

    /// Ids sorted bottom-first (draw order). Ties break by id for determinism.
    #[must_use]
    pub fn draw_order(&self) -> Vec<&str> {
        let mut entries: Vec<(&TaskId, &Slot)> = self.slots.iter().collect();
        entries.sort_by(|a, b| a.1.order.cmp(&b.1.order).then_with(|| a.0.cmp(b.0)));
        entries.into_iter().map(|(id, _)| id.as_str()).collect()
    }

    /// `(id, center)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.slots.iter().map(|(id, s)| (id.as_str(), s.center))
    }

    /// Number of placed bubbles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no bubble is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn bump_order(&mut self) -> u64 {
        self.next_order += 1;
        self.next_order
    }
}
