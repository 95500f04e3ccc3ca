#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashMap;

use crate::camera::{Circle, Point};
use crate::store::PositionStore;
use crate::task::TaskId;

/// Return the topmost bubble whose disc contains `canvas_pt`.
///
/// Walks the store's draw order from the top down, so the most recently raised
/// bubble wins where bubbles overlap. Bubbles with no known radius are skipped.
#[must_use]
pub fn hit_test(canvas_pt: Point, store: &PositionStore, radii: &HashMap<TaskId, f64>) -> Option<TaskId> {
    store.draw_order().into_iter().rev().find_map(|id| {
        let center = store.get(id)?;
        let radius = *radii.get(id)?;
        Circle::new(center, radius).contains(canvas_pt).then(|| id.to_owned())
    })
}
