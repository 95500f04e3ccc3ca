//! Initial bubble placement.
//!
//! New tasks are placed along a golden-angle spiral anchored at the canvas
//! center. Each task gets a stable pseudo-random phase derived from its id, so
//! the same task set always lays out the same way while neighbouring tasks do
//! not line up. Candidates are tested against every bubble already placed;
//! the first collision-free candidate wins, otherwise the least-overlapping
//! candidate seen is accepted. Placement never loops past the attempt budget
//! and never leaves a bubble unplaced.
//!
//! Existing positions are kept untouched across passes, except that a viewport
//! resize clamps them back into the new bounds.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashSet;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::camera::{Circle, Point, Size};
use crate::config::CanvasConfig;
use crate::consts::GOLDEN_ANGLE;
use crate::store::PositionStore;
use crate::task::{Task, TaskId};

/// A bubble that could only be placed overlapping its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Crowding {
    pub id: TaskId,
    /// Total overlap (including buffer) against all bubbles placed before it.
    pub overlap: f64,
}

/// What one layout pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    /// Ids that received an initial position, in input order.
    pub placed: Vec<TaskId>,
    /// Ids whose positions were dropped.
    pub purged: Vec<TaskId>,
    /// Existing bubbles pulled back inside the bounds after a resize.
    pub clamped: usize,
    /// Tasks skipped for lacking an id.
    pub skipped: usize,
    /// Placements that had to accept overlap.
    pub crowded: Vec<Crowding>,
}

impl LayoutReport {
    /// True when the pass moved, added or removed anything.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.placed.is_empty() || !self.purged.is_empty() || self.clamped > 0
    }
}

/// Result of [`LayoutEngine::layout`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    /// The viewport is not measured yet; nothing was touched. Retry later.
    Deferred,
    Applied(LayoutReport),
}

/// Layout state kept between passes.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    last_size: Option<Size>,
}

impl LayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring `store` in line with `tasks` inside a viewport of `size`.
    ///
    /// Purges ids no longer present, places new ids, and clamps existing ones
    /// if the size changed since the previous applied pass.
    pub fn layout(
        &mut self,
        tasks: &[Task],
        store: &mut PositionStore,
        size: Size,
        cfg: &CanvasConfig,
    ) -> LayoutOutcome {
        if !size.is_measured() {
            debug!(width = size.width, height = size.height, "layout deferred: viewport not measured");
            return LayoutOutcome::Deferred;
        }

        let mut report = LayoutReport::default();

        let keep: HashSet<&str> = tasks.iter().filter_map(Task::layout_id).collect();
        report.skipped = tasks.iter().filter(|t| t.layout_id().is_none()).count();
        if report.skipped > 0 {
            warn!(count = report.skipped, "tasks without an id excluded from layout");
        }
        report.purged = store.purge(&keep);

        let resized = self.last_size.is_some_and(|prev| prev != size);
        self.last_size = Some(size);
        if resized {
            report.clamped = clamp_all(tasks, store, size);
        }

        let mut placed: Vec<Circle> = tasks
            .iter()
            .filter_map(|t| {
                let id = t.layout_id()?;
                store.get(id).map(|c| Circle::new(c, t.radius()))
            })
            .collect();

        for (index, task) in tasks.iter().enumerate() {
            let Some(id) = task.layout_id() else {
                continue;
            };
            if store.contains(id) {
                continue;
            }
            let radius = task.radius();
            let placement = find_initial_bubble_position(index, id, radius, &placed, size, cfg);
            if placement.overlap > 0.0 {
                report.crowded.push(Crowding { id: id.to_owned(), overlap: placement.overlap });
            }
            store.set(id, placement.center);
            placed.push(Circle::new(placement.center, radius));
            report.placed.push(id.to_owned());
        }

        if report.changed() {
            debug!(
                placed = report.placed.len(),
                purged = report.purged.len(),
                clamped = report.clamped,
                crowded = report.crowded.len(),
                "layout pass applied"
            );
        }
        LayoutOutcome::Applied(report)
    }
}

/// A chosen spot plus how much overlap had to be accepted to get it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point,
    /// Summed positive overlap against `placed`; `0.0` when collision-free.
    pub overlap: f64,
    /// Spiral candidates evaluated.
    pub attempts: usize,
}

/// Search the spiral for a spot for a new bubble of `radius`.
///
/// Evaluates at most `cfg.placement_attempts` candidates. Returns the first
/// collision-free one, else the candidate with least total overlap.
#[must_use]
pub fn find_initial_bubble_position(
    index: usize,
    id: &str,
    radius: f64,
    placed: &[Circle],
    size: Size,
    cfg: &CanvasConfig,
) -> Placement {
    let origin = size.center();
    let mut rng = StdRng::seed_from_u64(stable_hash(id));
    let phase = rng.random::<f64>() * TAU;
    let jitter = rng.random::<f64>() * cfg.spiral_step;

    let mut best: Option<Placement> = None;
    let attempts = cfg.placement_attempts.max(1);
    for attempt in 0..attempts {
        #[allow(clippy::cast_precision_loss)]
        let k = (index + attempt) as f64;
        let angle = phase + k * GOLDEN_ANGLE;
        let dist = jitter + k * cfg.spiral_step;
        let raw = Point::new(origin.x + dist * angle.cos(), origin.y + dist * angle.sin());
        let center = clamp_into(raw, radius, size);

        let candidate = Circle::new(center, radius);
        let overlap: f64 = placed
            .iter()
            .map(|other| candidate.overlap(other, cfg.overlap_buffer).max(0.0))
            .sum();

        let placement = Placement { center, overlap, attempts: attempt + 1 };
        if overlap <= 0.0 {
            return placement;
        }
        if best.is_none_or(|b| overlap < b.overlap) {
            best = Some(placement);
        }
    }

    match best {
        Some(b) => Placement { attempts, ..b },
        None => Placement { center: clamp_into(origin, radius, size), overlap: 0.0, attempts },
    }
}

/// Keep a circle of `radius` inside `size`; centers it on an axis too short to fit it.
#[must_use]
pub fn clamp_into(p: Point, radius: f64, size: Size) -> Point {
    let axis = |v: f64, extent: f64| {
        if extent <= radius * 2.0 {
            extent * 0.5
        } else {
            v.clamp(radius, extent - radius)
        }
    };
    Point::new(axis(p.x, size.width), axis(p.y, size.height))
}

fn clamp_all(tasks: &[Task], store: &mut PositionStore, size: Size) -> usize {
    let mut clamped = 0;
    for task in tasks {
        let Some(id) = task.layout_id() else {
            continue;
        };
        let Some(center) = store.get(id) else {
            continue;
        };
        let inside = clamp_into(center, task.radius(), size);
        if inside != center {
            store.set(id, inside);
            clamped += 1;
        }
    }
    clamped
}

/// FNV-1a over the id bytes; stable across runs and platforms.
#[must_use]
pub fn stable_hash(id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    id.bytes().fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
