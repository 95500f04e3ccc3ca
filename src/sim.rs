//! Repulsion simulator: relaxes overlapping bubbles a little on every tick.
//!
//! Forces are accumulated for every overlapping pair before any bubble moves,
//! so the result does not depend on iteration order. Each tick's displacement
//! per bubble is capped. The bubble held by a drag is never moved here; it
//! still pushes its neighbours, at reduced strength.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::camera::{Circle, Point};
use crate::config::CanvasConfig;
use crate::consts::{COINCIDENT_EPSILON, PUSH_FACTOR, SETTLE_EPSILON};
use crate::store::PositionStore;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Fewer than two bubbles are placed.
    TooFew,
    /// No pair overlaps and nothing is being dragged; the force pass was skipped.
    Settled,
    Relaxed {
        /// Overlapping pairs found.
        pairs: usize,
        /// Bubbles displaced.
        moved: usize,
    },
}

struct Body<'a> {
    id: &'a str,
    circle: Circle,
    held: bool,
}

/// Fixed-step overlap relaxation.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// `seed` only affects the direction chosen for exactly coincident centers.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Run one tick over the bubbles in `radii` (`(id, radius)` pairs).
    ///
    /// Ids missing from `store` are ignored. `held` names the bubble under an
    /// active drag, if any.
    pub fn step(
        &mut self,
        store: &mut PositionStore,
        radii: &[(&str, f64)],
        held: Option<&str>,
        cfg: &CanvasConfig,
    ) -> TickOutcome {
        let bodies: Vec<Body<'_>> = radii
            .iter()
            .filter_map(|&(id, radius)| {
                let center = store.get(id)?;
                Some(Body { id, circle: Circle::new(center, radius), held: held == Some(id) })
            })
            .collect();

        if bodies.len() < 2 {
            return TickOutcome::TooFew;
        }
        if held.is_none() && !any_overlap(&bodies) {
            return TickOutcome::Settled;
        }

        let mut forces = vec![Point::ZERO; bodies.len()];
        let mut pairs = 0;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);
                let overlap = a.circle.overlap(&b.circle, 0.0);
                if overlap <= SETTLE_EPSILON {
                    continue;
                }
                pairs += 1;

                let delta = a.circle.center - b.circle.center;
                let dist = delta.length();
                let dir = if dist > COINCIDENT_EPSILON {
                    Point::new(delta.x / dist, delta.y / dist)
                } else {
                    let angle = self.rng.random::<f64>() * TAU;
                    Point::new(angle.cos(), angle.sin())
                };

                let push = overlap * PUSH_FACTOR;
                let on_a = if b.held { cfg.drag_repulsion_factor } else { 1.0 };
                let on_b = if a.held { cfg.drag_repulsion_factor } else { 1.0 };
                forces[i] += dir * (push * on_a);
                forces[j] += dir * (-push * on_b);
            }
        }

        let mut moved = 0;
        for (body, force) in bodies.iter().zip(forces) {
            if body.held {
                continue;
            }
            let len = force.length();
            if len <= 0.0 {
                continue;
            }
            let capped = if len > cfg.max_push_per_tick { force * (cfg.max_push_per_tick / len) } else { force };
            store.translate(body.id, capped);
            moved += 1;
        }

        trace!(pairs, moved, held = held.unwrap_or(""), "repulsion tick");
        TickOutcome::Relaxed { pairs, moved }
    }
}

fn any_overlap(bodies: &[Body<'_>]) -> bool {
    bodies.iter().enumerate().any(|(i, a)| {
        bodies[i + 1..]
            .iter()
            .any(|b| a.circle.overlap(&b.circle, 0.0) > SETTLE_EPSILON)
    })
}
