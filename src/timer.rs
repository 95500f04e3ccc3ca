//! Cancellable scheduled callbacks.
//!
//! The engine is driven by a single logical thread. Instead of owning real
//! timers it records deadlines here; the host (or [`crate::driver`]) sleeps
//! until [`Timers::next_deadline`] and then calls the engine's `advance`,
//! which drains the due slots. Each kind holds at most one deadline, so
//! re-scheduling replaces and cancelling is synchronous: a cancelled timer can
//! never fire late.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::collections::BTreeMap;

/// What a scheduled callback is for. Ordering is the tie-break for equal deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Long-press confirmation for the pending bubble touch.
    LongPress,
    /// Next repulsion simulator tick.
    SimTick,
    /// Next recenter animation frame.
    AnimationFrame,
    /// Layout deferred on an unmeasured viewport.
    LayoutRetry,
    /// Recenter deferred on an unmeasured viewport.
    RecenterRetry,
}

/// At most one pending deadline (milliseconds) per [`TimerKind`].
#[derive(Debug, Default)]
pub struct Timers {
    slots: BTreeMap<TimerKind, f64>,
}

impl Timers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `kind` to fire at `at_ms`, replacing any earlier deadline.
    pub fn schedule(&mut self, kind: TimerKind, at_ms: f64) {
        self.slots.insert(kind, at_ms);
    }

    /// Disarm `kind`. Returns true if it was armed.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slots.remove(&kind).is_some()
    }

    #[must_use]
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots.contains_key(&kind)
    }

    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<f64> {
        self.slots.get(&kind).copied()
    }

    /// Earliest armed deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.slots.values().copied().reduce(f64::min)
    }

    /// Disarm and return every kind due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<TimerKind> {
        let mut due: Vec<(TimerKind, f64)> = self
            .slots
            .iter()
            .filter(|(_, at)| **at <= now_ms)
            .map(|(kind, at)| (*kind, *at))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        for (kind, _) in &due {
            self.slots.remove(kind);
        }
        due.into_iter().map(|(kind, _)| kind).collect()
    }
}
