//! Shared numeric constants for the bubble canvas.
//!
//! These are the defaults behind [`crate::config::CanvasConfig`]. Treat the
//! pixel and millisecond values as product-tunable; only "positive and finite"
//! is load-bearing.

// ── Sizing ──────────────────────────────────────────────────────

/// Radius of the smallest bubble, in canvas units.
pub const BASE_RADIUS: f64 = 30.0;

/// Extra radius added as the weighted priority/importance score reaches its ceiling.
pub const MAX_EXTRA_RADIUS: f64 = 50.0;

/// Weight of `priority` in the size score.
pub const PRIORITY_WEIGHT: f64 = 0.6;

/// Weight of `importance` in the size score.
pub const IMPORTANCE_WEIGHT: f64 = 0.4;

/// Weighted score of the smallest task (priority 1, importance 1).
pub const SCORE_MIN: f64 = 1.0;

/// Weighted score of the largest task (priority 5, importance 5).
pub const SCORE_MAX: f64 = 5.0;

// ── Layout ──────────────────────────────────────────────────────

/// Extra gap kept between two bubbles during initial placement.
pub const OVERLAP_BUFFER: f64 = 10.0;

/// Upper bound on spiral candidates tried per new bubble.
pub const PLACEMENT_ATTEMPTS: usize = 30;

/// Radial growth of the placement spiral per attempt, in canvas units.
pub const SPIRAL_STEP: f64 = 12.0;

/// Golden angle in radians; successive spiral candidates never line up.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

// ── Repulsion ───────────────────────────────────────────────────

/// Simulator period in milliseconds (~20 Hz).
pub const TICK_MS: f64 = 50.0;

/// Largest displacement a single tick may apply to one bubble.
pub const MAX_PUSH_PER_TICK: f64 = 20.0;

/// Fraction of the overlap depth each bubble of a pair is pushed per tick.
pub const PUSH_FACTOR: f64 = 0.5;

/// Repulsion strength a dragged bubble exerts on its neighbours, relative to normal.
pub const DRAG_REPULSION_FACTOR: f64 = 0.5;

/// Overlap at or below this depth counts as touching, not overlapping.
pub const SETTLE_EPSILON: f64 = 1e-6;

/// Centers closer than this are treated as coincident.
pub const COINCIDENT_EPSILON: f64 = 1e-6;

// ── Gestures ────────────────────────────────────────────────────

/// Hold time before a touch on a bubble becomes a drag.
pub const LONG_PRESS_MS: f64 = 500.0;

/// Screen-space movement that turns a pending touch into a pan.
pub const MOVE_THRESHOLD_PX: f64 = 10.0;

// ── Viewport ────────────────────────────────────────────────────

/// Duration of the recenter animation.
pub const RECENTER_MS: f64 = 300.0;

/// Animation frame period while a recenter is running (~60 Hz).
pub const FRAME_MS: f64 = 16.0;

/// Delay before retrying work deferred on an unmeasured viewport.
pub const DEFER_RETRY_MS: f64 = 100.0;

/// Zoom clamp.
pub const MIN_SCALE: f64 = 0.25;
pub const MAX_SCALE: f64 = 4.0;

// ── Labels ──────────────────────────────────────────────────────

/// Maximum number of label lines drawn inside a bubble.
pub const LABEL_MAX_LINES: usize = 2;

/// Approximate glyph advance as a fraction of the font size.
pub const LABEL_GLYPH_WIDTH: f64 = 0.6;

/// Label font size in canvas units.
pub const LABEL_FONT_SIZE: f64 = 12.0;
