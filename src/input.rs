//! Input model: pointer events and the gesture state machine.
//!
//! A single pointer-down-to-up cycle resolves into exactly one of tap,
//! bubble drag, canvas pan, or nothing. [`GestureState`] tracks the cycle and
//! answers each event with a list of [`Effect`]s for the engine to carry out.
//! It never touches positions, the camera, or timers itself, so the
//! tap/long-press/pan race can be exercised without any of them.
//!
//! ```text
//!  Idle ──down on bubble──▶ PendingBubble ──timer──▶ Dragging ──up──▶ Idle
//!   │                          │ moved > threshold
//!   └──down on canvas──▶ PendingCanvas ◀┘ ──moved > threshold──▶ Panning ──up──▶ Idle
//! ```
//!
//! A long-press only commits if the pointer stays within the movement
//! threshold for the full delay. A down that misses every bubble can only pan.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::Point;
use crate::task::TaskId;

/// Raw pointer events, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// The platform took the gesture away (e.g. a system swipe).
    Cancel,
}

impl PointerEvent {
    /// Screen position carried by the event, if any.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } | Self::Up { x, y } => Some(Point::new(x, y)),
            Self::Cancel => None,
        }
    }
}

/// Work the engine must do in response to a gesture transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the long-press timer.
    ArmLongPress,
    /// Stop the long-press timer.
    CancelLongPress,
    /// A tap completed on this bubble.
    Select(TaskId),
    /// A long-press committed: notify the host and raise the bubble.
    BeginDrag(TaskId),
    /// Move the held bubble by a screen-space delta.
    DragBy { id: TaskId, delta: Point },
    /// Move the camera by a screen-space delta.
    PanBy(Point),
}

/// Per-gesture interaction state. Reset on release, cancel, or a new down.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    /// No pointer is down.
    #[default]
    Idle,
    /// Down on a bubble; waiting for the long-press timer or too much movement.
    PendingBubble {
        id: TaskId,
        /// Screen position at pointer-down.
        start: Point,
    },
    /// Down on empty canvas (or degraded from a bubble); pans but has not yet moved far.
    PendingCanvas {
        start: Point,
        /// Screen position at the previous event, for incremental deltas.
        last: Point,
    },
    /// Long-press committed; moves drag the bubble.
    Dragging { id: TaskId, last: Point },
    /// Moved past the threshold on canvas; moves pan the camera.
    Panning { last: Point },
}

impl GestureState {
    /// The bubble whose position belongs to the user's hand right now.
    #[must_use]
    pub fn held(&self) -> Option<&str> {
        match self {
            Self::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The bubble currently touched, held or not.
    #[must_use]
    pub fn touched(&self) -> Option<&str> {
        match self {
            Self::PendingBubble { id, .. } | Self::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Pointer went down at `screen`; `hit` is the bubble under it, if any.
    pub fn pointer_down(&mut self, screen: Point, hit: Option<TaskId>) -> Vec<Effect> {
        let mut effects = self.reset();
        match hit {
            Some(id) => {
                debug!(%id, "gesture pending on bubble");
                *self = Self::PendingBubble { id, start: screen };
                effects.push(Effect::ArmLongPress);
            }
            None => {
                *self = Self::PendingCanvas { start: screen, last: screen };
            }
        }
        effects
    }

    /// Pointer moved to `screen`.
    pub fn pointer_move(&mut self, screen: Point, threshold: f64) -> Vec<Effect> {
        match std::mem::take(self) {
            Self::Idle => Vec::new(),
            Self::PendingBubble { id, start } => {
                if screen.distance(start) > threshold {
                    debug!(%id, "moved before long-press; treating as pan");
                    *self = Self::Panning { last: screen };
                    vec![Effect::CancelLongPress, Effect::PanBy(screen - start)]
                } else {
                    *self = Self::PendingBubble { id, start };
                    Vec::new()
                }
            }
            Self::PendingCanvas { start, last } => {
                *self = if screen.distance(start) > threshold {
                    Self::Panning { last: screen }
                } else {
                    Self::PendingCanvas { start, last: screen }
                };
                vec![Effect::PanBy(screen - last)]
            }
            Self::Dragging { id, last } => {
                *self = Self::Dragging { id: id.clone(), last: screen };
                vec![Effect::DragBy { id, delta: screen - last }]
            }
            Self::Panning { last } => {
                *self = Self::Panning { last: screen };
                vec![Effect::PanBy(screen - last)]
            }
        }
    }

    /// Pointer released at `screen`.
    pub fn pointer_up(&mut self, screen: Point, threshold: f64) -> Vec<Effect> {
        match std::mem::take(self) {
            Self::PendingBubble { id, start } => {
                let mut effects = vec![Effect::CancelLongPress];
                if screen.distance(start) <= threshold {
                    debug!(%id, "tap");
                    effects.push(Effect::Select(id));
                }
                effects
            }
            Self::PendingCanvas { last, .. } => {
                if screen == last {
                    Vec::new()
                } else {
                    vec![Effect::PanBy(screen - last)]
                }
            }
            Self::Dragging { id, last } => {
                debug!(%id, "drag released");
                if screen == last {
                    Vec::new()
                } else {
                    vec![Effect::DragBy { id, delta: screen - last }]
                }
            }
            Self::Panning { last } => {
                if screen == last {
                    Vec::new()
                } else {
                    vec![Effect::PanBy(screen - last)]
                }
            }
            Self::Idle => Vec::new(),
        }
    }

    /// The platform interrupted the gesture. Same as a release with no tap.
    pub fn cancel(&mut self) -> Vec<Effect> {
        self.reset()
    }

    /// The long-press timer fired.
    ///
    /// Only a still-pending bubble touch commits; anything else means the
    /// timer is stale and is ignored.
    pub fn long_press_elapsed(&mut self) -> Vec<Effect> {
        match std::mem::take(self) {
            Self::PendingBubble { id, start } => {
                debug!(%id, "long-press committed; dragging");
                *self = Self::Dragging { id: id.clone(), last: start };
                vec![Effect::BeginDrag(id)]
            }
            other => {
                *self = other;
                Vec::new()
            }
        }
    }

    fn reset(&mut self) -> Vec<Effect> {
        let was_pending = matches!(self, Self::PendingBubble { .. });
        *self = Self::Idle;
        if was_pending {
            vec![Effect::CancelLongPress]
        } else {
            Vec::new()
        }
    }
}
