//! Viewport controller: viewport size, camera, and the recenter animation.
//!
//! All coordinate conversions go through here so hit-testing, dragging, and
//! recentering share one affine mapping. Until the host reports a real size,
//! conversions return `None` and recenter requests are refused so callers can
//! retry later instead of working against degenerate bounds.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use tracing::debug;

use crate::camera::{Camera, Circle, Point, Size};

/// Axis-aligned box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Smallest box containing every circle's edge; `None` for no circles.
    #[must_use]
    pub fn of_circles<I>(circles: I) -> Option<Self>
    where
        I: IntoIterator<Item = Circle>,
    {
        circles.into_iter().fold(None, |acc, c| {
            let lo = Point::new(c.center.x - c.radius, c.center.y - c.radius);
            let hi = Point::new(c.center.x + c.radius, c.center.y + c.radius);
            Some(match acc {
                None => Self { min: lo, max: hi },
                Some(b) => Self {
                    min: Point::new(b.min.x.min(lo.x), b.min.y.min(lo.y)),
                    max: Point::new(b.max.x.max(hi.x), b.max.y.max(hi.y)),
                },
            })
        })
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }
}

/// A pan animation from one offset to another.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PanAnimation {
    from: Point,
    to: Point,
    start_ms: f64,
    duration_ms: f64,
}

impl PanAnimation {
    fn sample(&self, now_ms: f64) -> (Point, bool) {
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 {
            return (self.to, true);
        }
        let eased = ease_out_cubic(t);
        (self.from + (self.to - self.from) * eased, false)
    }
}

/// `1 - (1 - t)^3`: fast start, soft landing.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Owns the camera and the measured viewport size.
#[derive(Debug, Default)]
pub struct ViewportController {
    size: Size,
    camera: Camera,
    animation: Option<PanAnimation>,
}

impl ViewportController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.size.is_measured()
    }

    /// Record the viewport size. Returns true if it changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        if self.size == size {
            return false;
        }
        debug!(width = size.width, height = size.height, "viewport resized");
        self.size = size;
        true
    }

    /// Screen point to canvas point; `None` while unmeasured.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Option<Point> {
        self.is_measured().then(|| self.camera.screen_to_canvas(screen))
    }

    /// Canvas point to screen point; `None` while unmeasured.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Option<Point> {
        self.is_measured().then(|| self.camera.canvas_to_screen(canvas))
    }

    /// Screen delta to canvas delta (divides by scale).
    #[must_use]
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        self.camera.screen_delta_to_canvas(delta)
    }

    /// Pan by a screen-space delta. The user's hand stops any running recenter.
    pub fn pan_by(&mut self, delta: Point) {
        self.animation = None;
        self.camera.pan_by(delta);
    }

    /// Set the scale, clamped to `[min, max]`, keeping `anchor` (screen) fixed.
    pub fn zoom_about(&mut self, anchor: Point, scale: f64, min: f64, max: f64) {
        if !scale.is_finite() {
            return;
        }
        let scale = scale.clamp(min, max);
        let pinned = self.camera.screen_to_canvas(anchor);
        self.camera.scale = scale;
        self.camera.pan_x = anchor.x - pinned.x * scale;
        self.camera.pan_y = anchor.y - pinned.y * scale;
        self.animation = None;
    }

    /// Pan offset that puts `bounds` in the middle of the viewport at the current scale.
    #[must_use]
    pub fn centering_pan(&self, bounds: Bounds) -> Option<Point> {
        if !self.is_measured() {
            return None;
        }
        let target = self.size.center() - bounds.center() * self.camera.scale;
        Some(target)
    }

    /// Start animating toward the pan that centers `bounds`.
    ///
    /// Returns false (and does nothing) while unmeasured.
    pub fn begin_recenter(&mut self, bounds: Bounds, now_ms: f64, duration_ms: f64) -> bool {
        let Some(to) = self.centering_pan(bounds) else {
            return false;
        };
        debug!(x = to.x, y = to.y, "recenter");
        self.animation = Some(PanAnimation { from: self.camera.pan(), to, start_ms: now_ms, duration_ms });
        true
    }

    /// Move the running animation's target to the pan that centers `bounds`.
    ///
    /// Bubbles keep relaxing while the camera travels, so the engine calls
    /// this every frame. No-op when idle or unmeasured.
    pub fn retarget(&mut self, bounds: Bounds) {
        let Some(to) = self.centering_pan(bounds) else {
            return;
        };
        if let Some(anim) = self.animation.as_mut() {
            anim.to = to;
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the recenter animation to `now_ms`. Returns true while still running.
    pub fn step_animation(&mut self, now_ms: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let (pan, done) = anim.sample(now_ms);
        self.camera.pan_x = pan.x;
        self.camera.pan_y = pan.y;
        if done {
            self.animation = None;
        }
        !done
    }
}
