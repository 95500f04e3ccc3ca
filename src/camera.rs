#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point (or displacement) in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when the point is read as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Pan/scale transform of the bubble layer.
///
/// `pan_x` / `pan_y` are in screen pixels; `scale` is a factor (1.0 = none).
/// A canvas point `c` is drawn at `c * scale + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, scale: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.scale,
            y: (screen.y - self.pan_y) / self.scale,
        }
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.pan_x,
            y: canvas.y * self.scale + self.pan_y,
        }
    }

    /// Convert a screen-space displacement to a canvas-space displacement.
    ///
    /// Pan does not apply to deltas, only scale.
    #[must_use]
    pub fn screen_delta_to_canvas(&self, delta: Point) -> Point {
        Point::new(delta.x / self.scale, delta.y / self.scale)
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan_x += delta.x;
        self.pan_y += delta.y;
    }
}

/// Width and height of the viewport, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False until the host has reported a real, non-degenerate size.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }
}

/// A bubble's footprint: center and radius, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// How far two circles (plus `buffer`) interpenetrate; positive means overlap.
    #[must_use]
    pub fn overlap(&self, other: &Self, buffer: f64) -> f64 {
        (self.radius + other.radius + buffer) - self.center.distance(other.center)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius
    }
}
