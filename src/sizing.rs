//! Pure mappings from task fields to bubble geometry and color.
//!
//! Every consumer (layout, collision, hit-testing, rendering) must size a bubble
//! through [`radius_of`], otherwise taps stop landing where bubbles are drawn.

#[cfg(test)]
#[path = "sizing_test.rs"]
mod sizing_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_RADIUS, IMPORTANCE_WEIGHT, MAX_EXTRA_RADIUS, PRIORITY_WEIGHT, SCORE_MAX, SCORE_MIN};
use crate::task::TaskStatus;

/// Bubble radius for a task's `(priority, importance)`.
///
/// Inputs are clamped to `1..=5`. The weighted score `0.6 * priority + 0.4 * importance`
/// is normalised over its range, so the result runs from 30 at `(1, 1)` to 80 at `(5, 5)`
/// and is non-decreasing in each argument.
#[must_use]
pub fn radius_of(priority: u8, importance: u8) -> f64 {
    let p = f64::from(priority.clamp(1, 5));
    let i = f64::from(importance.clamp(1, 5));
    let score = p * PRIORITY_WEIGHT + i * IMPORTANCE_WEIGHT;
    let t = (score - SCORE_MIN) / (SCORE_MAX - SCORE_MIN);
    BASE_RADIUS + t * MAX_EXTRA_RADIUS
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Mix toward white (`amount > 0`) or black (`amount < 0`); `amount` in `[-1, 1]`.
    #[must_use]
    pub fn shade(self, amount: f64) -> Self {
        let amount = amount.clamp(-1.0, 1.0);
        let target = if amount >= 0.0 { 255.0 } else { 0.0 };
        let mix = |c: u8| -> u8 {
            let c = f64::from(c);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let out = (c + (target - c) * amount.abs()).round().clamp(0.0, 255.0) as u8;
            out
        };
        Self(mix(self.0), mix(self.1), mix(self.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Fill, radial gradient and label colors of one bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub fill: Rgb,
    /// Inner stop of the radial gradient.
    pub highlight: Rgb,
    /// Outer stop of the radial gradient.
    pub shade: Rgb,
    pub label: Rgb,
}

impl ColorSpec {
    fn from_fill(fill: Rgb) -> Self {
        Self {
            fill,
            highlight: fill.shade(0.25),
            shade: fill.shade(-0.2),
            label: Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Light or dark application palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Bubble colors for a status under the given theme.
#[must_use]
pub fn color_of(status: TaskStatus, theme: Theme) -> ColorSpec {
    let fill = match (status, theme) {
        (TaskStatus::Todo, _) => Rgb(0xFF, 0x6A, 0x88),
        (TaskStatus::InProgress, _) => Rgb(0xFF, 0xBF, 0x3A),
        (TaskStatus::Done, _) => Rgb(0x28, 0xC7, 0x6F),
        (TaskStatus::Other, Theme::Light) => Rgb(0xAD, 0xB5, 0xBD),
        (TaskStatus::Other, Theme::Dark) => Rgb(0x6C, 0x75, 0x7D),
    };
    ColorSpec::from_fill(fill)
}
