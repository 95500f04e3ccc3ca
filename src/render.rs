//! Rendering: projects the engine's scene onto the platform's drawing layer.
//!
//! Painting a circle is the platform's job. This module defines the primitive
//! it must supply ([`Surface`]) and the read-only [`BubbleSprite`] view it is
//! fed, bottom layer first. It never mutates engine state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::camera::{Camera, Circle, Point, Size};
use crate::consts::{LABEL_FONT_SIZE, LABEL_GLYPH_WIDTH, LABEL_MAX_LINES};
use crate::sizing::ColorSpec;
use crate::task::{Task, TaskId};

/// Share of the diameter a label line may span.
const LABEL_WIDTH_RATIO: f64 = 0.8;

const ELLIPSIS: char = '\u{2026}';

/// Everything needed to paint one bubble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSprite {
    pub id: TaskId,
    /// Wrapped title, at most two lines.
    pub label: Vec<String>,
    pub center: Point,
    pub radius: f64,
    pub colors: ColorSpec,
    /// Held by an active drag.
    pub held: bool,
}

impl BubbleSprite {
    #[must_use]
    pub fn new(task: &Task, id: &str, circle: Circle, colors: ColorSpec, held: bool) -> Self {
        Self {
            id: id.to_owned(),
            label: fit_label(&task.title, circle.radius),
            center: circle.center,
            radius: circle.radius,
            colors,
            held,
        }
    }
}

/// The platform's drawing layer.
pub trait Surface {
    type Error;

    /// Start a frame: clear and apply the camera transform.
    ///
    /// # Errors
    ///
    /// Whatever the platform reports.
    fn begin(&mut self, size: Size, camera: Camera) -> Result<(), Self::Error>;

    /// Draw a labeled circle at layer `z` (0 is the bottom).
    ///
    /// # Errors
    ///
    /// Whatever the platform reports.
    fn draw_bubble(&mut self, sprite: &BubbleSprite, z: usize) -> Result<(), Self::Error>;
}

/// Draw a full frame, bottom bubble first.
///
/// # Errors
///
/// Stops at and returns the first surface error.
pub fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    size: Size,
    camera: Camera,
    sprites: &[BubbleSprite],
) -> Result<(), S::Error> {
    surface.begin(size, camera)?;
    for (z, sprite) in sprites.iter().enumerate() {
        surface.draw_bubble(sprite, z)?;
    }
    Ok(())
}

/// Characters that fit on one label line inside a bubble of `radius`.
#[must_use]
pub fn label_columns(radius: f64) -> usize {
    let cols = (radius * 2.0 * LABEL_WIDTH_RATIO / (LABEL_FONT_SIZE * LABEL_GLYPH_WIDTH)).floor();
    if cols.is_finite() && cols >= 1.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cols = cols as usize;
        cols
    } else {
        1
    }
}

/// Word-wrap `title` to the bubble, keeping at most two lines.
///
/// Words longer than a line are split. Overflow is cut with an ellipsis.
#[must_use]
pub fn fit_label(title: &str, radius: f64) -> Vec<String> {
    let width = label_columns(radius);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in title.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            if current_len == 0 {
                current.extend(chunk);
                current_len = chunk.len();
            } else if current_len + 1 + chunk.len() <= width {
                current.push(' ');
                current.extend(chunk);
                current_len += 1 + chunk.len();
            } else {
                lines.push(std::mem::take(&mut current));
                current.extend(chunk);
                current_len = chunk.len();
            }
        }
    }
    if current_len > 0 {
        lines.push(current);
    }

    if lines.len() > LABEL_MAX_LINES {
        lines.truncate(LABEL_MAX_LINES);
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(last, width);
        }
    }
    lines
}

fn ellipsize(line: &str, width: usize) -> String {
    let keep = width.saturating_sub(1);
    let mut out: String = line.chars().take(keep).collect();
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push(ELLIPSIS);
    out
}
