//! Canvas tunables parsed from defaults, JSON, or environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts;

/// Errors raised while building or validating a [`CanvasConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A tunable that must be strictly positive was zero, negative, or not finite.
    #[error("config field `{field}` must be positive and finite")]
    NonPositive { field: &'static str },

    /// The zoom clamp is inverted.
    #[error("config scale range is inverted: min {min} > max {max}")]
    ScaleRange { min: f64, max: f64 },

    /// An environment override could not be parsed.
    #[error("config parse failed: {var}={value:?}")]
    Parse { var: String, value: String },

    /// A JSON config document was malformed.
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every product-tunable constant of the bubble canvas.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Extra gap kept between bubbles during initial placement.
    pub overlap_buffer: f64,
    /// Spiral candidates tried per new bubble.
    pub placement_attempts: usize,
    /// Radial growth of the placement spiral per attempt.
    pub spiral_step: f64,
    /// Repulsion tick period in milliseconds.
    pub tick_ms: f64,
    /// Cap on per-tick displacement of a single bubble.
    pub max_push_per_tick: f64,
    /// Strength of the repulsion a dragged bubble still exerts on others.
    pub drag_repulsion_factor: f64,
    /// Hold time before a bubble touch becomes a drag.
    pub long_press_ms: f64,
    /// Movement that degrades a pending bubble touch into a pan.
    pub move_threshold_px: f64,
    /// Recenter animation duration.
    pub recenter_ms: f64,
    /// Retry delay for work deferred on an unmeasured viewport.
    pub defer_retry_ms: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            overlap_buffer: consts::OVERLAP_BUFFER,
            placement_attempts: consts::PLACEMENT_ATTEMPTS,
            spiral_step: consts::SPIRAL_STEP,
            tick_ms: consts::TICK_MS,
            max_push_per_tick: consts::MAX_PUSH_PER_TICK,
            drag_repulsion_factor: consts::DRAG_REPULSION_FACTOR,
            long_press_ms: consts::LONG_PRESS_MS,
            move_threshold_px: consts::MOVE_THRESHOLD_PX,
            recenter_ms: consts::RECENTER_MS,
            defer_retry_ms: consts::DEFER_RETRY_MS,
            min_scale: consts::MIN_SCALE,
            max_scale: consts::MAX_SCALE,
        }
    }
}

impl CanvasConfig {
    /// Build config from the defaults, overridden by `BUBBLES_*` environment variables.
    ///
    /// Recognised:
    /// - `BUBBLES_OVERLAP_BUFFER`
    /// - `BUBBLES_PLACEMENT_ATTEMPTS`
    /// - `BUBBLES_SPIRAL_STEP`
    /// - `BUBBLES_TICK_MS`
    /// - `BUBBLES_MAX_PUSH_PER_TICK`
    /// - `BUBBLES_DRAG_REPULSION_FACTOR`
    /// - `BUBBLES_LONG_PRESS_MS`
    /// - `BUBBLES_MOVE_THRESHOLD_PX`
    /// - `BUBBLES_RECENTER_MS`
    /// - `BUBBLES_DEFER_RETRY_MS`
    /// - `BUBBLES_MIN_SCALE` / `BUBBLES_MAX_SCALE`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a variable is set but does not parse,
    /// or any validation error from [`CanvasConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Same as [`CanvasConfig::from_env`] with an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// See [`CanvasConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let mut cfg = Self::default();
        env_override(&lookup, "BUBBLES_OVERLAP_BUFFER", &mut cfg.overlap_buffer)?;
        env_override(&lookup, "BUBBLES_PLACEMENT_ATTEMPTS", &mut cfg.placement_attempts)?;
        env_override(&lookup, "BUBBLES_SPIRAL_STEP", &mut cfg.spiral_step)?;
        env_override(&lookup, "BUBBLES_TICK_MS", &mut cfg.tick_ms)?;
        env_override(&lookup, "BUBBLES_MAX_PUSH_PER_TICK", &mut cfg.max_push_per_tick)?;
        env_override(&lookup, "BUBBLES_DRAG_REPULSION_FACTOR", &mut cfg.drag_repulsion_factor)?;
        env_override(&lookup, "BUBBLES_LONG_PRESS_MS", &mut cfg.long_press_ms)?;
        env_override(&lookup, "BUBBLES_MOVE_THRESHOLD_PX", &mut cfg.move_threshold_px)?;
        env_override(&lookup, "BUBBLES_RECENTER_MS", &mut cfg.recenter_ms)?;
        env_override(&lookup, "BUBBLES_DEFER_RETRY_MS", &mut cfg.defer_retry_ms)?;
        env_override(&lookup, "BUBBLES_MIN_SCALE", &mut cfg.min_scale)?;
        env_override(&lookup, "BUBBLES_MAX_SCALE", &mut cfg.max_scale)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a (possibly partial) JSON object; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or a validation error.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject zero, negative, and non-finite tunables.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("overlap_buffer", self.overlap_buffer),
            ("spiral_step", self.spiral_step),
            ("tick_ms", self.tick_ms),
            ("max_push_per_tick", self.max_push_per_tick),
            ("drag_repulsion_factor", self.drag_repulsion_factor),
            ("long_press_ms", self.long_press_ms),
            ("move_threshold_px", self.move_threshold_px),
            ("recenter_ms", self.recenter_ms),
            ("defer_retry_ms", self.defer_retry_ms),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::NonPositive { field: "placement_attempts" });
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::ScaleRange { min: self.min_scale, max: self.max_scale });
        }
        Ok(())
    }
}

fn env_override<F, T>(lookup: &F, var: &str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: std::str::FromStr,
{
    let Ok(raw) = lookup(var) else {
        return Ok(());
    };
    *slot = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Parse { var: var.to_owned(), value: raw.clone() })?;
    Ok(())
}
