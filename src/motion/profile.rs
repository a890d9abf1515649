use std::time::Duration;

use crate::foundation::core::wrap_angle;
use crate::foundation::error::{PenError, PenResult};

/// Environment variable that overrides [`MotionProfile::step_ms`].
pub const STEP_MS_ENV: &str = "PENBOT_STEP_MS";

/// Discrete motion parameters of the animator.
///
/// Every rotation or translation step advances the robot by a fixed increment and then waits
/// `step_ms` of simulated time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    /// Simulated time per step, in milliseconds. Zero runs as fast as the runtime allows.
    pub step_ms: u64,
    /// Distance covered per translation step, in pixels.
    pub translate_step_px: f64,
    /// Angle covered per rotation step, in degrees.
    pub rotate_step_deg: f64,
    /// Distance beyond which the robot first drives (pen up) to a command's start point.
    pub reposition_threshold_px: f64,
    /// Turn through the shorter arc instead of the raw heading difference.
    pub shortest_arc: bool,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            step_ms: 100,
            translate_step_px: 20.0,
            rotate_step_deg: 2.0,
            reposition_threshold_px: 1.0,
            shortest_arc: false,
        }
    }
}

impl MotionProfile {
    /// Check that every increment is positive and finite.
    pub fn validate(&self) -> PenResult<()> {
        if !(self.translate_step_px.is_finite() && self.translate_step_px > 0.0) {
            return Err(PenError::config("translate_step_px must be finite and > 0"));
        }
        if !(self.rotate_step_deg.is_finite() && self.rotate_step_deg > 0.0) {
            return Err(PenError::config("rotate_step_deg must be finite and > 0"));
        }
        if !(self.reposition_threshold_px.is_finite() && self.reposition_threshold_px >= 0.0) {
            return Err(PenError::config(
                "reposition_threshold_px must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Apply `PENBOT_STEP_MS` when it holds a valid integer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = std::env::var(STEP_MS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.step_ms = ms;
        }
        self
    }

    /// Simulated time per step.
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    /// Angle covered per rotation step, in radians.
    pub fn rotate_step_rad(&self) -> f64 {
        self.rotate_step_deg.to_radians()
    }

    /// Signed angle to turn through to get from `from` to `to`.
    ///
    /// Headings are `atan2` results, so the raw difference stays within (-2π, 2π).
    pub fn rotation_delta(&self, from: f64, to: f64) -> f64 {
        let delta = to - from;
        if self.shortest_arc {
            wrap_angle(delta)
        } else {
            delta
        }
    }

    /// Number of rotation steps needed to turn through `delta_rad`.
    pub fn rotation_steps(&self, delta_rad: f64) -> u64 {
        if delta_rad == 0.0 {
            return 0;
        }
        (delta_rad.abs() / self.rotate_step_rad()).ceil() as u64
    }

    /// Number of whole translation steps that fit in `distance_px`.
    pub fn translation_steps(&self, distance_px: f64) -> u64 {
        if distance_px <= 0.0 {
            return 0;
        }
        (distance_px / self.translate_step_px).floor() as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/profile.rs"]
mod tests;
