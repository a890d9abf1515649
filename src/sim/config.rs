use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{PenError, PenResult};
use crate::motion::profile::MotionProfile;
use crate::receiver::server::DEFAULT_BIND;
use crate::render::cpu::RenderOpts;

/// Everything needed to start a simulator.
///
/// Every field has a default, so a JSON config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas size in pixels.
    pub canvas: Canvas,
    /// WebSocket listen address.
    pub bind: String,
    /// Render loop tick rate.
    pub fps: Fps,
    /// Animation step sizes and pacing.
    pub motion: MotionProfile,
    /// Renderer options.
    pub render: RenderOpts,
    /// PNG used for the pen-up sprite; procedural when unset.
    pub sprite_up: Option<PathBuf>,
    /// PNG used for the pen-down sprite; procedural when unset.
    pub sprite_down: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            bind: DEFAULT_BIND.to_owned(),
            fps: Fps::default(),
            motion: MotionProfile::default(),
            render: RenderOpts::default(),
            sprite_up: None,
            sprite_down: None,
        }
    }
}

impl SimConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_json_path(path: &Path) -> PenResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| PenError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Re-check invariants that deserialization does not enforce.
    pub fn validate(&self) -> PenResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        self.motion.validate()?;
        if self.bind.trim().is_empty() {
            return Err(PenError::config("bind address must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/config.rs"]
mod tests;
