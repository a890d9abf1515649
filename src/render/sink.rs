use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use crate::foundation::core::Fps;
use crate::foundation::error::PenResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Tick rate of the render loop.
    pub fps: Fps,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing tick numbers.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> PenResult<()>;
    /// Push the frame rendered on `tick`.
    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PenResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> PenResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames in tick order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> PenResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PenResult<()> {
        self.frames.push((tick, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> PenResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes the latest frame to a PNG every `every` ticks and once more at the end.
///
/// `every == 0` writes only at the end.
#[derive(Debug)]
pub struct PngSnapshotSink {
    path: PathBuf,
    every: u64,
    latest: Option<FrameRGBA>,
}

impl PngSnapshotSink {
    /// Create a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>, every: u64) -> Self {
        Self {
            path: path.into(),
            every,
            latest: None,
        }
    }

    fn write(&self, frame: &FrameRGBA) -> PenResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create snapshot dir '{}'", parent.display()))?;
        }
        // The background is opaque, so premultiplied bytes are already straight RGBA.
        image::save_buffer_with_format(
            &self.path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", self.path.display()))?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

impl FrameSink for PngSnapshotSink {
    fn begin(&mut self, _cfg: SinkConfig) -> PenResult<()> {
        self.latest = None;
        Ok(())
    }

    fn push_frame(&mut self, tick: u64, frame: &FrameRGBA) -> PenResult<()> {
        if self.every > 0 && tick % self.every == 0 {
            self.write(frame)?;
        }
        self.latest = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> PenResult<()> {
        if let Some(frame) = &self.latest {
            self.write(frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;
