//! Rasterization and the fixed-tick render loop.
//!
//! Frames are produced by the CPU renderer ([`cpu::CpuRenderer`]) and handed either to a
//! [`sink::FrameSink`] (headless) or to a window surface (`window` feature).

/// Rendered frame type.
pub mod backend;
/// `vello_cpu` renderer for scene snapshots.
pub mod cpu;
/// Headless render loop and local input.
pub mod run;
/// Frame consumers.
pub mod sink;
/// Robot sprites.
pub mod sprite;
/// Fixed-rate pacing.
pub mod ticker;
/// Interactive window front end.
#[cfg(feature = "window")]
pub mod window;
