//! penbot is a pen-drawing robot simulator.
//!
//! Drawing commands arrive as JSON over a local WebSocket, are queued, and are played back by a
//! kinematic animator that turns then drives a robot sprite across a canvas, leaving a trail while
//! its pen is down. A fixed-tick render loop rasterizes the scene with `vello_cpu`.
//!
//! - Build a [`SimConfig`] and call [`Simulator::start`] inside a tokio runtime
//! - Drive a render loop with [`render::run::run_headless`] (or the `window` feature)
//! - Send commands with [`client::send_message`] or any WebSocket client
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// One-shot WebSocket client and the self-test square.
pub mod client;
/// Movement commands and the command channel.
pub mod command;
/// Kinematic animation of the robot.
pub mod motion;
/// WebSocket endpoint and message handling.
pub mod receiver;
/// Rasterization, frame sinks and the render loop.
pub mod render;
/// Robot pose and line layers.
pub mod scene;
/// Configuration and task lifecycle.
pub mod sim;

pub use crate::command::channel::{CommandReceiver, CommandSender, command_channel};
pub use crate::command::model::Command;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, Point, Rect, Rgba8, Vec2, wrap_angle,
};
pub use crate::foundation::error::{PenError, PenResult};
pub use crate::foundation::shutdown::Shutdown;
pub use crate::motion::animator::Animator;
pub use crate::motion::profile::MotionProfile;
pub use crate::receiver::message::PenMessage;
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{CpuRenderer, RenderOpts};
pub use crate::render::sink::{FrameSink, InMemorySink, PngSnapshotSink, SinkConfig};
pub use crate::scene::model::{Layer, Phase, RobotPose, SceneSnapshot, Segment};
pub use crate::scene::store::SceneStore;
pub use crate::sim::config::SimConfig;
pub use crate::sim::context::{SimContext, SimHandle, Simulator};
