use std::sync::Arc;

use crate::foundation::core::{Point, Rgba8};

/// Stroke width of commanded-path previews.
pub const COMMANDED_WIDTH: f64 = 1.0;
/// Stroke width of the robot's own path.
pub const ROBOT_WIDTH: f64 = 3.0;

/// Which animator state produced a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Waiting for the next command.
    #[default]
    Idle,
    /// Pen-up move back to a command's start point.
    Repositioning,
    /// Turning toward the move heading.
    Rotating,
    /// Driving along the move.
    Translating,
}

/// Immutable view of the robot published by the animator.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RobotPose {
    /// Sprite centre in canvas space.
    pub position: Point,
    /// Heading in radians, canvas space (clockwise on screen).
    pub orientation: f64,
    /// Whether movement currently leaves a trace.
    pub pen_down: bool,
    /// Animator state at publication time.
    pub phase: Phase,
    /// Number of commands fully animated so far.
    pub completed: u64,
}

impl RobotPose {
    /// Pen-up robot at `position`, facing +x.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            orientation: 0.0,
            pen_down: false,
            phase: Phase::Idle,
            completed: 0,
        }
    }
}

/// A straight stroke on one of the line layers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Start point (canvas space).
    pub from: Point,
    /// End point (canvas space).
    pub to: Point,
    /// Stroke color.
    pub color: Rgba8,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Segment {
    /// Thin light-green preview of a received command.
    pub fn commanded(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            color: Rgba8::LIGHT_GREEN,
            width: COMMANDED_WIDTH,
        }
    }

    /// Thick black trace left by the robot.
    pub fn robot(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            color: Rgba8::BLACK,
            width: ROBOT_WIDTH,
        }
    }
}

/// Identifies one of the two accumulation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Paths as commanded by the peer (always drawn).
    Commanded,
    /// Paths actually driven with the pen down.
    Robot,
}

/// Everything the render loop needs for one frame.
///
/// Layer lists are shared `Arc`s: taking a snapshot never copies segments, and writers never
/// mutate a list a reader still holds.
#[derive(Clone, Debug)]
pub struct SceneSnapshot {
    /// Latest published robot pose.
    pub robot: RobotPose,
    /// Commanded-path layer.
    pub commanded: Arc<Vec<Segment>>,
    /// Robot-path layer.
    pub robot_path: Arc<Vec<Segment>>,
    /// Bumped on every layer change; lets renderers skip re-stroking unchanged layers.
    pub layers_revision: u64,
}
