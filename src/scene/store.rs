use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::foundation::core::{Canvas, Point};
use crate::scene::model::{Layer, RobotPose, SceneSnapshot, Segment};

#[derive(Debug, Default)]
struct Layers {
    commanded: Arc<Vec<Segment>>,
    robot: Arc<Vec<Segment>>,
    revision: u64,
}

/// Shared scene: robot pose snapshots plus the two append-only line layers.
///
/// The pose has exactly one writer, the [`PoseWriter`] returned by [`SceneStore::new`]. Layers are
/// written by the receiver (previews, clear) and the animator (robot path) through copy-on-write
/// lists, so readers always see a complete list.
#[derive(Debug)]
pub struct SceneStore {
    canvas: Canvas,
    pose_rx: watch::Receiver<RobotPose>,
    layers: RwLock<Layers>,
}

/// Exclusive publisher of robot poses. Owned by the animator.
#[derive(Debug)]
pub struct PoseWriter {
    tx: watch::Sender<RobotPose>,
}

impl PoseWriter {
    /// Replace the published pose.
    pub fn publish(&self, pose: RobotPose) {
        self.tx.send_replace(pose);
    }

    /// Currently published pose.
    pub fn current(&self) -> RobotPose {
        *self.tx.borrow()
    }
}

impl SceneStore {
    /// Create a store with the robot parked at the canvas centre.
    pub fn new(canvas: Canvas) -> (Arc<Self>, PoseWriter) {
        let (tx, pose_rx) = watch::channel(RobotPose::at(canvas.center()));
        let store = Arc::new(Self {
            canvas,
            pose_rx,
            layers: RwLock::new(Layers::default()),
        });
        (store, PoseWriter { tx })
    }

    /// Canvas the scene is laid out on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Latest published robot pose.
    pub fn pose(&self) -> RobotPose {
        *self.pose_rx.borrow()
    }

    /// Receiver that observes every pose the animator publishes.
    pub fn subscribe(&self) -> watch::Receiver<RobotPose> {
        self.pose_rx.clone()
    }

    /// Append a segment to `layer`.
    pub fn push_segment(&self, layer: Layer, from: Point, to: Point) {
        let segment = match layer {
            Layer::Commanded => Segment::commanded(from, to),
            Layer::Robot => Segment::robot(from, to),
        };
        let mut layers = self.layers.write();
        match layer {
            Layer::Commanded => Arc::make_mut(&mut layers.commanded).push(segment),
            Layer::Robot => Arc::make_mut(&mut layers.robot).push(segment),
        }
        layers.revision += 1;
    }

    /// Remove every segment from both layers.
    ///
    /// Clearing already-empty layers is a no-op and does not bump the revision.
    pub fn clear_layers(&self) {
        let mut layers = self.layers.write();
        if layers.commanded.is_empty() && layers.robot.is_empty() {
            return;
        }
        layers.commanded = Arc::new(Vec::new());
        layers.robot = Arc::new(Vec::new());
        layers.revision += 1;
    }

    /// Segments currently on `layer`.
    pub fn segments(&self, layer: Layer) -> Arc<Vec<Segment>> {
        let layers = self.layers.read();
        match layer {
            Layer::Commanded => Arc::clone(&layers.commanded),
            Layer::Robot => Arc::clone(&layers.robot),
        }
    }

    /// Consistent view of pose and layers for one frame.
    pub fn snapshot(&self) -> SceneSnapshot {
        let robot = self.pose();
        let layers = self.layers.read();
        SceneSnapshot {
            robot,
            commanded: Arc::clone(&layers.commanded),
            robot_path: Arc::clone(&layers.robot),
            layers_revision: layers.revision,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
