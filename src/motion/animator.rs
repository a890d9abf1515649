use std::sync::Arc;

use tracing::{debug, info};

use crate::command::channel::CommandReceiver;
use crate::command::model::Command;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::shutdown::Shutdown;
use crate::motion::profile::MotionProfile;
use crate::scene::model::{Layer, Phase, RobotPose};
use crate::scene::store::{PoseWriter, SceneStore};

/// Consumes commands one at a time and animates the robot through them.
///
/// Per command the robot optionally drives (pen up) to the command's start point, turns toward the
/// move heading, lowers the pen and drives to the target. Every intermediate pose is published to
/// the [`SceneStore`]; the final pose of each move is assigned exactly, so rounding in the stepping
/// never accumulates across commands.
pub struct Animator {
    profile: MotionProfile,
    scene: Arc<SceneStore>,
    writer: PoseWriter,
    pose: RobotPose,
    shutdown: Shutdown,
}

impl Animator {
    /// Create an animator that starts from the currently published pose.
    pub fn new(profile: MotionProfile, scene: Arc<SceneStore>, writer: PoseWriter) -> Self {
        let pose = writer.current();
        Self {
            profile,
            scene,
            writer,
            pose,
            shutdown: Shutdown::new(),
        }
    }

    /// Authoritative robot pose.
    pub fn pose(&self) -> RobotPose {
        self.pose
    }

    /// Animate commands until the channel closes or `shutdown` fires.
    ///
    /// Waiting on an empty channel is the only idle suspension point. A command in progress is
    /// abandoned at its next step once the signal fires.
    pub async fn run(mut self, mut commands: CommandReceiver, shutdown: Shutdown) {
        info!("animator started");
        self.shutdown = shutdown.clone();
        while let Some(command) = commands.dequeue_until(&shutdown).await {
            if !self.process(command).await {
                break;
            }
        }
        info!(completed = self.pose.completed, "animator stopped");
    }

    /// Animate a single command to completion.
    ///
    /// Returns `false` when shutdown interrupted the move; the pose is then left mid-way and the
    /// command does not count as completed.
    #[tracing::instrument(level = "debug", skip(self), fields(n = self.pose.completed))]
    pub async fn process(&mut self, command: Command) -> bool {
        if self.animate(command).await.is_some() {
            return true;
        }
        debug!(pose = ?self.pose.position, "move interrupted by shutdown");
        false
    }

    async fn animate(&mut self, command: Command) -> Option<()> {
        let start = command.previous;
        if self.pose.position.distance(start) > self.profile.reposition_threshold_px {
            debug!(from = ?self.pose.position, to = ?start, "repositioning with pen up");
            self.pose.pen_down = false;
            let from = self.pose.position;
            let heading = heading(from, start);
            self.rotate_to(heading, Phase::Repositioning).await?;
            self.translate(from, start, Phase::Repositioning).await?;
        }

        self.rotate_to(command.heading(), Phase::Rotating).await?;
        self.pose.pen_down = true;
        self.translate(command.previous, command.target, Phase::Translating)
            .await?;

        if self.pose.pen_down && command.length() > 0.0 {
            self.scene
                .push_segment(Layer::Robot, command.previous, command.target);
        }

        self.pose.completed += 1;
        self.publish(Phase::Idle);
        debug!(pose = ?self.pose.position, "command done");
        Some(())
    }

    /// Turn toward `target` radians, one fixed increment per step.
    ///
    /// The last step assigns `target` exactly; a zero delta takes no steps.
    async fn rotate_to(&mut self, target: f64, phase: Phase) -> Option<()> {
        let delta = self.profile.rotation_delta(self.pose.orientation, target);
        let steps = self.profile.rotation_steps(delta);
        let increment = self.profile.rotate_step_rad().copysign(delta);
        if steps > 0 {
            debug!(
                steps,
                from = self.pose.orientation,
                to = target,
                "rotating"
            );
        }

        for i in 0..steps {
            if i + 1 == steps {
                self.pose.orientation = target;
            } else {
                self.pose.orientation += increment;
            }
            self.publish(phase);
            self.pause().await?;
        }
        self.pose.orientation = target;
        Some(())
    }

    /// Drive along `from -> to` with fixed-size steps, then snap onto `to`.
    ///
    /// Sub-pixel progress is accumulated and applied in whole pixels (truncated toward zero); the
    /// remainder carries over to the next step.
    async fn translate(&mut self, from: Point, to: Point, phase: Phase) -> Option<()> {
        let delta = to - from;
        let distance = delta.hypot();
        let steps = self.profile.translation_steps(distance);
        let heading = delta.y.atan2(delta.x);
        let step = self.profile.translate_step_px;
        let per_step = Vec2::new(step * heading.cos(), step * heading.sin());
        if steps > 0 {
            debug!(steps, distance, "translating");
        }

        let mut acc = Vec2::ZERO;
        for _ in 0..steps {
            acc += per_step;
            if acc.x.abs() >= 1.0 || acc.y.abs() >= 1.0 {
                let whole = Vec2::new(acc.x.trunc(), acc.y.trunc());
                self.pose.position += whole;
                acc -= whole;
            }
            self.publish(phase);
            self.pause().await?;
        }

        self.pose.position = to;
        self.publish(phase);
        Some(())
    }

    fn publish(&mut self, phase: Phase) {
        self.pose.phase = phase;
        self.writer.publish(self.pose);
    }

    /// Wait one step. `None` once shutdown has fired.
    async fn pause(&self) -> Option<()> {
        let d = self.profile.step_duration();
        if d.is_zero() {
            tokio::task::yield_now().await;
            return (!self.shutdown.is_triggered()).then_some(());
        }
        tokio::select! {
            biased;
            _ = self.shutdown.wait() => None,
            _ = tokio::time::sleep(d) => Some(()),
        }
    }
}

fn heading(from: Point, to: Point) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
#[path = "../../tests/unit/motion/animator.rs"]
mod tests;
