use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::channel::CommandSender;
use crate::command::model::Command;
use crate::receiver::message::PenMessage;
use crate::scene::model::Layer;
use crate::scene::store::SceneStore;

/// Why a message had no effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The frame did not decode as a pen message.
    Malformed(String),
    /// The `type` discriminator is not one we act on.
    UnknownType,
    /// The animator is gone; the preview was drawn but the move was dropped.
    ChannelClosed,
}

/// Effect of handling one message.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A move was previewed and queued for the animator.
    Enqueued(Command),
    /// Both line layers were cleared.
    Cleared,
    /// Nothing happened.
    Ignored(IgnoreReason),
}

/// Applies pen messages: coordinate conversion, commanded-path preview, enqueue or clear.
///
/// Shared by every connection; handling is synchronous and never fails.
#[derive(Clone, Debug)]
pub struct MessageHandler {
    scene: Arc<SceneStore>,
    commands: CommandSender,
}

impl MessageHandler {
    /// Create a handler that draws into `scene` and queues onto `commands`.
    pub fn new(scene: Arc<SceneStore>, commands: CommandSender) -> Self {
        Self { scene, commands }
    }

    /// Decode and apply one text frame. Malformed input is logged and ignored.
    pub fn handle_text(&self, text: &str) -> Outcome {
        match PenMessage::decode(text) {
            Ok(msg) => self.apply(msg),
            Err(e) => {
                warn!(error = %e, "ignoring malformed message");
                Outcome::Ignored(IgnoreReason::Malformed(e.to_string()))
            }
        }
    }

    /// Apply an already-decoded message.
    pub fn apply(&self, msg: PenMessage) -> Outcome {
        match msg {
            PenMessage::GoToXy { x, y, old_x, old_y } => {
                let canvas = self.scene.canvas();
                let target = canvas.stage_to_canvas(x, y);
                let previous = canvas.stage_to_canvas(old_x, old_y);
                self.scene.push_segment(Layer::Commanded, previous, target);

                let command = Command { target, previous };
                debug!(?previous, ?target, "goToXY");
                match self.commands.enqueue(command) {
                    Ok(()) => Outcome::Enqueued(command),
                    Err(e) => {
                        warn!(error = %e, "dropping goToXY");
                        Outcome::Ignored(IgnoreReason::ChannelClosed)
                    }
                }
            }
            PenMessage::Clear => {
                debug!("clear");
                self.scene.clear_layers();
                Outcome::Cleared
            }
            PenMessage::Unknown => {
                debug!("ignoring message with unknown type");
                Outcome::Ignored(IgnoreReason::UnknownType)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receiver/handler.rs"]
mod tests;
