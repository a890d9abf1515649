use std::time::Duration;

use tokio::sync::mpsc;

use crate::command::model::Command;
use crate::foundation::error::{PenError, PenResult};
use crate::foundation::shutdown::Shutdown;

/// Create a connected sender/receiver pair.
///
/// The queue is unbounded: producers never wait and nothing is dropped while the receiver lives.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

/// Producer half. Cheap to clone; any number of producers may enqueue concurrently.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    /// Append a command. Never blocks.
    ///
    /// Fails only when the receiver has been dropped (the animator has shut down).
    pub fn enqueue(&self, command: Command) -> PenResult<()> {
        self.tx
            .send(command)
            .map_err(|_| PenError::channel("command receiver dropped"))
    }

    /// Return `true` when the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half. Commands come out in the order they were enqueued.
#[derive(Debug)]
pub struct CommandReceiver {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl CommandReceiver {
    /// Wait for the next command.
    ///
    /// Returns `None` only when every sender has been dropped and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<Command> {
        self.rx.recv().await
    }

    /// Wait for the next command or for `shutdown`, whichever comes first.
    ///
    /// Once the signal has fired this returns `None` even if commands are still queued.
    pub async fn dequeue_until(&mut self, shutdown: &Shutdown) -> Option<Command> {
        if shutdown.is_triggered() {
            return None;
        }
        tokio::select! {
            biased;
            _ = shutdown.wait() => None,
            cmd = self.rx.recv() => cmd,
        }
    }

    /// Wait at most `timeout` for the next command.
    pub async fn dequeue_timeout(&mut self, timeout: Duration) -> Option<Command> {
        tokio::time::timeout(timeout, self.rx.recv())
            .await
            .ok()
            .flatten()
    }

    /// Take the next command if one is already queued.
    pub fn try_dequeue(&mut self) -> Option<Command> {
        self.rx.try_recv().ok()
    }

    /// Number of commands waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Return `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/command/channel.rs"]
mod tests;
