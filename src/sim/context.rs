use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::ws_url;
use crate::command::channel::{CommandReceiver, CommandSender, command_channel};
use crate::foundation::error::PenResult;
use crate::foundation::shutdown::Shutdown;
use crate::motion::animator::Animator;
use crate::receiver::handler::MessageHandler;
use crate::receiver::server::PenServer;
use crate::scene::store::{PoseWriter, SceneStore};
use crate::sim::config::SimConfig;

/// State shared by every simulator component, built once per process.
#[derive(Clone, Debug)]
pub struct SimContext {
    /// Validated configuration, with environment overrides applied.
    pub config: SimConfig,
    /// Robot pose and line layers.
    pub scene: Arc<SceneStore>,
    /// Producer side of the command channel.
    pub commands: CommandSender,
    /// Stop signal for every task.
    pub shutdown: Shutdown,
}

/// Halves of the context that have a single owner.
#[derive(Debug)]
pub struct SimParts {
    /// Pose publisher, handed to the animator.
    pub pose_writer: PoseWriter,
    /// Consumer side of the command channel, handed to the animator.
    pub command_rx: CommandReceiver,
}

impl SimContext {
    /// Validate `config` and build the scene, command channel and shutdown signal.
    pub fn new(config: SimConfig) -> PenResult<(Self, SimParts)> {
        config.validate()?;
        let motion = config.motion.clone().with_env_overrides();
        motion.validate()?;
        let config = SimConfig { motion, ..config };

        let (scene, pose_writer) = SceneStore::new(config.canvas);
        let (commands, command_rx) = command_channel();
        Ok((
            Self {
                config,
                scene,
                commands,
                shutdown: Shutdown::new(),
            },
            SimParts {
                pose_writer,
                command_rx,
            },
        ))
    }

    /// Message handler bound to this context.
    pub fn handler(&self) -> MessageHandler {
        MessageHandler::new(self.scene.clone(), self.commands.clone())
    }
}

/// Entry point for starting the receiver and animator tasks.
pub struct Simulator;

impl Simulator {
    /// Bind the WebSocket endpoint and spawn the receiver and animator on the current runtime.
    pub async fn start(config: SimConfig) -> PenResult<SimHandle> {
        let (ctx, parts) = SimContext::new(config)?;
        let server = PenServer::bind(ctx.config.bind.as_str(), ctx.handler()).await?;
        let local_addr = server.local_addr()?;

        let animator = Animator::new(
            ctx.config.motion.clone(),
            ctx.scene.clone(),
            parts.pose_writer,
        );
        let animator_task = tokio::spawn(animator.run(parts.command_rx, ctx.shutdown.clone()));

        let shutdown = ctx.shutdown.clone();
        let server_task = tokio::spawn(async move {
            if let Err(e) = server.run(shutdown).await {
                warn!(error = %e, "pen server failed");
            }
        });

        info!(%local_addr, "simulator started");
        Ok(SimHandle {
            ctx,
            local_addr,
            tasks: vec![server_task, animator_task],
        })
    }
}

/// A running simulator.
#[derive(Debug)]
pub struct SimHandle {
    ctx: SimContext,
    local_addr: SocketAddr,
    tasks: Vec<JoinHandle<()>>,
}

impl SimHandle {
    /// Shared context of the running simulator.
    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Address the WebSocket endpoint is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `ws://` URL of the endpoint, as used by the self-test.
    pub fn url(&self) -> String {
        ws_url(self.local_addr)
    }

    /// Fire the shutdown signal and wait for the receiver and animator to stop.
    ///
    /// A command mid-animation is abandoned at its next step.
    pub async fn shutdown(self) {
        self.ctx.shutdown.trigger();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "simulator task panicked");
            }
        }
        info!("simulator stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/context.rs"]
mod tests;
