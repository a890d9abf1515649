use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::client::run_self_test;
use crate::foundation::core::Fps;
use crate::foundation::error::PenResult;
use crate::foundation::shutdown::Shutdown;
use crate::render::cpu::CpuRenderer;
use crate::render::sink::{FrameSink, SinkConfig};
use crate::render::ticker::FrameTicker;
use crate::scene::store::SceneStore;
use crate::sim::context::SimHandle;

/// Local user actions, from keys (window) or stdin lines (headless).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalInput {
    /// Clear both line layers.
    Clear,
    /// Stop rendering and shut the simulator down.
    Quit,
    /// Send the self-test square to our own endpoint.
    SelfTest,
}

impl LocalInput {
    /// Parse a stdin line: `c`/`clear`, `q`/`quit`, `t`/`test`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "c" | "clear" => Some(Self::Clear),
            "q" | "quit" => Some(Self::Quit),
            "t" | "test" => Some(Self::SelfTest),
            _ => None,
        }
    }
}

/// Applies [`LocalInput`] against a running simulator.
#[derive(Clone, Debug)]
pub struct LocalControl {
    scene: Arc<SceneStore>,
    shutdown: Shutdown,
    url: String,
    fps: Fps,
    runtime: Handle,
}

impl LocalControl {
    /// Control bound to `sim`; the self-test is spawned on `runtime`.
    pub fn new(sim: &SimHandle, runtime: Handle) -> Self {
        let ctx = sim.context();
        Self {
            scene: ctx.scene.clone(),
            shutdown: ctx.shutdown.clone(),
            url: sim.url(),
            fps: ctx.config.fps,
            runtime,
        }
    }

    /// Apply `input`. Returns `false` once the loop should stop.
    pub fn apply(&self, input: LocalInput) -> bool {
        match input {
            LocalInput::Clear => {
                info!("clearing canvas");
                self.scene.clear_layers();
                true
            }
            LocalInput::Quit => {
                info!("quit requested");
                self.shutdown.trigger();
                false
            }
            LocalInput::SelfTest => {
                info!(url = %self.url, "running self-test square");
                let url = self.url.clone();
                self.runtime.spawn(async move {
                    if let Err(e) = run_self_test(&url).await {
                        warn!(error = %e, "self-test failed");
                    }
                });
                true
            }
        }
    }

    /// Tick rate of the render loop.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Scene the loop renders.
    pub fn scene(&self) -> &Arc<SceneStore> {
        &self.scene
    }

    /// Whether the simulator has been asked to stop.
    pub fn stopped(&self) -> bool {
        self.shutdown.is_triggered()
    }
}

/// Forward parsed stdin lines to `tx` from a background thread. Unknown lines are ignored.
pub fn spawn_stdin_reader(tx: Sender<LocalInput>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match LocalInput::parse(&line) {
                Some(input) => {
                    if tx.send(input).is_err() {
                        break;
                    }
                }
                None => debug!(line, "ignoring unknown input"),
            }
        }
    })
}

/// Fixed-tick render loop without a window.
///
/// Each tick drains pending input, renders the current scene and hands the frame to `sink`. Stops
/// on `Quit`, when the simulator shuts down, or after `max_ticks` frames when set.
pub fn run_headless(
    control: &LocalControl,
    renderer: &mut CpuRenderer,
    sink: &mut dyn FrameSink,
    input: &Receiver<LocalInput>,
    max_ticks: Option<u64>,
) -> PenResult<u64> {
    let canvas = renderer.canvas();
    let fps = control.fps;
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
    })?;

    let mut ticker = FrameTicker::new(fps);
    let mut frames = 0u64;
    'ticks: loop {
        if max_ticks.is_some_and(|max| frames >= max) || control.stopped() {
            break;
        }
        let tick = ticker.wait();

        loop {
            match input.try_recv() {
                Ok(cmd) => {
                    if !control.apply(cmd) {
                        break 'ticks;
                    }
                }
                // A closed input source leaves the loop running; quit arrives another way.
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        let frame = renderer.render(&control.scene.snapshot())?;
        sink.push_frame(tick, &frame)?;
        frames += 1;
    }

    sink.end()?;
    info!(frames, "render loop stopped");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/render/run.rs"]
mod tests;
