use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};

use penbot::client::{run_self_test, send_message};
use penbot::render::run::{LocalControl, run_headless, spawn_stdin_reader};
use penbot::render::sprite::SpriteSet;
use penbot::{CpuRenderer, FrameSink, PenMessage, PngSnapshotSink, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "penbot", version, about = "Pen-drawing robot simulator")]
struct Cli {
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the simulator: WebSocket endpoint, animator and render loop.
    Run(RunArgs),
    /// Send one message to a running simulator.
    Send {
        #[command(subcommand)]
        msg: SendCommand,
    },
    /// Send the self-test square to a running simulator.
    SelfTest(UrlArg),
}

#[derive(Args, Debug)]
struct UrlArg {
    /// Simulator endpoint.
    #[arg(long, default_value = "ws://127.0.0.1:8765")]
    url: String,
}

#[derive(Subcommand, Debug)]
enum SendCommand {
    /// Move from (old-x, old-y) to (x, y), in centred Y-up coordinates.
    Goto {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        old_x: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        old_y: f64,
        #[command(flatten)]
        url: UrlArg,
    },
    /// Clear both line layers.
    Clear(UrlArg),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// WebSocket listen address.
    #[arg(long)]
    bind: Option<String>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Render ticks per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Simulated milliseconds per animation step.
    #[arg(long)]
    step_ms: Option<u64>,

    /// Write the latest frame to this PNG (headless mode).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Also write the snapshot every N frames (0 = only at exit).
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// PNG sprite for pen up.
    #[arg(long)]
    sprite_up: Option<PathBuf>,

    /// PNG sprite for pen down.
    #[arg(long)]
    sprite_down: Option<PathBuf>,

    /// Open an interactive window (requires the `window` feature).
    #[arg(long)]
    window: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    match cli.cmd {
        Command::Run(args) => cmd_run(args, &runtime),
        Command::Send { msg } => runtime.block_on(cmd_send(msg)),
        Command::SelfTest(arg) => runtime
            .block_on(run_self_test(&arg.url))
            .with_context(|| format!("self-test against '{}'", arg.url)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &RunArgs) -> anyhow::Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => SimConfig::from_json_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(bind) = &args.bind {
        cfg.bind = bind.clone();
    }
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    if let Some(fps) = args.fps {
        cfg.fps = penbot::Fps::new(fps, 1)?;
    }
    if let Some(ms) = args.step_ms {
        cfg.motion.step_ms = ms;
    }
    if args.sprite_up.is_some() {
        cfg.sprite_up = args.sprite_up.clone();
    }
    if args.sprite_down.is_some() {
        cfg.sprite_down = args.sprite_down.clone();
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn cmd_run(args: RunArgs, runtime: &tokio::runtime::Runtime) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    let sprites = SpriteSet::load(cfg.sprite_up.as_deref(), cfg.sprite_down.as_deref())
        .context("load sprites")?;
    let mut renderer =
        CpuRenderer::new(cfg.canvas, cfg.render, sprites).context("create renderer")?;

    let sim = runtime
        .block_on(penbot::Simulator::start(cfg))
        .context("start simulator")?;
    info!(url = %sim.url(), "ready; stdin: c = clear, q = quit, t = self-test");

    let control = LocalControl::new(&sim, runtime.handle().clone());
    let (tx, rx) = mpsc::channel();
    let _stdin = spawn_stdin_reader(tx);

    let rendered = if args.window {
        run_window(&control, &mut renderer, &rx)
    } else {
        let mut sink: Box<dyn FrameSink> = match &args.snapshot {
            Some(path) => Box::new(PngSnapshotSink::new(path, args.snapshot_every)),
            None => Box::new(CountingSink::default()),
        };
        run_headless(&control, &mut renderer, sink.as_mut(), &rx, None)
            .map(|_| ())
            .context("render loop")
    };

    runtime.block_on(sim.shutdown());
    rendered
}

#[cfg(feature = "window")]
fn run_window(
    control: &LocalControl,
    renderer: &mut CpuRenderer,
    rx: &mpsc::Receiver<penbot::render::run::LocalInput>,
) -> anyhow::Result<()> {
    penbot::render::window::run_window(control, renderer, rx).context("window")
}

#[cfg(not(feature = "window"))]
fn run_window(
    _control: &LocalControl,
    _renderer: &mut CpuRenderer,
    _rx: &mpsc::Receiver<penbot::render::run::LocalInput>,
) -> anyhow::Result<()> {
    anyhow::bail!("built without the `window` feature; rebuild with `--features window`")
}

async fn cmd_send(msg: SendCommand) -> anyhow::Result<()> {
    let (msg, url) = match msg {
        SendCommand::Goto {
            x,
            y,
            old_x,
            old_y,
            url,
        } => (PenMessage::go_to((old_x, old_y), (x, y)), url.url),
        SendCommand::Clear(url) => (PenMessage::Clear, url.url),
    };
    send_message(&url, &msg)
        .await
        .with_context(|| format!("send to '{url}'"))?;
    eprintln!("sent {}", describe(&msg));
    Ok(())
}

fn describe(msg: &PenMessage) -> String {
    msg.encode().unwrap_or_else(|_| format!("{msg:?}"))
}

/// Headless sink used when no snapshot path is given.
#[derive(Default)]
struct CountingSink {
    frames: u64,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, _cfg: penbot::SinkConfig) -> penbot::PenResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _tick: u64, _frame: &penbot::FrameRGBA) -> penbot::PenResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> penbot::PenResult<()> {
        info!(frames = self.frames, "headless run finished");
        Ok(())
    }
}
