use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use jiff::Zoned;
use lissajous::config::{self, Settings};
use lissajous::curve::MAX_SAMPLES;
use lissajous::render::{self, Viewport};
use lissajous::ticker::{self, StopReason, TickProfile, Ticker};
use lissajous::{AnimationEngine, Command, Controller, Mode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lissajous")]
#[command(about = "Draw Lissajous curves as a static trace or an animated tail")]
#[command(version = "0.1.0")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the static multi-cycle trace to a PNG
    Render {
        #[command(flatten)]
        curve: CurveArgs,

        #[command(flatten)]
        canvas: CanvasArgs,

        /// Number of full cycles to draw (1-10)
        #[arg(long)]
        cycles: Option<u32>,

        /// Output PNG path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Run the animation on a timer and save the resulting frames
    Animate {
        #[command(flatten)]
        curve: CurveArgs,

        #[command(flatten)]
        canvas: CanvasArgs,

        /// Number of ticks to run
        #[arg(long, default_value = "1500")]
        ticks: u64,

        /// Tail length in points
        #[arg(long)]
        tail: Option<usize>,

        /// Use the slower single-trail timer
        #[arg(long, conflicts_with = "interval_ms")]
        simple: bool,

        /// Tick interval in milliseconds (overrides the settings file)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Also save every Nth frame (0 = only the last one)
        #[arg(long, default_value = "0")]
        every: u64,

        /// Directory for the frames
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Advance the engine without a timer and print the frame as JSON
    Frame {
        #[command(flatten)]
        curve: CurveArgs,

        /// Number of ticks to apply
        #[arg(long, default_value = "0")]
        ticks: u64,

        /// Print the static trace instead of the animated tail
        #[arg(long)]
        frozen: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show the settings file location and effective settings
    Config,
}

/// Curve parameter overrides, applied through the control layer
#[derive(Args, Debug, Default)]
struct CurveArgs {
    /// x angular frequency (1.0-30.0, tenths)
    #[arg(long, short = 'x')]
    x_frequency: Option<f64>,

    /// y angular frequency (1.0-30.0, tenths)
    #[arg(long, short = 'y')]
    y_frequency: Option<f64>,

    /// Phase shift in steps of π/12 (0-24)
    #[arg(long, short = 'p')]
    phase_detent: Option<u8>,
}

impl CurveArgs {
    fn commands(&self) -> impl Iterator<Item = Command> {
        [
            self.x_frequency.map(Command::SetXFrequency),
            self.y_frequency.map(Command::SetYFrequency),
            self.phase_detent.map(Command::SetPhaseDetent),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Args, Debug, Default)]
struct CanvasArgs {
    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,
}

impl CanvasArgs {
    fn viewport(&self, settings: &Settings) -> Viewport {
        let mut viewport = settings.viewport();
        if let Some(width) = self.width {
            viewport.width = width;
        }
        if let Some(height) = self.height {
            viewport.height = height;
        }
        viewport
    }
}

pub fn get_renders_dir() -> Result<PathBuf> {
    let data_dir = directories::BaseDirs::new()
        .ok_or_else(|| anyhow!("Could not find data directory"))?
        .data_local_dir()
        .join("lissajous")
        .join("renders");

    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

fn timestamp() -> String {
    Zoned::now().strftime("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Build a controller in frozen mode, then apply the command-line overrides
fn build_controller(settings: &Settings, curve: &CurveArgs) -> Controller {
    let mut engine = AnimationEngine::new(settings.engine_config(), settings.parameters());
    engine.set_mode(Mode::Frozen);

    let mut controller = Controller::new(engine);
    for command in curve.commands() {
        controller.apply(command);
    }
    controller
}

fn render_static(
    settings: &Settings,
    curve: &CurveArgs,
    canvas: &CanvasArgs,
    cycles: Option<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut controller = build_controller(settings, curve);
    if let Some(cycles) = cycles {
        controller.apply(Command::SetCycles(cycles));
    }

    let engine = controller.engine();
    let frame = engine.current_frame();
    let params = engine.parameters();
    tracing::info!(
        x = params.x_frequency,
        y = params.y_frequency,
        phase = %controller.phase_label(),
        points = frame.len(),
        "Rendering static trace"
    );

    let pixmap = render::render_frame(&frame, &canvas.viewport(settings), settings.canvas.background)?;

    let output = match output {
        Some(path) => path,
        None => get_renders_dir()?.join(format!("{}.png", timestamp())),
    };
    render::save_png(&pixmap, &output).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}

struct AnimateOptions {
    ticks: u64,
    tail: Option<usize>,
    simple: bool,
    interval_ms: Option<u64>,
    every: u64,
    output_dir: Option<PathBuf>,
}

async fn animate(settings: &Settings, curve: &CurveArgs, canvas: &CanvasArgs, options: AnimateOptions) -> Result<()> {
    let mut controller = build_controller(settings, curve);
    controller.apply(Command::ToggleAnimation);
    if let Some(tail) = options.tail {
        controller.engine_mut().set_tail_length(tail.clamp(1, MAX_SAMPLES));
    }

    let viewport = canvas.viewport(settings);
    let background = settings.canvas.background;
    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None => get_renders_dir()?.join(timestamp()),
    };

    let profile = if options.simple {
        TickProfile::Simple
    } else {
        TickProfile::Animated
    };
    let ticker = match options.interval_ms {
        Some(ms) => Ticker::new(Duration::from_millis(ms)),
        None => Ticker::from_settings(&settings.timer, profile),
    }
    .with_limit(options.ticks);

    tracing::info!(
        ticks = options.ticks,
        interval_ms = ticker.interval().as_millis() as u64,
        tail = controller.engine().config().tail_length,
        dir = %output_dir.display(),
        "Starting animation"
    );

    let pb = ProgressBar::new(options.ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .progress_chars("#>-"),
    );

    let every = options.every;
    let summary = ticker
        .run(controller.engine_mut(), |tick, engine| -> Result<()> {
            pb.set_position(tick);
            if every > 0 && tick % every == 0 {
                save_frame(engine, &viewport, background, &output_dir.join(format!("frame_{:06}.png", tick)))?;
            }
            Ok(())
        })
        .await?;
    pb.finish_and_clear();

    // Pause on the last frame and keep it
    let engine = controller.engine_mut();
    engine.stop();
    let last = output_dir.join("last.png");
    save_frame(engine, &viewport, background, &last)?;

    match summary.reason {
        StopReason::Interrupted => eprintln!("Interrupted after {} ticks", summary.ticks),
        StopReason::Stopped | StopReason::Limit => {
            eprintln!("Animation finished after {} ticks ({:?})", summary.ticks, engine.state())
        }
    }
    println!("{}", last.display());
    Ok(())
}

fn save_frame(engine: &AnimationEngine, viewport: &Viewport, background: lissajous::colors::Rgb, path: &Path) -> Result<()> {
    let pixmap = render::render_frame(&engine.current_frame(), viewport, background)?;
    render::save_png(&pixmap, path).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_frame(settings: &Settings, curve: &CurveArgs, ticks: u64, frozen: bool, pretty: bool) -> Result<()> {
    let mut controller = build_controller(settings, curve);
    if !frozen {
        controller.apply(Command::ToggleAnimation);
    }

    let applied = ticker::advance(controller.engine_mut(), ticks);
    tracing::debug!(ticks, applied, state = ?controller.engine().state(), "Frame ready");

    let frame = controller.engine().current_frame();
    let json = if pretty {
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string(&frame)?
    };
    println!("{}", json);
    Ok(())
}

fn show_config(settings: &Settings, explicit: Option<&Path>) -> Result<()> {
    let path = explicit.map(Path::to_path_buf).or_else(config::config_path);
    match path {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not found, using defaults)", path.display()),
        None => println!("# No config directory available, using defaults"),
    }
    print!("{}", settings.to_toml().context("Failed to serialize settings")?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Render {
            curve,
            canvas,
            cycles,
            output,
        } => render_static(&settings, &curve, &canvas, cycles, output),

        Commands::Animate {
            curve,
            canvas,
            ticks,
            tail,
            simple,
            interval_ms,
            every,
            output_dir,
        } => {
            let options = AnimateOptions {
                ticks,
                tail,
                simple,
                interval_ms,
                every,
                output_dir,
            };
            animate(&settings, &curve, &canvas, options).await
        }

        Commands::Frame {
            curve,
            ticks,
            frozen,
            pretty,
        } => print_frame(&settings, &curve, ticks, frozen, pretty),

        Commands::Config => show_config(&settings, cli.config.as_deref()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lissajous=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
