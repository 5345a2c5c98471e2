use anyhow::Context;
use breathorb::orb::{FrameClock, TracingObserver};
use breathorb::{BreathingEngine, CountdownTimer, EngineConfig, OrbFrame, OrbSnapshot};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run the breathing orb engine headlessly and print the frames it produces.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to a YAML engine config.
    #[arg(short, long, env = "BREATHORB_CONFIG")]
    config: Option<PathBuf>,

    /// How many seconds of breathing to run.
    #[arg(short, long, default_value_t = 16.0)]
    seconds: f64,

    /// Frames per second delivered to the engine.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Print every Nth frame.
    #[arg(long, default_value_t = 30)]
    every: u32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Pace frames against the wall clock instead of simulating them.
    #[arg(long)]
    realtime: bool,

    /// Run a countdown of this many seconds alongside the orb.
    #[arg(long)]
    timer: Option<u32>,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    frame: &'a OrbFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    timer: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;
    let phase_duration_ms = config.phase_duration_ms;
    let mut engine = BreathingEngine::new(config).context("invalid engine config")?.with_observer(TracingObserver);
    let mut timer = cli.timer.map(|seconds| {
        let mut timer = CountdownTimer::new(seconds);
        timer.start();
        timer
    });

    let frame_ms = 1000.0 / f64::from(cli.fps.max(1));
    let total_frames = (cli.seconds.max(0.0) * 1000.0 / frame_ms).round() as u64;
    let every = u64::from(cli.every.max(1));
    let mut clock = FrameClock::new();
    let mut last_ms = 0u64;
    let mut stdout = io::stdout().lock();

    for frame in 0..=total_frames {
        let target = frame as f64 * frame_ms;
        let now = if cli.realtime {
            if let Some(wait) = clock.until(target) {
                thread::sleep(wait);
            }
            clock.now_ms()
        } else {
            target
        };

        let snapshot = engine.tick(now);
        if let Some(timer) = timer.as_mut() {
            let now_ms = snapshot.timestamp_ms as u64;
            timer.advance(now_ms.saturating_sub(last_ms));
            last_ms = now_ms;
        }
        if frame % every != 0 {
            continue;
        }

        let timer_display = timer.as_ref().map(CountdownTimer::display);
        match cli.format {
            OutputFormat::Text => write_text(&mut stdout, &snapshot, timer_display.as_deref())?,
            OutputFormat::Json => {
                let frame = OrbFrame::from_snapshot(&snapshot, phase_duration_ms);
                let line = serde_json::to_string(&JsonLine { frame: &frame, timer: timer_display })?;
                writeln!(stdout, "{line}")?;
            }
        }
    }

    info!(frames = total_frames + 1, "run finished");
    Ok(())
}

fn write_text(out: &mut impl Write, snapshot: &OrbSnapshot, timer: Option<&str>) -> io::Result<()> {
    write!(
        out,
        "{:>9.1}ms  {:<6} {:>5.1}%  scale {:.3}  glow {:.3}  {:<14} {} ({:>3.0}%)",
        snapshot.timestamp_ms,
        snapshot.phase.label(),
        snapshot.breath_progress * 100.0,
        snapshot.scale,
        snapshot.glow_intensity,
        snapshot.display_colors.label,
        snapshot.display_colors.primary,
        snapshot.color_blend * 100.0,
    )?;
    if let Some(timer) = timer {
        write!(out, "  {timer}")?;
    }
    writeln!(out)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    if let Some(path) = path {
        return EngineConfig::load(path).with_context(|| format!("loading config from {}", path.display()));
    }
    let Some(dirs) = ProjectDirs::from("", "", "breathorb") else {
        return Ok(EngineConfig::default());
    };
    let path = dirs.config_dir().join("config.yaml");
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    debug!(path = %path.display(), "using config from config directory");
    Ok(EngineConfig::load(&path)?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}
