//! Clench Gesture CLI
//!
//! Replays hand-landmark recordings through the clench classifier.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clench_gesture::{
    config::Config,
    core::{GesturePipeline, GestureState},
    input::JumpTrigger,
    service::GestureService,
    source::{parse_recording, HandFrame, ReplaySource},
    stats::create_shared_stats_with_persistence,
    VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Game loop polling interval (60 Hz).
const GAME_TICK: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "clench-gesture")]
#[command(version = VERSION)]
#[command(about = "Debounced fist-clench detection from hand landmarks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recording through the gesture service and report jumps
    Replay {
        /// JSON Lines recording of hand detections
        file: PathBuf,

        /// Playback rate in frames per second
        #[arg(long)]
        fps: Option<u32>,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Print per-frame fold scores and the smoothed clench state
    Score {
        /// JSON Lines recording of hand detections
        file: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Show configuration
    Config,
}

/// Overrides for the smoothing configuration.
#[derive(Args)]
struct Tuning {
    /// Number of frames averaged
    #[arg(long)]
    window: Option<usize>,

    /// Mean fold score that counts as a clench
    #[arg(long)]
    threshold: Option<f32>,

    /// Lower threshold for releasing a clench (enables hysteresis)
    #[arg(long)]
    release: Option<f32>,
}

impl Tuning {
    fn apply(&self, config: &mut Config) {
        if let Some(window) = self.window {
            config.smoothing.window_capacity = window;
        }
        if let Some(threshold) = self.threshold {
            config.smoothing.clench_threshold = threshold;
        }
        if self.release.is_some() {
            config.smoothing.release_threshold = self.release;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { file, fps, tuning } => cmd_replay(&file, fps, &tuning).await,
        Commands::Score { file, tuning } => cmd_score(&file, &tuning),
        Commands::Config => {
            cmd_config();
            Ok(())
        }
    }
}

/// Load the stored configuration with CLI overrides applied.
fn load_config(tuning: &Tuning) -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();
    tuning.apply(&mut config);
    config.validate()?;
    Ok(config)
}

async fn cmd_replay(file: &Path, fps: Option<u32>, tuning: &Tuning) -> anyhow::Result<()> {
    let mut config = load_config(tuning)?;
    if let Some(fps) = fps {
        config.source = config.source.with_fps(fps);
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    let source = ReplaySource::from_path(file)
        .with_context(|| format!("Could not open recording {file:?}"))?;

    println!("Clench Gesture v{VERSION}");
    println!();
    println!("Replaying {} frames from {:?}", source.len(), file);
    println!(
        "  Frame interval: {}ms",
        config.source.frame_interval.as_millis()
    );
    println!(
        "  Window: {} frames, threshold {:.2}{}",
        config.smoothing.window_capacity,
        config.smoothing.clench_threshold,
        config
            .smoothing
            .release_threshold
            .map(|r| format!(", release {r:.2}"))
            .unwrap_or_default()
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let stats = create_shared_stats_with_persistence(config.stats_path());
    let service = GestureService::with_stats(source, &config, Arc::clone(&stats));

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(Arc::clone(&running))?;

    service.initialize().await;
    if !service.is_ready() {
        eprintln!("Hand tracking unavailable; the game would fall back to keyboard input.");
        return Ok(());
    }

    // Poll like a game loop would, once per rendered frame
    let handle = service.handle();
    let mut trigger = JumpTrigger::new();
    let mut ticker = tokio::time::interval(GAME_TICK);
    let started = Instant::now();
    let mut jumps = 0u32;

    let mut poll_once = |trigger: &mut JumpTrigger| {
        if let Some(cause) = trigger.poll(handle.clench_state(), false, Instant::now()) {
            jumps += 1;
            println!(
                "[{:>7.2}s] Jump ({:?}), confidence {:.2}",
                started.elapsed().as_secs_f32(),
                cause,
                handle.clench_confidence()
            );
        }
    };

    while running.load(Ordering::SeqCst) && service.is_streaming() {
        ticker.tick().await;
        poll_once(&mut trigger);
    }
    // The last frames may have landed after the previous tick
    poll_once(&mut trigger);

    println!();
    println!("Stopping replay...");
    service.shutdown();

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save gesture stats: {e}");
    }

    println!("Jumps triggered: {jumps}");
    println!();
    println!("{}", stats.summary());
    Ok(())
}

fn cmd_score(file: &Path, tuning: &Tuning) -> anyhow::Result<()> {
    let config = load_config(tuning)?;

    let reader = std::fs::File::open(file)
        .map(std::io::BufReader::new)
        .with_context(|| format!("Could not open recording {file:?}"))?;
    let recording = parse_recording(reader)?;

    let mut pipeline = GesturePipeline::new(
        &config.estimator,
        &config.smoothing,
        Arc::new(GestureState::new()),
    );

    println!("{:>6}  {:>6}  {:>10}  clenched", "frame", "score", "confidence");
    for (index, frame) in recording.frames.iter().enumerate() {
        let outcome = pipeline.on_frame(frame);
        let score = match (outcome.score, frame) {
            (Some(score), _) => format!("{score:.2}"),
            (None, HandFrame::Rejected) => "bad".to_string(),
            (None, _) => "-".to_string(),
        };
        println!(
            "{:>6}  {:>6}  {:>10.3}  {}",
            index,
            score,
            outcome.reading.confidence,
            if outcome.reading.is_clenched { "yes" } else { "no" }
        );
    }

    println!();
    println!(
        "{} frames, {} malformed",
        recording.frames.len(),
        recording.rejected
    );
    Ok(())
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")
}
