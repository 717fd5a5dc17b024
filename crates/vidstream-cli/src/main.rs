//! vidstream - terminal demo player
//!
//! Plays a single locator through the playback controller:
//! - play / pause / stop / seek typed on stdin
//! - seek bar with elapsed and total time
//! - keep-awake hint held while playing
//!
//! The built-in clock engine stands in for a platform media stack, so any
//! locator "plays" as a timeline of `--duration-secs`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vidstream_core::{ClockEngine, HintFlag, PlaybackController, Resolution, UiSurface};

mod commands;
mod config;
mod output;

use commands::{Command, HELP};
use output::TerminalSurface;

const DEFAULT_LOCATOR: &str = "http://www.pocketjourney.com/downloads/pj/video/famous.3gp";

/// vidstream - single-source streaming demo player
#[derive(Parser)]
#[command(name = "vidstream")]
#[command(version)]
#[command(about = "Play one video locator with play/pause/stop controls and a seek bar", long_about = None)]
struct Cli {
    /// Media locator (absolute URI or absolute file path)
    #[arg(default_value = DEFAULT_LOCATOR)]
    locator: String,

    /// JSON player configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Length of the simulated timeline in seconds
    #[arg(long, default_value = "180")]
    duration_secs: u64,

    /// Simulated prepare (buffering) time in milliseconds
    #[arg(long, default_value = "0")]
    prepare_delay_ms: u64,

    /// Video size reported after prepare
    #[arg(long, default_value = "176x144", value_parser = config::parse_resolution)]
    video_size: Resolution,

    /// Display size used to fit the video surface
    #[arg(long, default_value = "1280x720", value_parser = config::parse_resolution)]
    display: Resolution,

    /// Start playing immediately
    #[arg(short, long)]
    autoplay: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref())?;
    info!(version = vidstream_core::VERSION, ?config, "vidstream starting");

    let engine = Arc::new(
        ClockEngine::new(Duration::from_secs(cli.duration_secs))
            .with_prepare_delay(Duration::from_millis(cli.prepare_delay_ms))
            .with_video_size(cli.video_size),
    );
    let (mut controller, mut notifications) =
        PlaybackController::new(engine, HintFlag::new("display"), config)?;
    controller
        .set_source(&cli.locator)
        .with_context(|| format!("Cannot play '{}'", cli.locator))?;

    let mut surface = TerminalSurface::new(cli.display);
    surface.status(&format!("source {}", cli.locator));
    surface.status(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = if cli.autoplay { Some(Command::Play) } else { None };

    loop {
        if let Some(command) = pending.take() {
            if command == Command::Quit {
                break;
            }

            if command == Command::Play {
                // prepare can take a while; keep Ctrl-C responsive
                tokio::select! {
                    result = controller.play() => {
                        if let Err(e) = result {
                            surface.on_error(&e);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        warn!("Interrupted while preparing");
                        break;
                    }
                }
            } else if let Err(e) = commands::execute(&mut controller, command, &mut surface).await {
                surface.on_error(&e);
            }
            continue;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(command) => pending = Some(command),
                    Err(e) => surface.warn(&e.to_string()),
                }
            }
            Some(notification) = notifications.recv() => {
                controller.dispatch(notification, &mut surface).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    controller.release().await?;
    surface.finish();
    Ok(())
}
