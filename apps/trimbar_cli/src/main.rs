//! Trimbar CLI
//!
//! Replays a script of drag gestures, playback notifications and commands
//! through a trim session and prints a JSON snapshot after every step.

mod host;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use trimbar_core::playback::PlaybackControl;
use trimbar_core::session::TrimSession;
use trimbar_core::settings::{preset_default, SessionSettings};
use trimbar_core::types::SessionEvent;
use trimbar_preview::MpvPlayer;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "trimbar")]
#[command(about = "Replay trim-timeline gestures and print state snapshots")]
#[command(version)]
struct Cli {
    /// JSON file holding an array of session events
    script: PathBuf,

    /// Session settings file (.trimbar)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the timeline width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Initial trim range in pixels
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<i32>>,

    /// Media file to open in mpv; playback commands and time updates go through it
    #[arg(long)]
    media: Option<String>,

    /// Delay between script events in milliseconds
    #[arg(long, default_value = "0")]
    interval_ms: u64,

    /// Pretty-print snapshots
    #[arg(long)]
    pretty: bool,
}

fn load_settings(cli: &Cli) -> Result<SessionSettings> {
    let mut settings = match &cli.settings {
        Some(path) => SessionSettings::load_from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => preset_default(),
    };
    if let Some(width) = cli.width {
        settings.width = width;
    }
    Ok(settings)
}

fn load_script(path: &Path) -> Result<Vec<SessionEvent>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&data).context("script must be a JSON array of events")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let script = load_script(&cli.script)?;
    info!(events = script.len(), "script loaded");

    let (tx, rx) = mpsc::channel::<SessionEvent>(64);

    let playback: Box<dyn PlaybackControl> = match &cli.media {
        Some(media) => {
            let mut player = MpvPlayer::new();
            player.start().context("failed to start mpv")?;
            player.load_file(media)?;

            let mut observer = player.observer();
            let weak = tx.downgrade();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(POLL_INTERVAL);
                loop {
                    ticker.tick().await;
                    let Some(tx) = weak.upgrade() else { return };
                    match tokio::task::block_in_place(|| observer.poll()) {
                        Ok(events) => {
                            for event in events {
                                if tx.send(event.into()).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => debug!("mpv poll failed: {}", e),
                    }
                }
            });
            Box::new(player)
        }
        None => Box::new(host::LoggingPlayback),
    };

    let mut session = TrimSession::new(settings, playback, Box::new(host::LoggingDialogs))?;
    if let Some(range) = &cli.range {
        let [start, end] = range[..] else {
            bail!("--range takes exactly two values");
        };
        session.seed_range(start, end)?;
    }

    let interval = Duration::from_millis(cli.interval_ms);
    tokio::spawn(async move {
        for event in script {
            if tx.send(event).await.is_err() {
                break;
            }
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }
    });

    let mut stdout = std::io::stdout().lock();
    let steps = host::run_event_loop(&mut session, rx, &mut stdout, cli.pretty).await?;
    session.teardown();
    info!(steps, "replay finished");
    Ok(())
}
