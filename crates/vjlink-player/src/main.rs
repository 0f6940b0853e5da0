//! VJLink Player - mixer-driven video crossfade follower
//!
//! This is the headless entry point. It:
//! 1. Connects to the bridge's `/events` stream in a background thread
//! 2. Applies every decoded event to the sync engine
//! 3. Renders blend changes and periodic deck status lines to the log
//!
//! ## Command line
//!
//! An optional first argument overrides the config file path:
//! `vjlink-player [config.yaml]`

mod config;
mod console;
mod display;

use anyhow::{Context, Result};
use console::ConsolePlayer;
use display::PositionInterpolator;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use vjlink_core::{BlendOutput, ChannelId, Front, SyncEngine};
use vjlink_stream::EventStreamClient;

/// App loop wakeup period; keeps status lines flowing between events
const TICK: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("vjlink-player {} starting up", env!("CARGO_PKG_VERSION"));

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                        VJLink Player                          ║");
    println!("║            Mixer-driven video crossfade follower              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);

    let mut engine = SyncEngine::new(
        config.engine,
        ConsolePlayer::new(0),
        ConsolePlayer::new(1),
    );
    // Show the rest-position blend before any event arrives
    render_blend(&engine.current_blend());

    let client = EventStreamClient::start(config.stream.clone())
        .context("Failed to start the event stream reader")?;
    let events = client.receiver();

    let status_interval = match config.display.status_interval_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let mut interpolators = [PositionInterpolator::new(), PositionInterpolator::new()];
    let mut last_status = Instant::now();

    loop {
        match events.recv_timeout(TICK) {
            Ok(event) => {
                let group = event.group;
                if let Some(blend) = engine.apply(event) {
                    render_blend(&blend);
                }
                // Deck events refresh that deck's position extrapolation
                if let Some(deck) = group.deck_index() {
                    interpolators[deck].sync(&engine.snapshot(group));
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => {}
            Err(flume::RecvTimeoutError::Disconnected) => {
                log::warn!("Player: event stream reader is gone, shutting down");
                break;
            }
        }

        if let Some(interval) = status_interval {
            if last_status.elapsed() >= interval {
                render_status(&engine, &interpolators);
                last_status = Instant::now();
            }
        }
    }

    client.stop();
    log::info!("vjlink-player stopped");
    Ok(())
}

/// Log one blend result as the output surface would apply it
fn render_blend(blend: &BlendOutput) {
    let front = match blend.front {
        Front::Deck(deck) => format!("deck {}", deck + 1),
        Front::Tie => "tie".to_string(),
    };
    log::info!(
        "Blend: ch1 opacity {:.3} z {} | ch2 opacity {:.3} z {} | front {}",
        blend.opacity[0],
        blend.z_index[0],
        blend.opacity[1],
        blend.z_index[1],
        front
    );
}

/// Log one status line per deck
fn render_status(engine: &SyncEngine<ConsolePlayer>, interpolators: &[PositionInterpolator; 2]) {
    for (deck, group) in ChannelId::PLAYABLE.iter().enumerate() {
        let snapshot = engine.snapshot(*group);
        let line = display::deck_status(
            deck,
            engine.deck(deck).state(),
            &snapshot,
            interpolators[deck].position_secs(),
            engine.deck(deck).player().is_muted(),
        );
        log::info!("{}", line);
    }
}
