//! Console status rendering
//!
//! Position updates arrive only as coarse `playposition` events, so between
//! events the display extrapolates against the wall clock, scaled by the
//! deck's derived speed.

use std::time::Instant;
use vjlink_core::{DeckSnapshot, TransportState};

/// Wall-clock extrapolation of one deck's playback position
pub struct PositionInterpolator {
    snapshot: DeckSnapshot,
    synced_at: Instant,
}

impl PositionInterpolator {
    pub fn new() -> Self {
        Self {
            snapshot: DeckSnapshot::default(),
            synced_at: Instant::now(),
        }
    }

    /// Re-anchor on a fresh snapshot; position restarts from its playposition
    pub fn sync(&mut self, snapshot: &DeckSnapshot) {
        self.snapshot = snapshot.clone();
        self.synced_at = Instant::now();
    }

    /// Current extrapolated position in seconds
    pub fn position_secs(&self) -> f64 {
        self.position_at(self.synced_at.elapsed().as_secs_f64())
    }

    /// Position `elapsed` seconds after the last sync
    ///
    /// Paused decks and decks without a known duration do not advance.
    fn position_at(&self, elapsed: f64) -> f64 {
        let base = self.snapshot.target_seconds();
        if !self.snapshot.play || self.snapshot.duration <= 0.0 {
            return base;
        }
        let advanced = base + elapsed * self.snapshot.derived_speed;
        advanced.clamp(0.0, self.snapshot.duration)
    }
}

/// Format seconds as mm:ss.millis
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds * 1000.0) % 1000.0).floor() as u64;
    format!("{:02}:{:02}.{:03}", minutes, secs, millis)
}

/// Format a derived speed factor as a signed tempo deviation percentage
pub fn format_rate_percent(derived_speed: f64) -> String {
    format!("{:+.2}%", (derived_speed - 1.0) * 100.0)
}

/// One deck's status line
pub fn deck_status(
    deck: usize,
    state: TransportState,
    snapshot: &DeckSnapshot,
    position_secs: f64,
    muted: bool,
) -> String {
    let video = snapshot.video_id.as_deref().unwrap_or("-");
    let mute_tag = if muted { " [muted]" } else { "" };
    format!(
        "Deck {}: {:?} {} / {}  bpm {:.1}  rate {}  video {}{}",
        deck + 1,
        state,
        format_time(position_secs),
        format_time(snapshot.duration),
        snapshot.bpm,
        format_rate_percent(snapshot.derived_speed),
        video,
        mute_tag
    )
}
