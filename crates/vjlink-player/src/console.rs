//! Console realization of the video player surface
//!
//! Stands in for an embedded player during development and headless runs:
//! every command is logged, and playback time advances against a wall-clock
//! anchor so drift correction behaves the same as against a real player.

use std::time::Instant;
use vjlink_core::{PlayerError, VideoPlayer};

/// Logging player with a simulated playback clock
pub struct ConsolePlayer {
    label: String,
    playing: bool,
    muted: bool,
    /// Playback position at the last transport change or seek
    position: f64,
    /// Wall-clock anchor for `position`
    anchored_at: Instant,
}

impl ConsolePlayer {
    pub fn new(deck: usize) -> Self {
        Self {
            label: format!("Player {}", deck + 1),
            playing: false,
            muted: false,
            position: 0.0,
            anchored_at: Instant::now(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Fold the running clock into `position` and re-anchor
    fn rebase(&mut self) {
        self.position = self.current_time();
        self.anchored_at = Instant::now();
    }
}

impl VideoPlayer for ConsolePlayer {
    fn set_video(&mut self, video_id: &str) -> Result<(), PlayerError> {
        log::info!("{}: load video {}", self.label, video_id);
        self.playing = false;
        self.position = 0.0;
        self.anchored_at = Instant::now();
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        log::info!("{}: play", self.label);
        self.rebase();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        log::info!("{}: pause", self.label);
        self.rebase();
        self.playing = false;
        Ok(())
    }

    fn mute(&mut self) -> Result<(), PlayerError> {
        log::info!("{}: mute", self.label);
        self.muted = true;
        Ok(())
    }

    fn unmute(&mut self) -> Result<(), PlayerError> {
        log::info!("{}: unmute", self.label);
        self.muted = false;
        Ok(())
    }

    fn set_time(&mut self, seconds: f64) -> Result<(), PlayerError> {
        log::info!("{}: seek to {:.3}s", self.label, seconds);
        self.position = seconds;
        self.anchored_at = Instant::now();
        Ok(())
    }

    fn current_time(&self) -> f64 {
        if self.playing {
            self.position + self.anchored_at.elapsed().as_secs_f64()
        } else {
            self.position
        }
    }
}
