//! Per-channel deck synchronizer
//!
//! Keeps one video player's transport consistent with its deck's shadow
//! state without fighting the player's own playback clock. Position is only
//! corrected while the deck is playing (play-gate), and only when the
//! discrepancy exceeds the dead-band; corrections are hard seeks.
//!
//! # State machine
//!
//! ```text
//! Unloaded ──trackinfo──► LoadedPaused ◄──play=0─── LoadedPlaying
//!                              │    ▲                    ▲
//!                              │    └──trackinfo (new id)┘
//!                              └────────play=1───────────┘
//! ```
//!
//! A reload never auto-resumes: the deck stays paused until the mixer's
//! next play event arrives.

use crate::event::TrackInfo;
use crate::player::VideoPlayer;
use crate::shadow::DeckSnapshot;
use serde::{Deserialize, Serialize};

/// Maximum tolerated position discrepancy before a hard seek, in seconds
///
/// The mixer's position stream and the player's native clock advance
/// independently; anything below this window is clock noise, anything above
/// it is a real desync (track load, manual cue, loop).
pub const SEEK_DEAD_BAND: f64 = 0.1;

/// What to do with the player when a new video lands on the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackChangePolicy {
    /// Mute and pause as soon as the new video is loaded, avoiding a
    /// glitch frame before the next play event
    #[default]
    MuteImmediately,
    /// Load only; mute/pause are left to the subsequent play event
    DeferToPlay,
}

/// Transport state of one deck's bound player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No trackinfo received yet; every operation is a no-op
    #[default]
    Unloaded,
    LoadedPaused,
    LoadedPlaying,
}

/// Synchronizes one video player with one deck's shadow state
pub struct DeckSync<P: VideoPlayer> {
    deck: usize,
    player: P,
    policy: TrackChangePolicy,
    state: TransportState,
    video_id: Option<String>,
}

impl<P: VideoPlayer> DeckSync<P> {
    pub fn new(deck: usize, player: P, policy: TrackChangePolicy) -> Self {
        Self {
            deck,
            player,
            policy,
            state: TransportState::Unloaded,
            video_id: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Video id currently loaded into the player, if any
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Handle a trackinfo event: load the video if it differs from the
    /// one already loaded
    pub fn on_trackinfo(&mut self, track: &TrackInfo) {
        let Some(id) = track.youtube_id.as_deref() else {
            log::debug!(
                "Deck {}: trackinfo carries no video id, keeping current video",
                self.deck
            );
            return;
        };

        if self.video_id.as_deref() == Some(id) {
            log::debug!("Deck {}: video {} already loaded", self.deck, id);
            return;
        }

        log::info!(
            "Deck {}: loading video {} ({} - {})",
            self.deck,
            id,
            track.artist.as_deref().unwrap_or("?"),
            track.title.as_deref().unwrap_or("?")
        );
        if let Err(e) = self.player.set_video(id) {
            log::warn!("Deck {}: set_video({}) failed: {}", self.deck, id, e);
        }
        self.video_id = Some(id.to_string());

        if self.policy == TrackChangePolicy::MuteImmediately {
            if let Err(e) = self.player.mute() {
                log::warn!("Deck {}: mute failed: {}", self.deck, e);
            }
            if let Err(e) = self.player.pause() {
                log::warn!("Deck {}: pause failed: {}", self.deck, e);
            }
        }

        // A reload while playing lands paused; playback resumes on the
        // mixer's next play event
        self.state = TransportState::LoadedPaused;
    }

    /// Handle a play event: unmute and start on 1, pause on 0
    pub fn on_play(&mut self, playing: bool) {
        if self.state == TransportState::Unloaded {
            log::debug!("Deck {}: play event before any track, ignoring", self.deck);
            return;
        }

        if playing {
            if let Err(e) = self.player.unmute() {
                log::warn!("Deck {}: unmute failed: {}", self.deck, e);
            }
            if let Err(e) = self.player.play() {
                log::warn!("Deck {}: play failed: {}", self.deck, e);
            }
            self.state = TransportState::LoadedPlaying;
        } else {
            if let Err(e) = self.player.pause() {
                log::warn!("Deck {}: pause failed: {}", self.deck, e);
            }
            self.state = TransportState::LoadedPaused;
        }
    }

    /// Handle a playposition event: seek when the player has drifted past
    /// the dead-band
    ///
    /// The snapshot must come from a single shadow read so duration and
    /// position belong together.
    pub fn on_playposition(&mut self, snapshot: &DeckSnapshot) {
        if self.state == TransportState::Unloaded {
            return;
        }

        // Play-gate: an idle deck already sits on a stable frame
        if !snapshot.play {
            return;
        }

        // No duration yet means no meaningful target; skipping also avoids
        // a spurious first seek to zero
        if snapshot.duration <= 0.0 {
            return;
        }

        let target = snapshot.target_seconds();
        let drift = (target - self.player.current_time()).abs();
        if drift > SEEK_DEAD_BAND {
            log::debug!(
                "Deck {}: correcting {:.3}s drift, seeking to {:.3}s",
                self.deck,
                drift,
                target
            );
            if let Err(e) = self.player.set_time(target) {
                log::warn!("Deck {}: set_time({:.3}) failed: {}", self.deck, target, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerError;
    use std::cell::Cell;

    /// Records every command; playback clock is set by the test
    #[derive(Default)]
    struct RecordingPlayer {
        commands: Vec<String>,
        time: Cell<f64>,
    }

    impl VideoPlayer for RecordingPlayer {
        fn set_video(&mut self, id: &str) -> Result<(), PlayerError> {
            self.commands.push(format!("set_video {}", id));
            Ok(())
        }
        fn play(&mut self) -> Result<(), PlayerError> {
            self.commands.push("play".into());
            Ok(())
        }
        fn pause(&mut self) -> Result<(), PlayerError> {
            self.commands.push("pause".into());
            Ok(())
        }
        fn mute(&mut self) -> Result<(), PlayerError> {
            self.commands.push("mute".into());
            Ok(())
        }
        fn unmute(&mut self) -> Result<(), PlayerError> {
            self.commands.push("unmute".into());
            Ok(())
        }
        fn set_time(&mut self, seconds: f64) -> Result<(), PlayerError> {
            self.commands.push(format!("set_time {}", seconds));
            self.time.set(seconds);
            Ok(())
        }
        fn current_time(&self) -> f64 {
            self.time.get()
        }
    }

    fn deck(policy: TrackChangePolicy) -> DeckSync<RecordingPlayer> {
        DeckSync::new(0, RecordingPlayer::default(), policy)
    }

    fn playing_snapshot(duration: f64, playposition: f64) -> DeckSnapshot {
        DeckSnapshot {
            duration,
            playposition,
            play: true,
            ..DeckSnapshot::default()
        }
    }

    #[test]
    fn test_starts_unloaded() {
        let deck = deck(TrackChangePolicy::default());
        assert_eq!(deck.state(), TransportState::Unloaded);
        assert_eq!(deck.video_id(), None);
    }

    #[test]
    fn test_trackinfo_loads_and_mutes_immediately() {
        let mut deck = deck(TrackChangePolicy::MuteImmediately);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));

        assert_eq!(deck.state(), TransportState::LoadedPaused);
        assert_eq!(deck.video_id(), Some("abc"));
        assert_eq!(deck.player().commands, ["set_video abc", "mute", "pause"]);
    }

    #[test]
    fn test_trackinfo_defer_to_play_only_loads() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));

        assert_eq!(deck.state(), TransportState::LoadedPaused);
        assert_eq!(deck.player().commands, ["set_video abc"]);
    }

    #[test]
    fn test_same_video_is_not_reloaded() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_trackinfo(&TrackInfo::with_video("abc"));

        assert_eq!(deck.player().commands, ["set_video abc"]);
    }

    #[test]
    fn test_trackinfo_without_id_is_ignored() {
        let mut deck = deck(TrackChangePolicy::MuteImmediately);
        deck.on_trackinfo(&TrackInfo::default());

        assert_eq!(deck.state(), TransportState::Unloaded);
        assert!(deck.player().commands.is_empty());

        // And it does not clobber an already loaded video either
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_trackinfo(&TrackInfo::default());
        assert_eq!(deck.video_id(), Some("abc"));
    }

    #[test]
    fn test_play_unmutes_then_plays() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);

        assert_eq!(deck.state(), TransportState::LoadedPlaying);
        assert_eq!(deck.player().commands, ["set_video abc", "unmute", "play"]);
    }

    #[test]
    fn test_play_zero_pauses() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);
        deck.on_play(false);

        assert_eq!(deck.state(), TransportState::LoadedPaused);
        assert_eq!(deck.player().commands.last().unwrap(), "pause");
    }

    #[test]
    fn test_events_before_first_trackinfo_are_noops() {
        let mut deck = deck(TrackChangePolicy::default());
        deck.on_play(true);
        deck.on_playposition(&playing_snapshot(200.0, 0.5));

        assert_eq!(deck.state(), TransportState::Unloaded);
        assert!(deck.player().commands.is_empty());
    }

    #[test]
    fn test_reload_while_playing_lands_paused() {
        let mut deck = deck(TrackChangePolicy::MuteImmediately);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);
        deck.on_trackinfo(&TrackInfo::with_video("def"));

        assert_eq!(deck.state(), TransportState::LoadedPaused);
        assert_eq!(deck.video_id(), Some("def"));
        // No play command after the reload; the mixer's next play event
        // resumes playback
        assert_eq!(
            deck.player().commands,
            ["set_video abc", "mute", "pause", "unmute", "play", "set_video def", "mute", "pause"]
        );

        deck.on_play(true);
        assert_eq!(deck.state(), TransportState::LoadedPlaying);
    }

    #[test]
    fn test_playposition_seeks_past_dead_band() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);

        deck.player().time.set(0.0);
        deck.on_playposition(&playing_snapshot(200.0, 0.5));

        assert_eq!(deck.player().commands.last().unwrap(), "set_time 100");
    }

    #[test]
    fn test_play_gate_suppresses_seek_while_paused() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));

        let snapshot = DeckSnapshot {
            duration: 200.0,
            playposition: 0.8,
            play: false,
            ..DeckSnapshot::default()
        };
        deck.on_playposition(&snapshot);

        assert_eq!(deck.player().commands, ["set_video abc"]);
    }

    #[test]
    fn test_dead_band_boundary() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);

        // Exactly at the dead-band: no seek
        deck.player().time.set(100.0 - SEEK_DEAD_BAND);
        deck.on_playposition(&playing_snapshot(200.0, 0.5));
        assert!(!deck.player().commands.iter().any(|c| c.starts_with("set_time")));

        // A hair past it: seek
        deck.player().time.set(100.0 - 0.1000001);
        deck.on_playposition(&playing_snapshot(200.0, 0.5));
        assert_eq!(deck.player().commands.last().unwrap(), "set_time 100");
    }

    #[test]
    fn test_seek_is_idempotent() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);

        // First event corrects; the second observes the corrected clock
        // and falls within the dead-band
        deck.on_playposition(&playing_snapshot(200.0, 0.5));
        deck.on_playposition(&playing_snapshot(200.0, 0.5));

        let seeks = deck.player().commands.iter().filter(|c| c.starts_with("set_time")).count();
        assert_eq!(seeks, 1);
    }

    #[test]
    fn test_unknown_duration_skips_correction() {
        let mut deck = deck(TrackChangePolicy::DeferToPlay);
        deck.on_trackinfo(&TrackInfo::with_video("abc"));
        deck.on_play(true);

        // Position arrives before duration: target would be zero, and the
        // player may already sit far from it. No seek.
        deck.player().time.set(42.0);
        deck.on_playposition(&playing_snapshot(0.0, 0.5));

        assert!(!deck.player().commands.iter().any(|c| c.starts_with("set_time")));
    }

    #[test]
    fn test_policy_parses_from_config_strings() {
        let parse =
            |s: &str| serde_json::from_str::<TrackChangePolicy>(&format!("\"{}\"", s)).unwrap();
        assert_eq!(parse("mute_immediately"), TrackChangePolicy::MuteImmediately);
        assert_eq!(parse("defer_to_play"), TrackChangePolicy::DeferToPlay);
        assert_eq!(TrackChangePolicy::default(), TrackChangePolicy::MuteImmediately);
    }
}
