//! Video player capability interface
//!
//! The engine drives players exclusively through this trait; it never waits
//! for a command to complete. A slow or failing player costs nothing but a
//! logged warning, because the next event re-triggers the correction.

use thiserror::Error;

/// Error from a video player command
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player not ready: {0}")]
    NotReady(String),

    #[error("Invalid video id: {0}")]
    InvalidVideo(String),

    #[error("Playback command failed: {0}")]
    Command(String),
}

/// Transport primitives of one video player
///
/// `current_time` is the player's own playback clock in seconds; it must be
/// cheap to read and never block. Everything else is a command whose effect
/// is assumed to take hold before the next corrective check.
pub trait VideoPlayer {
    /// Load a video by id, replacing whatever is playing
    fn set_video(&mut self, id: &str) -> Result<(), PlayerError>;

    /// Start or resume playback
    fn play(&mut self) -> Result<(), PlayerError>;

    /// Pause playback, holding the current frame
    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Silence the player's own audio output
    fn mute(&mut self) -> Result<(), PlayerError>;

    /// Undo [`mute`](Self::mute), resuming the preview output
    fn unmute(&mut self) -> Result<(), PlayerError>;

    /// Hard-seek to an absolute position in seconds
    fn set_time(&mut self, seconds: f64) -> Result<(), PlayerError>;

    /// The player's current playback position in seconds
    fn current_time(&self) -> f64;
}
