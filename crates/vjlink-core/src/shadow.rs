//! Shadow state store
//!
//! The follower's local replica of mixer-reported values, updated only by
//! inbound events. Each `(group, control)` pair holds the most recently
//! applied value; unknown control names are stored untouched so an evolving
//! vocabulary never breaks older followers.

use crate::event::{control, ChannelId, Value};
use std::collections::HashMap;

/// Last-write-wins store of every `(group, control)` pair seen so far
///
/// Created empty at process start and populated incrementally; never
/// persisted. Values survive a stream reconnect (stale entries are simply
/// overwritten as fresh events arrive).
#[derive(Debug, Default)]
pub struct ShadowStore {
    groups: HashMap<ChannelId, HashMap<String, Value>>,
}

impl ShadowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the previous one for the pair
    ///
    /// Returns None when the pair is seen for the first time; callers can
    /// use the previous value to detect no-op writes.
    pub fn set(&mut self, group: ChannelId, control: &str, value: Value) -> Option<Value> {
        self.groups
            .entry(group)
            .or_default()
            .insert(control.to_string(), value)
    }

    /// Current value for a pair, or None if never observed
    pub fn get(&self, group: ChannelId, control: &str) -> Option<&Value> {
        self.groups.get(&group)?.get(control)
    }

    /// Master crossfader scalar, clamped to [-1, 1] (0 until observed)
    pub fn crossfader(&self) -> f64 {
        self.get(ChannelId::Master, control::CROSSFADER)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }

    /// Consistent typed view of one channel's deck state
    ///
    /// The copy is taken at a single point in time, so `duration` and
    /// `playposition` always belong together even if further events are
    /// applied afterward.
    pub fn snapshot(&self, group: ChannelId) -> DeckSnapshot {
        let controls = self.groups.get(&group);
        let num = |name: &str| controls.and_then(|c| c.get(name)).and_then(Value::as_f64);

        // Derived speed is only meaningful once both factors have been
        // observed; until then natural playback speed is assumed.
        let derived_speed = match (num(control::RATE), num(control::RATE_RANGE)) {
            (Some(rate), Some(range)) => 1.0 - range * rate,
            _ => DeckSnapshot::NATURAL_SPEED,
        };

        let video_id = controls
            .and_then(|c| c.get(control::TRACKINFO))
            .and_then(Value::as_track)
            .and_then(|t| t.youtube_id.clone());

        DeckSnapshot {
            duration: num(control::DURATION).unwrap_or(0.0).max(0.0),
            playposition: num(control::PLAYPOSITION).unwrap_or(0.0).clamp(0.0, 1.0),
            play: num(control::PLAY).map(|v| v != 0.0).unwrap_or(false),
            bpm: num(control::BPM).unwrap_or(0.0).max(0.0),
            rate: num(control::RATE).unwrap_or(0.0),
            rate_range: num(control::RATE_RANGE).unwrap_or(0.0),
            video_id,
            derived_speed,
        }
    }
}

/// Immutable copy of one channel's shadow deck state
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSnapshot {
    /// Track length in seconds (0 until observed)
    pub duration: f64,
    /// Normalized position in [0, 1] (0 until observed)
    pub playposition: f64,
    /// Transport play flag
    pub play: bool,
    pub bpm: f64,
    pub rate: f64,
    pub rate_range: f64,
    /// Video id from the last trackinfo payload, if it carried one
    pub video_id: Option<String>,
    /// Playback speed factor `1 - rateRange * rate`
    pub derived_speed: f64,
}

impl DeckSnapshot {
    /// Derived speed before both rate factors have been observed
    pub const NATURAL_SPEED: f64 = 1.0;

    /// Position in seconds, computed from this snapshot alone
    pub fn target_seconds(&self) -> f64 {
        self.duration * self.playposition
    }
}

impl Default for DeckSnapshot {
    fn default() -> Self {
        Self {
            duration: 0.0,
            playposition: 0.0,
            play: false,
            bpm: 0.0,
            rate: 0.0,
            rate_range: 0.0,
            video_id: None,
            derived_speed: Self::NATURAL_SPEED,
        }
    }
}
