//! Control event model
//!
//! The mixer bridge emits one JSON object per state change:
//! `{"group": "[Channel1]", "control": "playposition", "value": 0.5}`.
//! Groups use the mixer's bracketed channel names; `value` is either a
//! number or the structured track payload carried by `trackinfo`.

use serde::{Deserialize, Serialize};

/// Well-known control names
///
/// The vocabulary is open: anything not listed here is stored in the shadow
/// state but never routed to a handler.
pub mod control {
    /// New track/video loaded (structured payload)
    pub const TRACKINFO: &str = "trackinfo";
    /// Transport play state, 0 or 1
    pub const PLAY: &str = "play";
    /// Normalized position within duration, ratio in [0, 1]
    pub const PLAYPOSITION: &str = "playposition";
    /// Track length in seconds
    pub const DURATION: &str = "duration";
    /// Tempo
    pub const BPM: &str = "bpm";
    /// Pitch/tempo adjustment fraction
    pub const RATE: &str = "rate";
    /// Scaling applied to `rate`
    pub const RATE_RANGE: &str = "rateRange";
    /// Beat pulse, 0 or 1 (display-only)
    pub const BEAT_ACTIVE: &str = "beat_active";
    /// Master fader scalar in [-1, 1]
    pub const CROSSFADER: &str = "crossfader";
}

/// Channel identifier
///
/// Fixed cardinality: two playable channels plus the master group. The wire
/// representation is the mixer's bracketed group name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    #[serde(rename = "[Channel1]")]
    Channel1,
    #[serde(rename = "[Channel2]")]
    Channel2,
    #[serde(rename = "[Master]")]
    Master,
}

impl ChannelId {
    /// The two playable channels in deck order
    pub const PLAYABLE: [ChannelId; 2] = [ChannelId::Channel1, ChannelId::Channel2];

    /// Zero-based deck index for playable channels, None for Master
    pub fn deck_index(&self) -> Option<usize> {
        match self {
            Self::Channel1 => Some(0),
            Self::Channel2 => Some(1),
            Self::Master => None,
        }
    }

    /// Playable channel for a zero-based deck index
    ///
    /// # Panics
    /// Panics if `deck` is not 0 or 1.
    pub fn from_deck_index(deck: usize) -> Self {
        match deck {
            0 => Self::Channel1,
            1 => Self::Channel2,
            _ => panic!("Deck index out of range: {}", deck),
        }
    }
}

/// Track metadata carried by a `trackinfo` event
///
/// Every field is nullable: the bridge emits `null` for anything it cannot
/// resolve, including the video id itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub youtube_id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub path: Option<String>,
}

impl TrackInfo {
    /// Shorthand for a payload that only carries a video id
    pub fn with_video(id: &str) -> Self {
        Self {
            youtube_id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

/// Event value: a numeric control or the structured track payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Track(TrackInfo),
}

impl Value {
    /// Numeric value, if this is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Track(_) => None,
        }
    }

    /// Numeric value interpreted as a 0/1 flag
    pub fn as_flag(&self) -> Option<bool> {
        self.as_f64().map(|v| v != 0.0)
    }

    /// Track payload, if this is one
    pub fn as_track(&self) -> Option<&TrackInfo> {
        match self {
            Self::Number(_) => None,
            Self::Track(t) => Some(t),
        }
    }
}

/// One decoded state-change event from the mixer bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub group: ChannelId,
    pub control: String,
    pub value: Value,
}

impl ControlEvent {
    /// Decode a single JSON event payload
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Numeric control event
    pub fn number(group: ChannelId, control: &str, value: f64) -> Self {
        Self {
            group,
            control: control.to_string(),
            value: Value::Number(value),
        }
    }

    /// Track payload event (always `trackinfo`)
    pub fn track(group: ChannelId, track: TrackInfo) -> Self {
        Self {
            group,
            control: control::TRACKINFO.to_string(),
            value: Value::Track(track),
        }
    }
}
