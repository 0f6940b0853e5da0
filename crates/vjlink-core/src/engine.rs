//! Event classification and routing
//!
//! One [`SyncEngine`] per process owns the shadow store, both deck
//! synchronizers, and the blend inputs; there is no ambient global state.
//! Every event is stored first, then routed by `(group, control)`.

use crate::blend::{blend, BlendMode, BlendOutput};
use crate::deck::{DeckSync, TrackChangePolicy};
use crate::event::{control, ChannelId, ControlEvent, Value};
use crate::player::VideoPlayer;
use crate::shadow::{DeckSnapshot, ShadowStore};
use serde::{Deserialize, Serialize};

/// Engine behavior options, loadable from the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Player handling when a new video lands on a deck
    pub on_track_change: TrackChangePolicy,
    /// Crossfade algorithm
    pub blend_mode: BlendMode,
}

/// State synchronization engine for two decks and one master fader
///
/// Feed decoded events through [`apply`](Self::apply); the engine updates
/// its shadow state, drives the two players, and reports blend changes for
/// the caller to render.
pub struct SyncEngine<P: VideoPlayer> {
    shadow: ShadowStore,
    decks: [DeckSync<P>; 2],
    blend_mode: BlendMode,
    overrides: [f64; 2],
    current_blend: BlendOutput,
}

impl<P: VideoPlayer> SyncEngine<P> {
    /// Build an engine owning the two channel players
    pub fn new(config: EngineConfig, player0: P, player1: P) -> Self {
        let overrides = [1.0, 1.0];
        Self {
            shadow: ShadowStore::new(),
            decks: [
                DeckSync::new(0, player0, config.on_track_change),
                DeckSync::new(1, player1, config.on_track_change),
            ],
            blend_mode: config.blend_mode,
            overrides,
            // Fader at rest until the first crossfader event arrives
            current_blend: blend(config.blend_mode, 0.0, overrides),
        }
    }

    /// Apply one decoded event: store it, then route it
    ///
    /// Returns the recomputed blend when the event was a crossfader move,
    /// None for everything else. Unknown `(group, control)` combinations
    /// are stored but not routed.
    pub fn apply(&mut self, event: ControlEvent) -> Option<BlendOutput> {
        let ControlEvent { group, control, value } = event;

        // Shadow first: every event is stored, routed or not
        self.shadow.set(group, &control, value.clone());

        match (group.deck_index(), control.as_str()) {
            (Some(deck), control::TRACKINFO) => {
                match &value {
                    Value::Track(track) => self.decks[deck].on_trackinfo(track),
                    Value::Number(_) => {
                        log::warn!("Engine: trackinfo on deck {} without a track payload", deck)
                    }
                }
                None
            }
            (Some(deck), control::PLAY) => {
                if let Some(playing) = value.as_flag() {
                    self.decks[deck].on_play(playing);
                }
                None
            }
            (Some(deck), control::PLAYPOSITION) => {
                let snapshot = self.shadow.snapshot(group);
                self.decks[deck].on_playposition(&snapshot);
                None
            }
            (None, control::CROSSFADER) => Some(self.refresh_blend()),
            _ => None,
        }
    }

    /// Set a deck's manual opacity override (e.g. a visual filter control)
    ///
    /// Returns the recomputed blend when the override actually changed;
    /// setting the same value again is a no-op.
    pub fn set_opacity_override(&mut self, deck: usize, opacity: f64) -> Option<BlendOutput> {
        let opacity = opacity.clamp(0.0, 1.0);
        if self.overrides[deck] == opacity {
            return None;
        }
        self.overrides[deck] = opacity;
        Some(self.refresh_blend())
    }

    fn refresh_blend(&mut self) -> BlendOutput {
        self.current_blend = blend(self.blend_mode, self.shadow.crossfader(), self.overrides);
        self.current_blend
    }

    /// Most recently computed blend
    pub fn current_blend(&self) -> BlendOutput {
        self.current_blend
    }

    /// Consistent typed view of one channel's shadow state
    pub fn snapshot(&self, group: ChannelId) -> DeckSnapshot {
        self.shadow.snapshot(group)
    }

    /// Raw shadow value for a `(group, control)` pair
    pub fn shadow_value(&self, group: ChannelId, control: &str) -> Option<&Value> {
        self.shadow.get(group, control)
    }

    /// Synchronizer for a deck index (0 or 1)
    pub fn deck(&self, deck: usize) -> &DeckSync<P> {
        &self.decks[deck]
    }
}
