//! State synchronization and blend engine for the VJLink video follower
//!
//! This crate provides:
//! - A typed model of the mixer bridge's `{group, control, value}` events
//! - A shadow state store replicating the mixer's last-known values
//! - Per-deck synchronizers driving video players (load/play/pause/seek
//!   with a dead-band against seek thrashing)
//! - A pure crossfade blender (opacity + stacking order from the fader)
//! - The [`SyncEngine`] tying them together, one instance per process
//!
//! # Architecture
//!
//! ```text
//! event stream → SyncEngine::apply ──► ShadowStore (every event)
//!                                  ├─► DeckSync 0/1 (trackinfo/play/playposition)
//!                                  └─► blend() (crossfader) → render target
//! ```
//!
//! Single-threaded by design: one event is stored and routed to completion
//! before the next is processed. Player commands are fire-and-forget; a
//! failed command is logged and the next event re-triggers the correction.

mod blend;
mod deck;
mod engine;
mod event;
mod player;
mod shadow;

pub use blend::{blend, BlendMode, BlendOutput, Front};
pub use deck::{DeckSync, TrackChangePolicy, TransportState, SEEK_DEAD_BAND};
pub use engine::{EngineConfig, SyncEngine};
pub use event::{control, ChannelId, ControlEvent, TrackInfo, Value};
pub use player::{PlayerError, VideoPlayer};
pub use shadow::{DeckSnapshot, ShadowStore};
