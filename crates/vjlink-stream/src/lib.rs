//! Event stream client for the VJLink follower
//!
//! The mixer bridge serves its state changes as server-sent events on
//! `/events`. This crate owns the transport end of the pipeline:
//!
//! ```text
//! bridge /events → reader thread (SSE lines → JSON decode) → flume channel → app loop
//! ```
//!
//! The reader is a plain blocking thread; the app side consumes decoded
//! [`vjlink_core::ControlEvent`]s from a bounded channel at its own pace.
//! Undecodable frames are logged and skipped, and a dropped connection is
//! reconnected with a fixed backoff. The engine's shadow state survives
//! reconnects untouched; the first event after a reconnect is an ordinary
//! update.

mod client;
mod sse;

pub use client::{EventStreamClient, StreamConfig};
pub use sse::{decode_event, SseAssembler, StreamError};
