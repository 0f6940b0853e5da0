//! Background stream reader
//!
//! Owns the thread that keeps a connection to the bridge open and feeds
//! decoded events into a bounded channel. The channel is the only hand-off
//! point between transport and engine: if the app loop falls behind, events
//! are dropped with a warning (the mixer re-emits its state continuously,
//! so a lost frame heals on the next one).

use crate::sse::{decode_event, SseAssembler, StreamError};
use flume::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use vjlink_core::ControlEvent;

/// Decoded events buffered between the reader thread and the app loop
const EVENT_QUEUE_CAPACITY: usize = 256;

/// Connect timeout for each attempt
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// An idle stream is treated as dropped after this long without bytes;
/// reconnecting is safe because no replay is expected
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Stream client configuration, loadable from the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bridge origin; the `/events` path is appended
    pub origin: String,
    /// Seconds to wait before reconnecting after a dropped stream
    pub reconnect_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5000".to_string(),
            reconnect_secs: 3,
        }
    }
}

impl StreamConfig {
    /// Full URL of the event stream endpoint
    pub fn events_url(&self) -> String {
        format!("{}/events", self.origin.trim_end_matches('/'))
    }
}

/// Handle to the stream reader thread
///
/// Dropping the handle (or calling [`stop`](Self::stop)) signals the reader
/// to exit; the receiver side then disconnects once the thread is gone.
pub struct EventStreamClient {
    event_rx: Receiver<ControlEvent>,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl EventStreamClient {
    /// Spawn the reader thread and start streaming events
    pub fn start(config: StreamConfig) -> Result<Self, StreamError> {
        let (event_tx, event_rx) = flume::bounded(EVENT_QUEUE_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let flag = shutdown.clone();
        let reader = std::thread::Builder::new()
            .name("vjlink-stream".into())
            .spawn(move || run_reader(config, event_tx, flag))
            .map_err(|e| StreamError::Spawn(e.to_string()))?;

        Ok(Self {
            event_rx,
            shutdown,
            reader: Some(reader),
        })
    }

    /// Receiver for decoded events
    pub fn receiver(&self) -> Receiver<ControlEvent> {
        self.event_rx.clone()
    }

    /// Signal the reader thread to stop and wait for it to finish
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EventStreamClient {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// Connect-read-reconnect loop, running until shutdown
fn run_reader(config: StreamConfig, event_tx: Sender<ControlEvent>, shutdown: Arc<AtomicBool>) {
    let url = config.events_url();
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout_read(READ_TIMEOUT)
        .build();

    while !shutdown.load(Ordering::Relaxed) {
        match agent.get(&url).set("Accept", "text/event-stream").call() {
            Ok(response) => {
                log::info!("Stream: connected to {}", url);
                match read_stream(response, &event_tx, &shutdown) {
                    Ok(()) => break, // orderly shutdown or app loop gone
                    Err(e) => log::warn!("Stream: {}", e),
                }
            }
            Err(e) => {
                log::warn!("Stream: {}", StreamError::Connect(e.to_string()));
            }
        }

        if shutdown.load(Ordering::Relaxed) || event_tx.is_disconnected() {
            break;
        }
        log::info!("Stream: reconnecting in {}s", config.reconnect_secs);
        std::thread::sleep(Duration::from_secs(config.reconnect_secs));
    }

    log::info!("Stream: reader stopped");
}

/// Read one connection until it drops, pushing decoded events
///
/// Returns Ok on an orderly stop (shutdown flag, or the app loop dropped
/// its receiver) and Err when the connection itself failed.
fn read_stream(
    response: ureq::Response,
    event_tx: &Sender<ControlEvent>,
    shutdown: &Arc<AtomicBool>,
) -> Result<(), StreamError> {
    let mut reader = std::io::BufReader::new(response.into_reader());
    let mut assembler = SseAssembler::new();
    let mut line = String::new();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(());
        }

        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| StreamError::Read(e.to_string()))?;
        if read == 0 {
            return Err(StreamError::Read("end of stream".to_string()));
        }

        let Some(payload) = assembler.push_line(line.trim_end_matches(['\r', '\n'])) else {
            continue;
        };

        // A malformed event is dropped here; the engine never sees it and
        // its shadow state stays untouched
        let event = match decode_event(&payload) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Stream: dropping event: {} (payload: {})", e, payload);
                continue;
            }
        };

        match event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::warn!("Stream: event queue full, dropping event");
            }
            Err(TrySendError::Disconnected(_)) => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_strips_trailing_slash() {
        let config = StreamConfig {
            origin: "http://localhost:5000/".to_string(),
            ..StreamConfig::default()
        };
        assert_eq!(config.events_url(), "http://localhost:5000/events");
    }

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.events_url(), "http://localhost:5000/events");
        assert_eq!(config.reconnect_secs, 3);
    }
}
