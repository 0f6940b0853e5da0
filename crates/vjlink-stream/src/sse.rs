//! Server-sent-events line protocol
//!
//! The bridge's stream is line-based: `data: <payload>` lines carry the
//! JSON events, a blank line terminates the pending event, and `:` lines
//! are comments (the bridge greets with `: connected`). Multi-line data
//! frames are joined with newlines before decoding.

use thiserror::Error;
use vjlink_core::ControlEvent;

/// Error type for stream transport and decoding
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Connection to event stream failed: {0}")]
    Connect(String),

    #[error("Event stream closed: {0}")]
    Read(String),

    #[error("Undecodable event payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to spawn stream reader thread: {0}")]
    Spawn(String),
}

/// Incremental assembler for the SSE line protocol
///
/// Feed lines as they arrive (without their trailing newline); a blank line
/// completes the pending event and yields its data payload.
#[derive(Debug, Default)]
pub struct SseAssembler {
    data_lines: Vec<String>,
}

impl SseAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line, returning the completed event payload if the line
    /// terminated one
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            // Blank line: event boundary (or a keep-alive between events)
            if self.data_lines.is_empty() {
                return None;
            }
            let payload = self.data_lines.join("\n");
            self.data_lines.clear();
            return Some(payload);
        }

        if line.starts_with(':') {
            return None; // comment
        }

        if let Some(data) = line.strip_prefix("data:") {
            // A single leading space after the colon is part of the framing
            self.data_lines.push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        // Other fields (event:, id:, retry:) are not used by the bridge

        None
    }
}

/// Decode one assembled event payload into a control event
pub fn decode_event(payload: &str) -> Result<ControlEvent, StreamError> {
    Ok(ControlEvent::from_json(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vjlink_core::ChannelId;

    #[test]
    fn test_assembles_single_data_line() {
        let mut sse = SseAssembler::new();
        assert_eq!(sse.push_line("data: {\"a\": 1}"), None);
        assert_eq!(sse.push_line("").as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_comments_and_keepalives_are_skipped() {
        let mut sse = SseAssembler::new();
        // The bridge's greeting, then idle keep-alive blanks
        assert_eq!(sse.push_line(": connected"), None);
        assert_eq!(sse.push_line(""), None);
        assert_eq!(sse.push_line(""), None);

        assert_eq!(sse.push_line("data: x"), None);
        assert_eq!(sse.push_line("").as_deref(), Some("x"));
    }

    #[test]
    fn test_multi_line_data_joins_with_newlines() {
        let mut sse = SseAssembler::new();
        sse.push_line("data: first");
        sse.push_line("data: second");
        assert_eq!(sse.push_line("").as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_data_without_space_after_colon() {
        let mut sse = SseAssembler::new();
        sse.push_line("data:{\"a\":1}");
        assert_eq!(sse.push_line("").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut sse = SseAssembler::new();
        sse.push_line("id: 42");
        sse.push_line("retry: 3000");
        sse.push_line("data: payload");
        assert_eq!(sse.push_line("").as_deref(), Some("payload"));
    }

    #[test]
    fn test_stream_of_bridge_frames() {
        // A realistic slice of the bridge's output
        let wire = concat!(
            ": connected\n",
            "\n",
            "data: {\"group\": \"[Channel1]\", \"control\": \"play\", \"value\": 1}\n",
            "\n",
            "data: {\"group\": \"[Master]\", \"control\": \"crossfader\", \"value\": -0.5}\n",
            "\n",
        );

        let mut sse = SseAssembler::new();
        let mut events = Vec::new();
        for line in wire.lines() {
            if let Some(payload) = sse.push_line(line) {
                events.push(decode_event(&payload).unwrap());
            }
        }

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].group, ChannelId::Channel1);
        assert_eq!(events[0].control, "play");
        assert_eq!(events[1].group, ChannelId::Master);
        assert_eq!(events[1].value.as_f64(), Some(-0.5));
    }

    #[test]
    fn test_undecodable_payload_reports_decode_error() {
        let err = decode_event("{\"group\": \"nope\"}").unwrap_err();
        assert!(matches!(err, StreamError::Decode(_)));
    }
}
