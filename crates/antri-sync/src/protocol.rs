// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay wire frames.
//!
//! The relay is a dumb fan-out: a client joins a topic, then every
//! `broadcast` frame it sends is delivered to the topic's other
//! subscribers. Queue semantics live entirely inside the carried
//! [`SyncEvent`].
//!
//! ```json
//! {"type":"join","topic":"room-booth-1","credential":"..."}
//! {"type":"broadcast","topic":"room-booth-1","event":{"type":"request-sync"}}
//! ```

use antri_core::SyncEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A frame exchanged with the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Frame {
    /// Client -> relay: subscribe this connection to a topic.
    Join { topic: String, credential: String },
    /// Either direction: an event fanned out to a topic's subscribers.
    Broadcast { topic: String, event: SyncEvent },
}

/// Serialize a frame for the socket.
pub fn encode(frame: &Frame) -> String {
    // Frames are plain data; serialization cannot fail.
    serde_json::to_string(frame).unwrap_or_default()
}

/// Parse an inbound text frame; anything unrecognized is dropped.
pub fn decode(text: &str) -> Option<Frame> {
    match serde_json::from_str(text) {
        Ok(frame) => Some(frame),
        Err(e) => {
            debug!(error = %e, "discarding unparseable relay frame");
            None
        }
    }
}
