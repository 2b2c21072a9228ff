// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Antri queue tracker.
//!
//! This crate provides the foundational error type, shared domain types
//! (tickets, snapshots, sync events), and the adapter traits the node loop
//! depends on. The transport and storage crates implement traits defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AntriError;
pub use types::{
    AdapterType, ConnectionState, HealthStatus, QueueSnapshot, RoomConfig, SnapshotPayload,
    SyncEvent, Ticket, TicketId, TicketStatus, now_ms,
};

pub use traits::{Adapter, SnapshotStore, SyncTransport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_update_wire_shape_is_camel_case_and_tagged() {
        let event = SyncEvent::QueueUpdate(SnapshotPayload {
            tickets: vec![Ticket {
                id: TicketId("t-1".into()),
                number: 1,
                name: "Alice".into(),
                contact: "0812".into(),
                created_at: 1_700_000_000_000,
                status: TicketStatus::Waiting,
            }],
            current_number: None,
            last_number: 1,
            calling_started_at: None,
        });

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).expect("serialize")).expect("json");
        assert_eq!(json["type"], "queue-update");
        assert_eq!(json["lastNumber"], 1);
        assert_eq!(json["tickets"][0]["status"], "WAITING");
        assert_eq!(json["tickets"][0]["createdAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn request_sync_carries_no_payload() {
        let json = serde_json::to_string(&SyncEvent::RequestSync).expect("serialize");
        assert_eq!(json, r#"{"type":"request-sync"}"#);
        let parsed: SyncEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, SyncEvent::RequestSync);
    }

    #[test]
    fn payload_requires_tickets_and_last_number() {
        // Optional fields may be absent...
        let ok: Result<SnapshotPayload, _> =
            serde_json::from_str(r#"{"tickets":[],"lastNumber":0}"#);
        assert!(ok.is_ok());

        // ...but the required ones may not.
        let missing: Result<SnapshotPayload, _> =
            serde_json::from_str(r#"{"currentNumber":3}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn snapshot_omits_absent_room_config() {
        let snapshot = QueueSnapshot::default();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(!json.contains("roomConfig"));

        let with_room = QueueSnapshot {
            room_config: Some(RoomConfig {
                endpoint: "wss://relay.example".into(),
                credential: "secret".into(),
                room_id: "booth-1".into(),
            }),
            ..QueueSnapshot::default()
        };
        let json = serde_json::to_string(&with_room).expect("serialize");
        assert!(json.contains(r#""roomId":"booth-1""#));
    }

    #[test]
    fn room_topic_derivation() {
        let room = RoomConfig {
            endpoint: "wss://relay.example".into(),
            credential: "secret".into(),
            room_id: "booth-1".into(),
        };
        assert_eq!(room.topic(), "room-booth-1");
    }

    #[test]
    fn connection_state_displays_wire_form() {
        assert_eq!(ConnectionState::Connected.to_string(), "CONNECTED");
        assert_eq!(ConnectionState::Disconnected.to_string(), "DISCONNECTED");
    }
}
