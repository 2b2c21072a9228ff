// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lossy decoding of persisted snapshots.
//!
//! Cold-start recovery must never fail: every field of the stored document
//! that is absent or of the wrong shape falls back to its default
//! individually, instead of one bad field discarding the whole queue.

use antri_core::{QueueSnapshot, Ticket};
use serde_json::Value;
use tracing::warn;

/// Decode a persisted snapshot document field by field.
pub fn decode_snapshot(value: &Value) -> QueueSnapshot {
    let mut snapshot = QueueSnapshot::default();

    if let Some(entries) = value.get("tickets").and_then(Value::as_array) {
        for entry in entries {
            match serde_json::from_value::<Ticket>(entry.clone()) {
                Ok(ticket) => snapshot.tickets.push(ticket),
                Err(e) => warn!(error = %e, "dropping malformed persisted ticket"),
            }
        }
    }

    snapshot.current_number = value
        .get("currentNumber")
        .and_then(Value::as_u64)
        .map(|n| n as u32);
    snapshot.last_number = value.get("lastNumber").and_then(Value::as_u64).unwrap_or(0) as u32;
    snapshot.calling_started_at = value.get("callingStartedAt").and_then(Value::as_i64);
    snapshot.room_config = value
        .get("roomConfig")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    // A lost counter must never fall below the numbers already issued, or
    // the allocator would hand out duplicates within the same epoch.
    let highest_issued = snapshot.tickets.iter().map(|t| t.number).max().unwrap_or(0);
    snapshot.last_number = snapshot.last_number.max(highest_issued);

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use antri_core::TicketStatus;
    use serde_json::json;

    #[test]
    fn well_formed_document_round_trips() {
        let original = QueueSnapshot {
            tickets: vec![Ticket {
                id: antri_core::TicketId("t-1".into()),
                number: 1,
                name: "Alice".into(),
                contact: "0811".into(),
                created_at: 1_700_000_000_000,
                status: TicketStatus::Calling,
            }],
            current_number: Some(1),
            last_number: 1,
            calling_started_at: Some(1_700_000_000_000),
            room_config: None,
        };
        let value = serde_json::to_value(&original).expect("serialize");
        assert_eq!(decode_snapshot(&value), original);
    }

    #[test]
    fn missing_fields_fall_back_individually() {
        let decoded = decode_snapshot(&json!({ "currentNumber": 4 }));
        assert!(decoded.tickets.is_empty());
        assert_eq!(decoded.current_number, Some(4));
        assert_eq!(decoded.last_number, 0);
        assert_eq!(decoded.calling_started_at, None);
        assert!(decoded.room_config.is_none());
    }

    #[test]
    fn wrong_shapes_fall_back_individually() {
        let decoded = decode_snapshot(&json!({
            "tickets": "not a list",
            "currentNumber": "seven",
            "lastNumber": 9,
            "callingStartedAt": true,
            "roomConfig": 12,
        }));
        assert!(decoded.tickets.is_empty());
        assert_eq!(decoded.current_number, None);
        assert_eq!(decoded.last_number, 9);
        assert_eq!(decoded.calling_started_at, None);
        assert!(decoded.room_config.is_none());
    }

    #[test]
    fn malformed_tickets_are_dropped_not_fatal() {
        let decoded = decode_snapshot(&json!({
            "tickets": [
                { "bogus": true },
                {
                    "id": "t-2",
                    "number": 2,
                    "name": "Bob",
                    "contact": "0812",
                    "createdAt": 1,
                    "status": "WAITING"
                }
            ],
            "lastNumber": 2,
        }));
        assert_eq!(decoded.tickets.len(), 1);
        assert_eq!(decoded.tickets[0].number, 2);
    }

    #[test]
    fn lost_counter_is_restored_from_issued_numbers() {
        let decoded = decode_snapshot(&json!({
            "tickets": [{
                "id": "t-5",
                "number": 5,
                "name": "Eve",
                "contact": "0815",
                "createdAt": 1,
                "status": "WAITING"
            }]
        }));
        assert_eq!(decoded.last_number, 5);
    }
}
