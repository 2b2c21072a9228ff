// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Antri workspace.
//!
//! All wire-facing structs serialize with camelCase field names and
//! SCREAMING_SNAKE_CASE status values so that snapshots are byte-compatible
//! with what other devices in a room emit and with previously persisted
//! state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a ticket, assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

/// Lifecycle state of a single ticket.
///
/// `Waiting` is initial; `Completed` and `Skipped` are terminal. The only
/// legal transitions are `Waiting -> Calling` and
/// `Calling -> Completed | Skipped`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Waiting,
    Calling,
    Completed,
    Skipped,
}

/// One visitor's queue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    /// Positive sequence number, unique within a queue epoch.
    pub number: u32,
    pub name: String,
    pub contact: String,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    pub status: TicketStatus,
}

/// Connection parameters for a synchronized room.
///
/// All three fields must be present for multi-device sync; absence of any
/// of them means the device runs in isolated local mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    /// Sync relay address (`ws://` or `wss://`).
    pub endpoint: String,
    /// Auth token presented to the relay. Never carried in join links.
    pub credential: String,
    /// Logical room name; devices sharing it see the same queue.
    pub room_id: String,
}

impl RoomConfig {
    /// Broadcast topic for this room, derived deterministically from the id.
    pub fn topic(&self) -> String {
        format!("room-{}", self.room_id)
    }
}

/// The complete queue state at an instant: the unit of persistence.
///
/// Never partially persisted -- every save writes the whole snapshot,
/// including the optional room configuration (which stays local and is
/// stripped from the wire payload).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueSnapshot {
    /// All tickets in insertion order (not display order).
    pub tickets: Vec<Ticket>,
    /// Number of the ticket currently (or last) served.
    pub current_number: Option<u32>,
    /// Highest number issued so far; drives the sequence allocator.
    pub last_number: u32,
    /// When the current `Calling` ticket was called, epoch milliseconds.
    pub calling_started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_config: Option<RoomConfig>,
}

impl QueueSnapshot {
    /// The replicated subset of this snapshot, as sent over the channel.
    pub fn payload(&self) -> SnapshotPayload {
        SnapshotPayload {
            tickets: self.tickets.clone(),
            current_number: self.current_number,
            last_number: self.last_number,
            calling_started_at: self.calling_started_at,
        }
    }
}

/// The replicated subset of the queue state: the unit of synchronization.
///
/// `tickets` and `lastNumber` are required on inbound decode; a payload
/// missing either is malformed and gets discarded by reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub current_number: Option<u32>,
    pub last_number: u32,
    #[serde(default)]
    pub calling_started_at: Option<i64>,
}

/// Events exchanged over the sync channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncEvent {
    /// Full-state push, emitted on every local mutation.
    QueueUpdate(SnapshotPayload),
    /// Bootstrap "who has state" signal; peers with non-empty queues answer
    /// with a `QueueUpdate`.
    RequestSync,
}

/// Observable state of the sync channel connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Transport,
    Storage,
}

/// Current wall-clock time as epoch milliseconds.
///
/// Timestamps are kept in epoch-ms form end to end so snapshots stay
/// comparable across devices regardless of their local time zone.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
