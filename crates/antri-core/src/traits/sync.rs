// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sync channel trait: a room-scoped, best-effort broadcast topic.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::AntriError;
use crate::traits::adapter::Adapter;
use crate::types::{ConnectionState, SnapshotPayload, SyncEvent};

/// A room-scoped broadcast channel carrying full-state snapshots.
///
/// The channel provides no ordering, no deduplication, and no delivery
/// guarantee; tolerating out-of-order and duplicate events is the
/// reconciliation policy's job. Reconnection after transient failure is the
/// transport's responsibility, surfaced only through [`status`].
///
/// [`status`]: SyncTransport::status
#[async_trait]
pub trait SyncTransport: Adapter {
    /// Stream of connection state changes for operator awareness.
    fn status(&self) -> watch::Receiver<ConnectionState>;

    /// Fire-and-forget push of the full snapshot to all room subscribers.
    ///
    /// Silently dropped while the channel is not `Connected`; mutations made
    /// offline survive only through local persistence, there is no outbound
    /// retry buffer.
    async fn publish(&self, payload: &SnapshotPayload) -> Result<(), AntriError>;

    /// Broadcast a lightweight "who has state" signal.
    ///
    /// Implementations also emit this automatically exactly once shortly
    /// after each (re)connect, to bootstrap a newly joined device.
    async fn request_sync(&self) -> Result<(), AntriError>;

    /// Receives the next inbound event from the room.
    async fn recv(&self) -> Result<SyncEvent, AntriError>;
}
