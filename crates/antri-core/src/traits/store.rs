// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot store trait: the single-slot local persistence bridge.

use async_trait::async_trait;

use crate::error::AntriError;
use crate::traits::adapter::Adapter;
use crate::types::QueueSnapshot;

/// Durable single-slot storage for the complete queue snapshot.
///
/// Persistence is local-only cold-start recovery for one device; it is not
/// a synchronization mechanism. Saves always write the whole snapshot,
/// never a diff.
#[async_trait]
pub trait SnapshotStore: Adapter {
    /// Initializes the backing store (migrations, connection).
    async fn initialize(&self) -> Result<(), AntriError>;

    /// Serializes and writes the full snapshot to the durable slot.
    async fn save(&self, snapshot: &QueueSnapshot) -> Result<(), AntriError>;

    /// Reads the slot back, or `None` on first run.
    ///
    /// Fields absent or malformed in the stored payload fall back to their
    /// defaults individually; a corrupt document never fails the load.
    async fn load(&self) -> Result<Option<QueueSnapshot>, AntriError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), AntriError>;
}
