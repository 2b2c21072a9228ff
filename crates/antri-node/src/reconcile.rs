// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconciliation policy for inbound snapshots.
//!
//! Last-writer-wins: a well-formed inbound snapshot unconditionally becomes
//! the new local truth, whichever peer it came from. There is no version
//! counter or logical clock; two operators acting near-simultaneously on
//! two devices race, and the snapshot processed last wins. Malformed
//! payloads never reach this module -- they are discarded where frames are
//! decoded.
//!
//! Adopted snapshots are persisted by the caller but never re-published,
//! which keeps a room of peers from amplifying each other's echoes.

use antri_core::{QueueSnapshot, SnapshotPayload};
use antri_queue::QueueStore;
use tracing::debug;

/// Adopt a snapshot received from a room peer.
pub fn adopt_remote(store: &mut QueueStore, payload: SnapshotPayload) {
    store.adopt(payload);
}

/// Adopt a snapshot another local process wrote to the shared slot.
///
/// Returns `false` when the slot matches current state, which both filters
/// the events our own saves generate and breaks reload feedback loops.
pub fn adopt_external(store: &mut QueueStore, reloaded: &QueueSnapshot) -> bool {
    let payload = reloaded.payload();
    if payload == store.snapshot().payload() {
        debug!("external change matches current state, ignoring");
        return false;
    }
    store.adopt(payload);
    true
}
