// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the pluggable edges of the sync core.
//!
//! The node loop only ever talks to a [`SyncTransport`] and a
//! [`SnapshotStore`]; both extend the [`Adapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod store;
pub mod sync;

pub use adapter::Adapter;
pub use store::SnapshotStore;
pub use sync::SyncTransport;
