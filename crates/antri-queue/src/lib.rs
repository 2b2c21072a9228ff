// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue domain logic for the Antri tracker: the ticket store with its
//! sequence allocator, and the derived call-window countdown.
//!
//! This crate is pure state manipulation -- no I/O, no channels. The node
//! loop owns a [`QueueStore`] and drives persistence and publication around
//! it.

pub mod store;
pub mod timer;

pub use store::QueueStore;
pub use timer::{DEFAULT_CALL_WINDOW_SECS, remaining_in, remaining_secs};
