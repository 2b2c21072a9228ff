// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Antri workspace: an in-memory mock of the sync
//! channel and a multi-node room harness for end-to-end tests.

pub mod harness;
pub mod mock_transport;

pub use harness::{NodeInstance, RoomHarness};
pub use mock_transport::{MockRoom, MockTransport};
