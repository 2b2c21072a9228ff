// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Antri queue tracker.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, a single durable
//! slot holding the full queue snapshot as one JSON document, and a
//! debounced watcher surfacing writes made by other local processes.
//!
//! Persistence here is cold-start recovery for one device only; it is not a
//! synchronization mechanism.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod restore;
pub mod watcher;

pub use adapter::{SNAPSHOT_KEY, SqliteStore};
pub use database::Database;
pub use watcher::ExternalChangeWatcher;
