// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes; the
//! `Database` struct IS the single writer. Query modules accept `&Database`
//! and call through `conn.call()`.

use std::path::Path;

use antri_core::AntriError;
use tracing::debug;

/// Handle to the single SQLite connection, shared by all query modules.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs pending migrations.
    ///
    /// Migrations run on a short-lived blocking connection before the
    /// background writer starts; this happens once at startup, before any
    /// async work is in flight.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, AntriError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| AntriError::Storage { source: Box::new(e) })?;
        }

        {
            let mut setup = rusqlite::Connection::open(path)
                .map_err(|e| AntriError::Storage { source: Box::new(e) })?;
            if wal_mode {
                // journal_mode=WAL is persistent in the database file.
                setup
                    .execute_batch("PRAGMA journal_mode=WAL;")
                    .map_err(|e| AntriError::Storage { source: Box::new(e) })?;
            }
            crate::migrations::run_migrations(&mut setup)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AntriError::Storage { source: Box::new(e) })?;
        conn.call(|conn| {
            conn.execute_batch("PRAGMA synchronous=NORMAL;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Map a tokio-rusqlite error into the shared storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> AntriError {
    AntriError::Storage {
        source: Box::new(e),
    }
}
