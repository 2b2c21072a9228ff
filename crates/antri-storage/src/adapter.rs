// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SnapshotStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use antri_config::model::StorageConfig;
use antri_core::{
    Adapter, AdapterType, AntriError, HealthStatus, QueueSnapshot, SnapshotStore,
};

use crate::database::Database;
use crate::queries;
use crate::restore;

/// Fixed slot key holding the queue snapshot document.
pub const SNAPSHOT_KEY: &str = "queue_state";

/// SQLite-backed snapshot store.
///
/// Wraps a [`Database`] handle; the connection is lazily opened on the
/// first call to [`SnapshotStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SnapshotStore::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    pub fn database_path(&self) -> &str {
        &self.config.database_path
    }

    fn db(&self) -> Result<&Database, AntriError> {
        self.db.get().ok_or_else(|| AntriError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Adapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AntriError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AntriError> {
        if self.db.get().is_some() {
            self.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn initialize(&self) -> Result<(), AntriError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AntriError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite snapshot store initialized");
        Ok(())
    }

    async fn save(&self, snapshot: &QueueSnapshot) -> Result<(), AntriError> {
        let document = serde_json::to_string(snapshot)
            .map_err(|e| AntriError::Storage { source: Box::new(e) })?;
        queries::snapshot::write_slot(self.db()?, SNAPSHOT_KEY, document).await
    }

    async fn load(&self) -> Result<Option<QueueSnapshot>, AntriError> {
        let Some(document) = queries::snapshot::read_slot(self.db()?, SNAPSHOT_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<serde_json::Value>(&document) {
            Ok(value) => Ok(Some(restore::decode_snapshot(&value))),
            Err(e) => {
                // A corrupt slot degrades to an empty queue, never a failure.
                warn!(error = %e, "persisted snapshot is not valid JSON, starting empty");
                Ok(Some(QueueSnapshot::default()))
            }
        }
    }

    async fn close(&self) -> Result<(), AntriError> {
        let db = self.db()?;
        // Checkpoint WAL before releasing the connection.
        db.connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
