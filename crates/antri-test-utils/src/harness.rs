// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-node test harness.
//!
//! `RoomHarness` wires any number of nodes -- each with its own temp SQLite
//! store -- into one [`MockRoom`], mirroring several devices sharing a
//! counter. Nodes can join synced or local-only, and can be restarted on
//! the same database to exercise cold-start recovery.

use std::sync::Arc;
use std::time::Duration;

use antri_config::model::StorageConfig;
use antri_core::{AntriError, SnapshotStore, SyncEvent, SyncTransport};
use antri_node::{Node, NodeHandle};
use antri_storage::SqliteStore;
use tokio_util::sync::CancellationToken;

use crate::mock_transport::{MockRoom, MockTransport};

/// One running node plus everything a test needs to poke at it.
pub struct NodeInstance {
    pub handle: NodeHandle,
    /// `None` for local-only nodes.
    pub transport: Option<Arc<MockTransport>>,
    pub storage: Arc<SqliteStore>,
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<Result<(), AntriError>>,
    synced: bool,
    _dir: tempfile::TempDir,
}

/// A room full of test nodes.
#[derive(Default)]
pub struct RoomHarness {
    room: MockRoom,
    nodes: Vec<NodeInstance>,
}

impl RoomHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node connected to the shared room. Returns its index.
    pub async fn join_node(&mut self) -> Result<usize, AntriError> {
        self.spawn_node(true).await
    }

    /// Add a node running local-only (no transport). Returns its index.
    pub async fn join_local_node(&mut self) -> Result<usize, AntriError> {
        self.spawn_node(false).await
    }

    async fn spawn_node(&mut self, synced: bool) -> Result<usize, AntriError> {
        let dir = tempfile::tempdir().map_err(|e| AntriError::Storage {
            source: Box::new(e),
        })?;
        let database_path = dir
            .path()
            .join("queue.db")
            .to_string_lossy()
            .into_owned();

        let instance = self
            .boot_instance(dir, database_path, synced)
            .await?;
        self.nodes.push(instance);
        Ok(self.nodes.len() - 1)
    }

    async fn boot_instance(
        &self,
        dir: tempfile::TempDir,
        database_path: String,
        synced: bool,
    ) -> Result<NodeInstance, AntriError> {
        let storage = Arc::new(SqliteStore::new(StorageConfig {
            database_path,
            wal_mode: true,
        }));
        storage.initialize().await?;
        let restored = storage.load().await?.unwrap_or_default();

        let transport = if synced {
            Some(Arc::new(self.room.transport().await))
        } else {
            None
        };
        let dyn_transport = transport
            .clone()
            .map(|t| t as Arc<dyn SyncTransport>);

        let (node, handle) = Node::new(
            restored,
            None,
            storage.clone() as Arc<dyn SnapshotStore>,
            dyn_transport,
            None,
        );
        let cancel = CancellationToken::new();
        let join = tokio::spawn(node.run(cancel.clone()));

        Ok(NodeInstance {
            handle,
            transport,
            storage,
            cancel,
            join,
            synced,
            _dir: dir,
        })
    }

    pub fn node(&self, index: usize) -> &NodeInstance {
        &self.nodes[index]
    }

    pub fn handle(&self, index: usize) -> &NodeHandle {
        &self.nodes[index].handle
    }

    /// The mock transport of node `index`; panics for local-only nodes.
    pub fn transport(&self, index: usize) -> &MockTransport {
        self.nodes[index]
            .transport
            .as_deref()
            .expect("node has no transport")
    }

    /// Deliver an event to every node, as if from a device outside the
    /// harness.
    pub async fn inject(&self, event: SyncEvent) {
        self.room.inject(event).await;
    }

    /// Let in-flight publishes drain through the room.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    /// Stop node `index` and boot a fresh one on the same database,
    /// exercising cold-start restore.
    pub async fn restart_node(&mut self, index: usize) -> Result<(), AntriError> {
        let NodeInstance {
            storage,
            cancel,
            join,
            synced,
            _dir: dir,
            ..
        } = self.nodes.remove(index);
        cancel.cancel();
        let _ = join.await;
        let database_path = storage.database_path().to_string();
        drop(storage);

        let instance = self.boot_instance(dir, database_path, synced).await?;
        self.nodes.insert(index, instance);
        Ok(())
    }

    /// Cancel every node and wait for the loops to finish.
    pub async fn shutdown(self) {
        for node in &self.nodes {
            node.cancel.cancel();
        }
        for node in self.nodes {
            let _ = node.join.await;
        }
    }
}
