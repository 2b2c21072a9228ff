// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared wiring for the long-running commands: storage, transport,
//! watcher, node loop.

use std::sync::Arc;

use antri_config::AntriConfig;
use antri_core::{
    AntriError, ConnectionState, RoomConfig, SnapshotStore, SyncTransport,
};
use antri_node::{Node, NodeHandle};
use antri_storage::{ExternalChangeWatcher, SqliteStore};
use antri_sync::WsSyncTransport;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A node loop running in the background, plus the pieces commands need.
pub struct RunningNode {
    pub handle: NodeHandle,
    /// Connection status stream; `None` in local-only mode.
    pub status: Option<watch::Receiver<ConnectionState>>,
    pub room: Option<RoomConfig>,
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<Result<(), AntriError>>,
}

impl RunningNode {
    /// Stop the loop and wait for storage to checkpoint.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.join.await;
    }
}

/// Initialize storage, resolve the room, and start the node loop.
///
/// `join_link` overrides the configured room id; the endpoint and
/// credential still come from `[sync]`, since links never carry secrets.
pub async fn start_node(
    config: &AntriConfig,
    join_link: Option<&str>,
    cancel: CancellationToken,
) -> Result<RunningNode, AntriError> {
    let storage = Arc::new(SqliteStore::new(config.storage.clone()));
    storage.initialize().await?;
    let restored = storage.load().await?.unwrap_or_default();

    let mut configured = config.sync.room();
    if let Some(link) = join_link {
        let parsed = antri_config::parse_join_link(link)?;
        match (&config.sync.endpoint, &config.sync.credential) {
            (Some(endpoint), Some(credential)) => {
                configured = Some(RoomConfig {
                    endpoint: endpoint.clone(),
                    credential: credential.clone(),
                    room_id: parsed.room_id,
                });
            }
            _ => {
                return Err(AntriError::Config(
                    "join links carry no secrets; set sync.endpoint and sync.credential first"
                        .into(),
                ));
            }
        }
    }

    let room = antri_node::resolve_room(configured, &restored);
    match &room {
        Some(room) => info!(room = %room.room_id, "joining synchronized room"),
        None => info!("no room configured, running local-only"),
    }

    let (transport, status) = match &room {
        Some(room) => {
            let transport = WsSyncTransport::spawn(room.clone());
            let status = transport.status();
            (
                Some(Arc::new(transport) as Arc<dyn SyncTransport>),
                Some(status),
            )
        }
        None => (None, None),
    };

    // A second console on this machine may write the same database; watch
    // for it. Losing the watcher is not fatal.
    let watcher = match ExternalChangeWatcher::spawn(&config.storage.database_path) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "external change watcher unavailable");
            None
        }
    };

    let (node, handle) = Node::new(
        restored,
        room.clone(),
        storage as Arc<dyn SnapshotStore>,
        transport,
        watcher,
    );
    let join = tokio::spawn(node.run(cancel.clone()));

    Ok(RunningNode {
        handle,
        status,
        room,
        cancel,
        join,
    })
}

/// Short wire form of the current connection state for prompts and boards.
pub fn status_label(status: &Option<watch::Receiver<ConnectionState>>) -> String {
    match status {
        Some(rx) => rx.borrow().to_string(),
        None => "LOCAL".to_string(),
    }
}

/// Two-digit ticket rendering used on boards and printed tickets.
pub fn format_ticket_number(number: u32) -> String {
    format!("{number:02}")
}
