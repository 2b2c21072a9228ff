// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The node loop: a single task owning the queue snapshot.
//!
//! Every mutation -- operator command, kiosk registration, adopted remote
//! snapshot, external slot change -- funnels through this loop, so
//! persistence and publication happen uniformly in one place and nothing
//! ever mutates the snapshot concurrently. Local mutations persist and
//! publish; adopted snapshots persist but are never re-published.
//!
//! Sync and persistence failures are absorbed here: the node degrades to
//! local-only operation and keeps serving commands. Only input validation
//! errors travel back to the caller.

pub mod handle;
pub mod reconcile;
pub mod shutdown;

use std::sync::Arc;

use antri_core::{AntriError, QueueSnapshot, RoomConfig, SnapshotStore, SyncEvent, SyncTransport};
use antri_queue::QueueStore;
use antri_storage::ExternalChangeWatcher;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use handle::{Command, NodeHandle};

/// Effective room configuration for a device.
///
/// Explicit configuration wins; otherwise the device rejoins the room
/// remembered in its persisted snapshot; otherwise it runs local-only.
pub fn resolve_room(
    configured: Option<RoomConfig>,
    restored: &QueueSnapshot,
) -> Option<RoomConfig> {
    configured.or_else(|| restored.room_config.clone())
}

/// The single-owner event loop over the queue snapshot.
pub struct Node {
    store: QueueStore,
    storage: Arc<dyn SnapshotStore>,
    transport: Option<Arc<dyn SyncTransport>>,
    watcher: Option<ExternalChangeWatcher>,
    cmd_rx: mpsc::Receiver<Command>,
}

impl Node {
    /// Assemble a node over a restored snapshot and its adapters.
    ///
    /// `storage` must already be initialized and `restored` loaded from it
    /// (or defaulted on first run). The effective `room` is written into
    /// the snapshot so the device remembers it across restarts.
    pub fn new(
        restored: QueueSnapshot,
        room: Option<RoomConfig>,
        storage: Arc<dyn SnapshotStore>,
        transport: Option<Arc<dyn SyncTransport>>,
        watcher: Option<ExternalChangeWatcher>,
    ) -> (Self, NodeHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let mut store = QueueStore::new(restored);
        if room.is_some() {
            store.set_room_config(room);
        }

        let node = Self {
            store,
            storage,
            transport,
            watcher,
            cmd_rx,
        };
        (node, NodeHandle::new(cmd_tx))
    }

    /// Runs the node loop until the cancellation token is triggered.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), AntriError> {
        info!(
            tickets = self.store.snapshot().tickets.len(),
            synced = self.transport.is_some(),
            "node loop running"
        );

        // Persist once up front so the effective room config and any restore
        // normalization reach the slot before the first mutation.
        self.persist().await;

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            debug!("all handles dropped, stopping node loop");
                            break;
                        }
                    }
                }
                event = recv_or_pend(&self.transport) => {
                    match event {
                        Ok(event) => self.handle_sync_event(event).await,
                        Err(e) => {
                            warn!(error = %e, "sync channel gone, continuing local-only");
                            self.transport = None;
                        }
                    }
                }
                _ = changed_or_pend(&mut self.watcher) => {
                    self.handle_external_change().await;
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping node loop");
                    break;
                }
            }
        }

        self.storage.close().await?;
        info!("node loop stopped");
        Ok(())
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Register {
                name,
                contact,
                reply,
            } => {
                let result = self.store.register(&name, &contact);
                if result.is_ok() {
                    self.commit().await;
                }
                let _ = reply.send(result);
            }
            Command::CallNext { reply } => {
                let called = self.store.call_next();
                if called.is_some() {
                    self.commit().await;
                }
                let _ = reply.send(called);
            }
            Command::Call { number, reply } => {
                let changed = self.transition_by_number(number, Transition::Call);
                if changed {
                    self.commit().await;
                }
                let _ = reply.send(changed);
            }
            Command::Complete { number, reply } => {
                let changed = self.transition_by_number(number, Transition::Complete);
                if changed {
                    self.commit().await;
                }
                let _ = reply.send(changed);
            }
            Command::Skip { number, reply } => {
                let changed = self.transition_by_number(number, Transition::Skip);
                if changed {
                    self.commit().await;
                }
                let _ = reply.send(changed);
            }
            Command::Reset { reply } => {
                self.store.reset();
                self.commit().await;
                let _ = reply.send(());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.store.snapshot().clone());
            }
        }
    }

    fn transition_by_number(&mut self, number: u32, transition: Transition) -> bool {
        let Some(id) = self.store.find_by_number(number).map(|t| t.id.clone()) else {
            debug!(number, "no such ticket");
            return false;
        };
        match transition {
            Transition::Call => self.store.call(&id),
            Transition::Complete => self.store.complete(&id),
            Transition::Skip => self.store.skip(&id),
        }
    }

    async fn handle_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::QueueUpdate(payload) => {
                reconcile::adopt_remote(&mut self.store, payload);
                // Persist the adopted truth, but never re-publish it.
                self.persist().await;
            }
            SyncEvent::RequestSync => {
                // Only peers actually holding state answer, so an empty
                // late joiner cannot blank out the room.
                if self.store.snapshot().tickets.is_empty() {
                    debug!("request-sync ignored, no local state to offer");
                    return;
                }
                self.publish().await;
            }
        }
    }

    async fn handle_external_change(&mut self) {
        let reloaded = match self.storage.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "failed to reload externally changed slot");
                return;
            }
        };
        if reconcile::adopt_external(&mut self.store, &reloaded) {
            info!("adopted snapshot written by another local process");
            // Already durable; adopted external changes are not re-published
            // either, same as remote snapshots.
        }
    }

    /// Persist, then publish: the uniform tail of every local mutation.
    async fn commit(&mut self) {
        self.persist().await;
        self.publish().await;
    }

    async fn persist(&mut self) {
        if let Err(e) = self.storage.save(self.store.snapshot()).await {
            warn!(error = %e, "snapshot save failed, continuing in-memory");
        }
    }

    async fn publish(&mut self) {
        if let Some(transport) = &self.transport
            && let Err(e) = transport.publish(&self.store.snapshot().payload()).await
        {
            warn!(error = %e, "snapshot publish failed, peers will catch up on next sync");
        }
    }
}

enum Transition {
    Call,
    Complete,
    Skip,
}

/// Receive from the transport, or pend forever in local-only mode so the
/// select arm simply never fires.
async fn recv_or_pend(
    transport: &Option<Arc<dyn SyncTransport>>,
) -> Result<SyncEvent, AntriError> {
    match transport {
        Some(transport) => transport.recv().await,
        None => futures::future::pending().await,
    }
}

/// Wait for an external slot change, or pend forever without a watcher.
async fn changed_or_pend(watcher: &mut Option<ExternalChangeWatcher>) {
    match watcher {
        Some(watcher) => watcher.changed().await,
        None => futures::future::pending().await,
    }
}
