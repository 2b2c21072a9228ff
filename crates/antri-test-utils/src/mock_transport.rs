// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory sync channel for deterministic testing.
//!
//! [`MockRoom`] is the relay: every [`MockTransport`] created from it joins
//! the same topic, and publishes fan out to every member except the sender
//! (a relay does not echo). Tests can flip a transport's connection state
//! and inspect everything it published.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc, watch};

use antri_core::{
    Adapter, AdapterType, AntriError, ConnectionState, HealthStatus, SnapshotPayload, SyncEvent,
    SyncTransport,
};

struct Member {
    id: usize,
    tx: mpsc::Sender<SyncEvent>,
}

/// An in-memory broadcast room connecting any number of mock transports.
#[derive(Clone, Default)]
pub struct MockRoom {
    members: Arc<Mutex<Vec<Member>>>,
}

impl MockRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the room with a new transport, initially `Connected`.
    pub async fn transport(&self) -> MockTransport {
        let (tx, rx) = mpsc::channel(64);
        let mut members = self.members.lock().await;
        let id = members.len();
        members.push(Member { id, tx });

        let (status_tx, status_rx) = watch::channel(ConnectionState::Connected);
        MockTransport {
            id,
            members: self.members.clone(),
            status_tx,
            status_rx,
            inbound: Mutex::new(rx),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Deliver an event to every member, as if sent by a peer outside the
    /// harness (a "ghost" device).
    pub async fn inject(&self, event: SyncEvent) {
        for member in self.members.lock().await.iter() {
            let _ = member.tx.send(event.clone()).await;
        }
    }
}

/// A mock [`SyncTransport`] wired to a [`MockRoom`].
pub struct MockTransport {
    id: usize,
    members: Arc<Mutex<Vec<Member>>>,
    status_tx: watch::Sender<ConnectionState>,
    status_rx: watch::Receiver<ConnectionState>,
    inbound: Mutex<mpsc::Receiver<SyncEvent>>,
    published: Mutex<Vec<SnapshotPayload>>,
}

impl MockTransport {
    /// Flip the observable connection state (e.g. to simulate an outage).
    pub fn set_status(&self, state: ConnectionState) {
        self.status_tx.send_replace(state);
    }

    /// Every payload this transport published, in order.
    pub async fn published(&self) -> Vec<SnapshotPayload> {
        self.published.lock().await.clone()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.lock().await.len()
    }

    fn connected(&self) -> bool {
        *self.status_rx.borrow() == ConnectionState::Connected
    }

    async fn fan_out(&self, event: SyncEvent) {
        for member in self.members.lock().await.iter() {
            if member.id != self.id {
                let _ = member.tx.send(event.clone()).await;
            }
        }
    }
}

#[async_trait]
impl Adapter for MockTransport {
    fn name(&self) -> &str {
        "mock-sync"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, AntriError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AntriError> {
        Ok(())
    }
}

#[async_trait]
impl SyncTransport for MockTransport {
    fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status_rx.clone()
    }

    async fn publish(&self, payload: &SnapshotPayload) -> Result<(), AntriError> {
        if !self.connected() {
            // Best-effort contract: offline publishes vanish.
            return Ok(());
        }
        self.published.lock().await.push(payload.clone());
        self.fan_out(SyncEvent::QueueUpdate(payload.clone())).await;
        Ok(())
    }

    async fn request_sync(&self) -> Result<(), AntriError> {
        if !self.connected() {
            return Ok(());
        }
        self.fan_out(SyncEvent::RequestSync).await;
        Ok(())
    }

    async fn recv(&self) -> Result<SyncEvent, AntriError> {
        let mut rx = self.inbound.lock().await;
        rx.recv().await.ok_or_else(|| AntriError::Channel {
            message: "mock room closed".into(),
            source: None,
        })
    }
}
