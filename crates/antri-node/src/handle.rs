// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command surface of the node loop.
//!
//! Consoles and kiosks never touch the snapshot directly; they send typed
//! commands through a [`NodeHandle`] and the loop applies them one at a
//! time. Operator-facing commands address tickets by their public number.

use antri_core::{AntriError, QueueSnapshot};
use tokio::sync::{mpsc, oneshot};

/// A queue mutation or query, serialized through the node loop.
#[derive(Debug)]
pub enum Command {
    Register {
        name: String,
        contact: String,
        reply: oneshot::Sender<Result<u32, AntriError>>,
    },
    CallNext {
        reply: oneshot::Sender<Option<u32>>,
    },
    Call {
        number: u32,
        reply: oneshot::Sender<bool>,
    },
    Complete {
        number: u32,
        reply: oneshot::Sender<bool>,
    },
    Skip {
        number: u32,
        reply: oneshot::Sender<bool>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<QueueSnapshot>,
    },
}

/// Cloneable handle for sending commands to a running node loop.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    tx: mpsc::Sender<Command>,
}

impl NodeHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    async fn send<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<R, AntriError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| AntriError::Internal("node loop is gone".into()))?;
        reply_rx
            .await
            .map_err(|_| AntriError::Internal("node loop dropped the reply".into()))
    }

    /// Register a visitor; returns the assigned ticket number.
    pub async fn register(&self, name: &str, contact: &str) -> Result<u32, AntriError> {
        let (name, contact) = (name.to_string(), contact.to_string());
        self.send(|reply| Command::Register {
            name,
            contact,
            reply,
        })
        .await?
    }

    /// Call the first waiting ticket; returns its number, if any.
    pub async fn call_next(&self) -> Result<Option<u32>, AntriError> {
        self.send(|reply| Command::CallNext { reply }).await
    }

    /// Call a specific waiting ticket out of order.
    pub async fn call(&self, number: u32) -> Result<bool, AntriError> {
        self.send(|reply| Command::Call { number, reply }).await
    }

    /// Mark the called ticket as served.
    pub async fn complete(&self, number: u32) -> Result<bool, AntriError> {
        self.send(|reply| Command::Complete { number, reply }).await
    }

    /// Mark the called ticket as skipped (no-show).
    pub async fn skip(&self, number: u32) -> Result<bool, AntriError> {
        self.send(|reply| Command::Skip { number, reply }).await
    }

    /// Drop every ticket and restart numbering. Irreversible; confirm at
    /// the boundary before calling.
    pub async fn reset(&self) -> Result<(), AntriError> {
        self.send(|reply| Command::Reset { reply }).await
    }

    /// A copy of the current queue snapshot.
    pub async fn snapshot(&self) -> Result<QueueSnapshot, AntriError> {
        self.send(|reply| Command::Snapshot { reply }).await
    }
}
