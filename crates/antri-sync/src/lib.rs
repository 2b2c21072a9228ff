// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket sync channel for the Antri queue tracker.
//!
//! Implements [`SyncTransport`] over a room-scoped relay: a background IO
//! task owns the socket, reconnects with doubling backoff, joins the room
//! topic on every connect, and emits a bootstrap `request-sync` shortly
//! after. Publishes are fire-and-forget and silently dropped while
//! disconnected; nothing on this path can take the process down.

pub mod protocol;

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use antri_core::{
    Adapter, AdapterType, AntriError, ConnectionState, HealthStatus, RoomConfig, SnapshotPayload,
    SyncEvent, SyncTransport,
};

use crate::protocol::Frame;

/// Delay between reaching `Connected` and the automatic bootstrap
/// `request-sync`, giving the relay time to finish subscription setup.
const BOOTSTRAP_SYNC_DELAY: Duration = Duration::from_millis(750);

/// First reconnect delay; doubles up to [`MAX_RECONNECT_DELAY`].
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// WebSocket-backed sync channel.
///
/// Created with [`spawn`], which starts the IO task immediately; the
/// connection lives until [`Adapter::shutdown`] or drop.
///
/// [`spawn`]: WsSyncTransport::spawn
pub struct WsSyncTransport {
    room: RoomConfig,
    status_rx: watch::Receiver<ConnectionState>,
    inbound_rx: Mutex<mpsc::Receiver<SyncEvent>>,
    outbound_tx: mpsc::Sender<Frame>,
    cancel: CancellationToken,
}

impl WsSyncTransport {
    /// Starts the IO task for `room` and returns the channel handle.
    pub fn spawn(room: RoomConfig) -> Self {
        let (status_tx, status_rx) = watch::channel(ConnectionState::Connecting);
        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();

        tokio::spawn(io_task(
            room.clone(),
            status_tx,
            inbound_tx,
            outbound_rx,
            cancel.clone(),
        ));

        Self {
            room,
            status_rx,
            inbound_rx: Mutex::new(inbound_rx),
            outbound_tx,
            cancel,
        }
    }

    fn connected(&self) -> bool {
        *self.status_rx.borrow() == ConnectionState::Connected
    }

    /// Queue a frame for the IO task, dropping it silently when the channel
    /// is down or the queue is full (best-effort contract).
    fn send_best_effort(&self, frame: Frame) {
        if !self.connected() {
            debug!("dropping outbound frame while disconnected");
            return;
        }
        if self.outbound_tx.try_send(frame).is_err() {
            debug!("outbound queue full or closed, frame dropped");
        }
    }
}

impl Drop for WsSyncTransport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl Adapter for WsSyncTransport {
    fn name(&self) -> &str {
        "ws-sync"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, AntriError> {
        Ok(match *self.status_rx.borrow() {
            ConnectionState::Connected => HealthStatus::Healthy,
            ConnectionState::Connecting => HealthStatus::Degraded("connecting".into()),
            ConnectionState::Disconnected => HealthStatus::Unhealthy("disconnected".into()),
        })
    }

    async fn shutdown(&self) -> Result<(), AntriError> {
        debug!("sync channel shutting down");
        self.cancel.cancel();
        Ok(())
    }
}

#[async_trait]
impl SyncTransport for WsSyncTransport {
    fn status(&self) -> watch::Receiver<ConnectionState> {
        self.status_rx.clone()
    }

    async fn publish(&self, payload: &SnapshotPayload) -> Result<(), AntriError> {
        self.send_best_effort(Frame::Broadcast {
            topic: self.room.topic(),
            event: SyncEvent::QueueUpdate(payload.clone()),
        });
        Ok(())
    }

    async fn request_sync(&self) -> Result<(), AntriError> {
        self.send_best_effort(Frame::Broadcast {
            topic: self.room.topic(),
            event: SyncEvent::RequestSync,
        });
        Ok(())
    }

    async fn recv(&self) -> Result<SyncEvent, AntriError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| AntriError::Channel {
            message: "sync channel closed".into(),
            source: None,
        })
    }
}

/// Connect-and-reconnect loop. Owns the socket for the transport's life.
async fn io_task(
    room: RoomConfig,
    status_tx: watch::Sender<ConnectionState>,
    inbound_tx: mpsc::Sender<SyncEvent>,
    mut outbound_rx: mpsc::Receiver<Frame>,
    cancel: CancellationToken,
) {
    let mut delay = INITIAL_RECONNECT_DELAY;

    loop {
        status_tx.send_replace(ConnectionState::Connecting);

        match tokio_tungstenite::connect_async(room.endpoint.as_str()).await {
            Ok((socket, _)) => {
                info!(endpoint = %room.endpoint, topic = %room.topic(), "sync channel connected");
                delay = INITIAL_RECONNECT_DELAY;
                let ended = run_connection(
                    socket,
                    &room,
                    &status_tx,
                    &inbound_tx,
                    &mut outbound_rx,
                    &cancel,
                )
                .await;
                if let Err(e) = ended {
                    warn!(error = %e, "sync connection lost");
                }
            }
            Err(e) => {
                warn!(endpoint = %room.endpoint, error = %e, "sync connect failed");
            }
        }

        status_tx.send_replace(ConnectionState::Disconnected);

        if cancel.is_cancelled() {
            return;
        }
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = (delay * 2).min(MAX_RECONNECT_DELAY);
    }
}

/// Drive one established connection until it drops or shutdown.
async fn run_connection(
    socket: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    room: &RoomConfig,
    status_tx: &watch::Sender<ConnectionState>,
    inbound_tx: &mpsc::Sender<SyncEvent>,
    outbound_rx: &mut mpsc::Receiver<Frame>,
    cancel: &CancellationToken,
) -> Result<(), AntriError> {
    let topic = room.topic();
    let (mut sink, mut stream) = socket.split();

    sink.send(Message::text(protocol::encode(&Frame::Join {
        topic: topic.clone(),
        credential: room.credential.clone(),
    })))
    .await
    .map_err(send_err)?;

    status_tx.send_replace(ConnectionState::Connected);

    // One bootstrap request-sync per (re)connect, to pull state into a
    // freshly joined device.
    let bootstrap = tokio::time::sleep(BOOTSTRAP_SYNC_DELAY);
    tokio::pin!(bootstrap);
    let mut bootstrap_pending = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return Ok(());
            }
            _ = &mut bootstrap, if bootstrap_pending => {
                bootstrap_pending = false;
                sink.send(Message::text(protocol::encode(&Frame::Broadcast {
                    topic: topic.clone(),
                    event: SyncEvent::RequestSync,
                })))
                .await
                .map_err(send_err)?;
                debug!("bootstrap request-sync sent");
            }
            Some(frame) = outbound_rx.recv() => {
                sink.send(Message::text(protocol::encode(&frame)))
                    .await
                    .map_err(send_err)?;
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(text.as_str(), &topic, inbound_tx).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(AntriError::Channel {
                            message: "relay closed the connection".into(),
                            source: None,
                        });
                    }
                    // Ping/pong handled inside tungstenite; ignore binary.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(AntriError::Channel {
                            message: format!("socket read failed: {e}"),
                            source: Some(Box::new(e)),
                        });
                    }
                }
            }
        }
    }
}

/// Dispatch one inbound text frame; only broadcasts for our topic surface.
async fn handle_text(text: &str, topic: &str, inbound_tx: &mpsc::Sender<SyncEvent>) {
    match protocol::decode(text) {
        Some(Frame::Broadcast {
            topic: frame_topic,
            event,
        }) if frame_topic == topic => {
            if inbound_tx.send(event).await.is_err() {
                warn!("inbound queue closed, dropping sync event");
            }
        }
        Some(Frame::Broadcast {
            topic: frame_topic, ..
        }) => {
            debug!(topic = %frame_topic, "ignoring broadcast for foreign topic");
        }
        Some(Frame::Join { .. }) => {
            debug!("ignoring unexpected join frame from relay");
        }
        None => {}
    }
}

fn send_err(e: tokio_tungstenite::tungstenite::Error) -> AntriError {
    AntriError::Channel {
        message: format!("socket send failed: {e}"),
        source: Some(Box::new(e)),
    }
}
