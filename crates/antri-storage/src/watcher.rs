// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External-change notifications for the snapshot slot.
//!
//! Another local process (a second console on the same machine) may write
//! the shared database. A debounced file watcher surfaces those writes so
//! the node can reload the slot and run it through the normal
//! reconciliation path. The node filters out reloads identical to current
//! state, which also swallows the events our own saves generate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use antri_core::AntriError;
use notify_debouncer_mini::notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer, notify};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Coalescing window for bursts of file events (SQLite touches the main
/// file and the WAL separately on one commit).
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Watches the database file for writes made by other local processes.
///
/// Keep the watcher alive for as long as notifications are wanted; dropping
/// it stops the underlying OS watch.
pub struct ExternalChangeWatcher {
    rx: mpsc::Receiver<()>,
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl ExternalChangeWatcher {
    /// Start watching the database at `database_path`.
    ///
    /// The parent directory is watched non-recursively because SQLite in WAL
    /// mode writes sibling `-wal`/`-shm` files rather than the main file on
    /// most commits.
    pub fn spawn(database_path: &str) -> Result<Self, AntriError> {
        let db_path = PathBuf::from(database_path);
        let dir = db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_prefix = db_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AntriError::Storage {
                source: format!("database path `{database_path}` has no file name").into(),
            })?;

        let (tx, rx) = mpsc::channel(8);
        let mut debouncer = new_debouncer(DEBOUNCE_WINDOW, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        event
                            .path
                            .file_name()
                            .is_some_and(|n| n.to_string_lossy().starts_with(&file_prefix))
                    });
                    // try_send coalesces: one pending notification is enough,
                    // the node reloads the whole slot anyway.
                    if relevant && tx.try_send(()).is_ok() {
                        debug!("database changed on disk");
                    }
                }
                Err(e) => warn!(error = ?e, "file watcher error"),
            }
        })
        .map_err(|e| AntriError::Storage { source: Box::new(e) })?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| AntriError::Storage { source: Box::new(e) })?;

        Ok(Self {
            rx,
            _debouncer: debouncer,
        })
    }

    /// Waits for the next change notification.
    ///
    /// Pends forever once the watcher thread is gone, so this is safe to use
    /// inside a `select!` arm.
    pub async fn changed(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reports_writes_to_the_watched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");
        std::fs::write(&path, b"seed").unwrap();

        let mut watcher = ExternalChangeWatcher::spawn(path.to_str().unwrap()).unwrap();

        // Give the OS watch a moment to register before writing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"more").unwrap();
        file.sync_all().unwrap();
        drop(file);

        tokio::time::timeout(Duration::from_secs(5), watcher.changed())
            .await
            .expect("change notification");
    }

    #[tokio::test]
    async fn ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");
        std::fs::write(&path, b"seed").unwrap();

        let mut watcher = ExternalChangeWatcher::spawn(path.to_str().unwrap()).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(dir.path().join("other.txt"), b"noise").unwrap();

        let heard =
            tokio::time::timeout(Duration::from_millis(1500), watcher.changed()).await;
        assert!(heard.is_err(), "unrelated file must not notify");
    }
}
