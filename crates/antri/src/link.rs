// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `antri link` command implementation.
//!
//! Prints the shareable join link for this device's room. The link carries
//! the room id (and optionally a requested view) -- never the credential.

use antri_config::{AntriConfig, ViewMode, share_link};
use antri_core::{AntriError, SnapshotStore};
use antri_storage::SqliteStore;

/// Runs the `antri link` command.
pub async fn run_link(config: &AntriConfig, view: Option<&str>) -> Result<(), AntriError> {
    let view = view
        .map(|v| {
            v.parse::<ViewMode>().map_err(|_| {
                AntriError::InvalidInput(format!(
                    "unknown view `{v}` (expected register, display, or operator)"
                ))
            })
        })
        .transpose()?;

    // Configured room wins; otherwise the room this device last joined.
    let room_id = match config.sync.room_id.clone() {
        Some(room_id) => room_id,
        None => {
            let storage = SqliteStore::new(config.storage.clone());
            storage.initialize().await?;
            let persisted = storage.load().await?.unwrap_or_default();
            storage.close().await?;
            persisted
                .room_config
                .map(|r| r.room_id)
                .ok_or_else(|| {
                    AntriError::Config(
                        "no room to share: set sync.room_id or join a room first".into(),
                    )
                })?
        }
    };

    println!("{}", share_link(&config.link.base_url, &room_id, view)?);
    Ok(())
}
