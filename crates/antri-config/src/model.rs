// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Antri queue tracker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use antri_core::RoomConfig;
use serde::{Deserialize, Serialize};

/// Top-level Antri configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; with no `[sync]` section the device runs local-only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AntriConfig {
    /// Device identity and logging.
    #[serde(default)]
    pub node: NodeConfig,

    /// Sync relay connection. Incomplete or absent means local-only mode.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Local snapshot storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Display tuning (call window, list sizes).
    #[serde(default)]
    pub display: DisplayConfig,

    /// Join-by-link settings.
    #[serde(default)]
    pub link: LinkConfig,
}

/// Device identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Display name of this device, used in logs.
    #[serde(default = "default_node_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_node_name() -> String {
    "antri".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Sync relay connection configuration.
///
/// All three fields must be present for multi-device sync; `room()` returns
/// `None` otherwise and the node never attempts a connection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Relay address (`ws://` or `wss://`).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Auth token for the relay. Supplied once per device; join links never
    /// carry it.
    #[serde(default)]
    pub credential: Option<String>,

    /// Logical room name shared by every device of one counter.
    #[serde(default)]
    pub room_id: Option<String>,
}

impl SyncConfig {
    /// The effective room configuration, or `None` in local-only mode.
    pub fn room(&self) -> Option<RoomConfig> {
        match (&self.endpoint, &self.credential, &self.room_id) {
            (Some(endpoint), Some(credential), Some(room_id)) => Some(RoomConfig {
                endpoint: endpoint.clone(),
                credential: credential.clone(),
                room_id: room_id.clone(),
            }),
            _ => None,
        }
    }

    /// True when at least one field is set (used to flag incomplete setups).
    pub fn is_partial(&self) -> bool {
        self.room().is_none()
            && (self.endpoint.is_some() || self.credential.is_some() || self.room_id.is_some())
    }
}

/// Local snapshot storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("antri").join("antri.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("antri.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Display tuning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Call window in seconds before a called ticket counts as overdue.
    #[serde(default = "default_call_window_secs")]
    pub call_window_secs: u32,

    /// How many upcoming tickets the display board lists.
    #[serde(default = "default_next_up")]
    pub next_up: usize,

    /// How many completed tickets the operator history strip keeps.
    #[serde(default = "default_history")]
    pub history: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            call_window_secs: default_call_window_secs(),
            next_up: default_next_up(),
            history: default_history(),
        }
    }
}

fn default_call_window_secs() -> u32 {
    120
}

fn default_next_up() -> usize {
    5
}

fn default_history() -> usize {
    15
}

/// Join-by-link configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    /// Base URL that shared join links are built on.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://antri.local".to_string()
}
