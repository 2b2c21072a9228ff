// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./antri.toml` > `~/.config/antri/antri.toml`
//! > `/etc/antri/antri.toml`, with environment variable overrides via the
//! `ANTRI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AntriConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/antri/antri.toml` (system-wide)
/// 3. `~/.config/antri/antri.toml` (user XDG config)
/// 4. `./antri.toml` (local directory)
/// 5. `ANTRI_*` environment variables
pub fn load_config() -> Result<AntriConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AntriConfig::default()))
        .merge(Toml::file("/etc/antri/antri.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("antri/antri.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("antri.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AntriConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AntriConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AntriConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AntriConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ANTRI_SYNC_ROOM_ID` must map to
/// `sync.room_id`, not `sync.room.id`.
fn env_provider() -> Env {
    Env::prefixed("ANTRI_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: ANTRI_STORAGE_DATABASE_PATH -> "storage_database_path"
        let mapped = key
            .as_str()
            .replacen("node_", "node.", 1)
            .replacen("sync_", "sync.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("display_", "display.", 1)
            .replacen("link_", "link.", 1);
        mapped.into()
    })
}
