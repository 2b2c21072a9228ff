// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as endpoint schemes and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::AntriConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AntriConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.display.call_window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "display.call_window_secs must be at least 1".to_string(),
        });
    }

    // An incomplete [sync] section is almost always a typo'd deployment;
    // refusing it beats silently running local-only.
    if config.sync.is_partial() {
        errors.push(ConfigError::Validation {
            message: "sync requires endpoint, credential, and room_id together; \
                      remove the section for local-only mode or complete it"
                .to_string(),
        });
    }

    if let Some(endpoint) = &config.sync.endpoint
        && !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://"))
    {
        errors.push(ConfigError::Validation {
            message: format!("sync.endpoint `{endpoint}` must use a ws:// or wss:// scheme"),
        });
    }

    if let Some(room_id) = &config.sync.room_id {
        let well_formed = !room_id.is_empty()
            && room_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            errors.push(ConfigError::Validation {
                message: format!(
                    "sync.room_id `{room_id}` may only contain letters, digits, `-`, and `_`"
                ),
            });
        }
    }

    if url::Url::parse(&config.link.base_url).is_err() {
        errors.push(ConfigError::Validation {
            message: format!("link.base_url `{}` is not a valid URL", config.link.base_url),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
