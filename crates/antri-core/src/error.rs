// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Antri queue tracker.

use thiserror::Error;

/// The primary error type used across all Antri adapter traits and core operations.
#[derive(Debug, Error)]
pub enum AntriError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Snapshot store errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Sync channel errors (connect failure, send failure, malformed frame).
    #[error("sync channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rejected local mutation input (e.g. blank name on registration).
    ///
    /// The only error class that propagates to the caller; everything on the
    /// sync and persistence paths is absorbed and logged.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
