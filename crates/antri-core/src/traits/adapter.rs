// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every pluggable adapter.

use async_trait::async_trait;

use crate::error::AntriError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, lifecycle, and health checks common to all adapters.
#[async_trait]
pub trait Adapter: Send + Sync + 'static {
    /// Human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// The kind of adapter (transport, storage).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and reports the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, AntriError>;

    /// Gracefully shuts down the adapter, releasing held resources.
    async fn shutdown(&self) -> Result<(), AntriError>;
}
