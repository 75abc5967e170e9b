// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by every injected collaborator.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health and lifecycle for an adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError>;

    /// Releases any held resources.
    async fn shutdown(&self) -> Result<(), HelpdeskError>;
}
