// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared counter store trait.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;

/// An increment-and-read counter keyed by string.
#[async_trait]
pub trait CounterAdapter: PluginAdapter {
    /// Atomically increments `key` and returns the new value. A missing key
    /// starts at zero, so the first call returns 1.
    async fn incr(&self, key: &str) -> Result<u64, HelpdeskError>;
}
