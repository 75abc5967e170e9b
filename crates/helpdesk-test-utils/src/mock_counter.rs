// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counter with inspectable state and a forced-failure mode.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use helpdesk_core::traits::{CounterAdapter, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus};
use helpdesk_core::HelpdeskError;

#[derive(Default)]
pub struct MockCounter {
    counts: Mutex<HashMap<String, u64>>,
    fail: bool,
}

impl MockCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Keys incremented so far, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.counts.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn value(&self, key: &str) -> u64 {
        self.counts.lock().unwrap().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PluginAdapter for MockCounter {
    fn name(&self) -> &str {
        "mock-counter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Counter
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl CounterAdapter for MockCounter {
    async fn incr(&self, key: &str) -> Result<u64, HelpdeskError> {
        if self.fail {
            return Err(HelpdeskError::Counter {
                message: "mock counter unavailable".into(),
                source: None,
            });
        }
        let mut counts = self.counts.lock().unwrap();
        let value = counts.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}
