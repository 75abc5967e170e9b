// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier that records instead of sending.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use helpdesk_core::traits::{NotifierAdapter, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus, Notification};
use helpdesk_core::HelpdeskError;

#[derive(Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails, but the attempt is still recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of notifications delivered (or attempted) so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| n.recipient == recipient)
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl NotifierAdapter for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), HelpdeskError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(HelpdeskError::Notification {
                message: "mock notifier failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}
