// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use helpdesk_core::traits::{NotifierAdapter, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus, Notification};
use helpdesk_core::HelpdeskError;
use tracing::info;

/// Notifier used when email is disabled. Never fails.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PluginAdapter for LogNotifier {
    fn name(&self) -> &str {
        "log"
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
impl NotifierAdapter for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), HelpdeskError> {
        info!(
            recipient = %notification.recipient,
            subject = %notification.subject,
            "email disabled, notification not sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn logs_instead_of_sending() {
        let notifier = LogNotifier::new();
        notifier
            .send(&Notification {
                recipient: "a@gmail.com".into(),
                subject: "Hello".into(),
                body: "body".into(),
            })
            .await
            .unwrap();
        assert!(logs_contain("notification not sent"));
    }
}
