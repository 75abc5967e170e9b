// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP delivery over STARTTLS using lettre's tokio transport.

use async_trait::async_trait;
use helpdesk_config::model::EmailConfig;
use helpdesk_core::traits::{NotifierAdapter, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus, Notification};
use helpdesk_core::HelpdeskError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, HelpdeskError> {
        let host = config
            .smtp_host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| HelpdeskError::Config("email.smtp_host is required".into()))?;
        let from_raw = config
            .from_address
            .as_deref()
            .ok_or_else(|| HelpdeskError::Config("email.from_address is required".into()))?;
        let from = parse_mailbox(from_raw)
            .map_err(|e| HelpdeskError::Config(format!("email.from_address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| HelpdeskError::Config(format!("email.smtp_host: {e}")))?
            .port(config.smtp_port);
        if let (Some(user), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        info!(host, port = config.smtp_port, "SMTP notifier initialized");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

}

fn build_message(from: &Mailbox, notification: &Notification) -> Result<Message, HelpdeskError> {
    let to = parse_mailbox(notification.recipient.trim()).map_err(|e| {
        HelpdeskError::Notification {
            message: format!("invalid recipient `{}`: {e}", notification.recipient),
            source: None,
        }
    })?;
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| HelpdeskError::Notification {
            message: "failed to build email".into(),
            source: Some(Box::new(e)),
        })
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, lettre::address::AddressError> {
    raw.parse()
}

#[async_trait]
impl PluginAdapter for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notifier
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded("SMTP server rejected NOOP".into())),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl NotifierAdapter for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), HelpdeskError> {
        let message = build_message(&self.from, notification)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| HelpdeskError::Notification {
                message: format!("SMTP delivery to {} failed", notification.recipient),
                source: Some(Box::new(e)),
            })?;
        debug!(recipient = %notification.recipient, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_host: Some("smtp.example.com".into()),
            from_address: Some("Helpdesk <desk@example.com>".into()),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn requires_from_address() {
        let config = EmailConfig {
            from_address: None,
            ..config()
        };
        assert!(SmtpNotifier::new(&config).is_err());
    }

    #[test]
    fn rejects_malformed_from_address() {
        let config = EmailConfig {
            from_address: Some("not an address".into()),
            ..config()
        };
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(HelpdeskError::Config(_))
        ));
    }

    fn from() -> Mailbox {
        parse_mailbox("Helpdesk <desk@example.com>").unwrap()
    }

    #[test]
    fn builds_plain_text_message() {
        let message = build_message(
            &from(),
            &Notification {
                recipient: " user@gmail.com ".into(),
                subject: "[Ticket #1] Received: VPN".into(),
                body: "Hello".into(),
            },
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: user@gmail.com"));
        assert!(raw.contains("Subject: [Ticket #1] Received: VPN"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn bad_recipient_is_a_notification_error() {
        let err = build_message(
            &from(),
            &Notification {
                recipient: "nobody".into(),
                subject: "s".into(),
                body: "b".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, HelpdeskError::Notification { .. }));
    }
}
