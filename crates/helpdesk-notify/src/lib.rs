// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notifications.
//!
//! [`SmtpNotifier`] relays plain-text mail through an SMTP server;
//! [`LogNotifier`] stands in when email is disabled and only logs.
//! Message text lives in [`templates`] and [`report`].

pub mod log;
pub mod report;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use helpdesk_config::model::EmailConfig;
use helpdesk_core::{HelpdeskError, NotifierAdapter};

pub use log::LogNotifier;
pub use report::{DailyReport, REPORT_SUBJECT};
pub use smtp::SmtpNotifier;
pub use templates::NotificationKind;

/// Picks the notifier for the given email settings.
pub fn build_notifier(config: &EmailConfig) -> Result<Arc<dyn NotifierAdapter>, HelpdeskError> {
    if config.enabled {
        Ok(Arc::new(SmtpNotifier::new(config)?))
    } else {
        Ok(Arc::new(LogNotifier::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_email_uses_log_notifier() {
        let notifier = build_notifier(&EmailConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn enabled_email_without_host_is_rejected() {
        let config = EmailConfig {
            enabled: true,
            ..EmailConfig::default()
        };
        assert!(matches!(
            build_notifier(&config),
            Err(HelpdeskError::Config(_))
        ));
    }
}
