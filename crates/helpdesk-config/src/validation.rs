// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::HelpdeskConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &HelpdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.llm.base_url.trim().is_empty() {
        fail("llm.base_url must not be empty".to_string());
    }
    for (key, value) in [
        ("llm.triage_temperature", config.llm.triage_temperature),
        ("llm.chat_temperature", config.llm.chat_temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            fail(format!("{key} must be between 0.0 and 2.0, got {value}"));
        }
    }
    for (key, value) in [
        ("llm.triage_max_tokens", config.llm.triage_max_tokens),
        ("llm.chat_max_tokens", config.llm.chat_max_tokens),
    ] {
        if value == 0 {
            fail(format!("{key} must be greater than 0"));
        }
    }
    if config.llm.timeout_secs == 0 {
        fail("llm.timeout_secs must be greater than 0".to_string());
    }

    if config.redis.enabled && config.redis.url.trim().is_empty() {
        fail("redis.url must not be empty when redis is enabled".to_string());
    }

    if config.email.enabled {
        for (key, value) in [
            ("email.smtp_host", &config.email.smtp_host),
            ("email.from_address", &config.email.from_address),
        ] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                fail(format!("{key} is required when email is enabled"));
            }
        }
    }

    if config.report.hour > 23 {
        fail(format!(
            "report.hour must be between 0 and 23, got {}",
            config.report.hour
        ));
    }
    if config.report.minute > 59 {
        fail(format!(
            "report.minute must be between 0 and 59, got {}",
            config.report.minute
        ));
    }

    if config.registration.allowed_email_domains.is_empty() {
        fail("registration.allowed_email_domains must list at least one domain".to_string());
    }
    if config.registration.session_ttl_secs == 0 {
        fail("registration.session_ttl_secs must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
