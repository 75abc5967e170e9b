// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./helpdesk.toml` > `~/.config/helpdesk/helpdesk.toml` >
//! `/etc/helpdesk/helpdesk.toml`, with `HELPDESK_*` environment variables
//! on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HelpdeskConfig;

/// Top-level sections, used to turn `HELPDESK_LLM_API_KEY` into `llm.api_key`.
const SECTIONS: &[&str] = &[
    "service",
    "server",
    "storage",
    "llm",
    "redis",
    "routing",
    "email",
    "report",
    "registration",
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/helpdesk/helpdesk.toml`
/// 3. `~/.config/helpdesk/helpdesk.toml`
/// 4. `./helpdesk.toml`
/// 5. `HELPDESK_*` environment variables
pub fn load_config() -> Result<HelpdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HelpdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HelpdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::file("/etc/helpdesk/helpdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("helpdesk/helpdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("helpdesk.toml"))
        .merge(env_provider())
}

/// Env provider mapping the first `_` after a known section name to a dot.
///
/// `Env::split("_")` would turn `HELPDESK_LLM_API_KEY` into `llm.api.key`,
/// so keys are mapped explicitly.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("HELPDESK_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("LLM_API_KEY"), "llm.api_key");
        assert_eq!(
            map_env_key("REGISTRATION_SUPER_ADMIN_EMAIL"),
            "registration.super_admin_email"
        );
        assert_eq!(map_env_key("REPORT_HOUR"), "report.hour");
        assert_eq!(map_env_key("SERVER_PORT"), "server.port");
        assert_eq!(map_env_key("email_smtp_host"), "email.smtp_host");
        assert_eq!(map_env_key("UNKNOWN"), "unknown");
    }
}
