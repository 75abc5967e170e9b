// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the helpdesk service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level helpdesk configuration.
///
/// Every section is optional and defaults to values suitable for a local
/// single-node deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HelpdeskConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote language model used for triage and chat.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Shared counter store for round-robin routing.
    #[serde(default)]
    pub redis: RedisConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    /// Outbound email.
    #[serde(default)]
    pub email: EmailConfig,

    /// Daily summary report.
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Service identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "helpdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach a permissive CORS layer (browser front-ends on another origin).
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("helpdesk").join("helpdesk.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "helpdesk.db".to_string())
}

/// OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key. `None` falls back to the `NVIDIA_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_triage_temperature")]
    pub triage_temperature: f32,

    #[serde(default = "default_triage_max_tokens")]
    pub triage_max_tokens: u32,

    #[serde(default = "default_chat_temperature")]
    pub chat_temperature: f32,

    #[serde(default = "default_chat_max_tokens")]
    pub chat_max_tokens: u32,

    /// Whole-request timeout for one completion call.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts on 429/500/503. Zero keeps every call single-shot.
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            triage_temperature: default_triage_temperature(),
            triage_max_tokens: default_triage_max_tokens(),
            chat_temperature: default_chat_temperature(),
            chat_max_tokens: default_chat_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_llm_base_url() -> String {
    "https://integrate.api.nvidia.com/v1".to_string()
}

fn default_llm_model() -> String {
    "meta/llama-3.1-8b-instruct".to_string()
}

fn default_triage_temperature() -> f32 {
    0.2
}

fn default_triage_max_tokens() -> u32 {
    150
}

fn default_chat_temperature() -> f32 {
    0.3
}

fn default_chat_max_tokens() -> u32 {
    300
}

fn default_llm_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Use Redis for the counter. When false the counter lives in process memory.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Prefix for per-category counter keys (`{prefix}:{category}`).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "ticket_rr".to_string()
}

/// Which policy picks the agent for a new ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Fewest open tickets, ties broken by fewest resolved.
    #[default]
    LeastLoaded,
    /// Per-category rotation through the agent pool.
    RoundRobin,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default)]
    pub strategy: RoutingStrategy,
}

/// SMTP relay settings. Disabled email logs notifications instead.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// `From` header, e.g. `Helpdesk <helpdesk@example.com>`.
    #[serde(default)]
    pub from_address: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Local hour of day the report is sent.
    #[serde(default = "default_report_hour")]
    pub hour: u32,

    #[serde(default)]
    pub minute: u32,

    /// Recipient. `None` sends to `registration.super_admin_email`.
    #[serde(default)]
    pub recipient: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hour: default_report_hour(),
            minute: 0,
            recipient: None,
        }
    }
}

fn default_report_hour() -> u32 {
    18
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationConfig {
    /// Mark new employee accounts verified on registration.
    #[serde(default = "default_true")]
    pub auto_verify: bool,

    /// Email domains allowed to log in.
    #[serde(default = "default_allowed_email_domains")]
    pub allowed_email_domains: Vec<String>,

    /// Account that always lands on the super-admin dashboard.
    #[serde(default)]
    pub super_admin_email: Option<String>,

    /// Lifetime of a login session token.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            auto_verify: true,
            allowed_email_domains: default_allowed_email_domains(),
            super_admin_email: None,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_allowed_email_domains() -> Vec<String> {
    [
        "gmail.com",
        "hotmail.com",
        "zoho.com",
        "outlook.com",
        "yahoo.com",
        "live.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_session_ttl_secs() -> u64 {
    8 * 60 * 60
}
