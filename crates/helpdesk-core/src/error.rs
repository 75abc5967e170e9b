// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the helpdesk service.

use thiserror::Error;

/// The primary error type shared by every helpdesk crate.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote language-model errors (transport, non-2xx status, malformed body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Shared counter store errors (unreachable, wrong reply type).
    #[error("counter error: {message}")]
    Counter {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification delivery errors (bad address, SMTP failure).
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller supplied input that violates a domain rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HelpdeskError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        HelpdeskError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a not-found error keyed by a numeric or string id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        HelpdeskError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
