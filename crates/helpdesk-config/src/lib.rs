// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the helpdesk service.
//!
//! TOML files plus `HELPDESK_*` environment overrides, strict
//! `deny_unknown_fields` parsing, and miette diagnostics with typo hints.
//!
//! ```no_run
//! let config = helpdesk_config::load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{HelpdeskConfig, RoutingStrategy};

/// Load from the standard hierarchy and validate.
pub fn load_and_validate() -> Result<HelpdeskConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load from an explicit file (plus env) and validate.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<HelpdeskConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load from a TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<HelpdeskConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read whichever config files exist so diagnostics can point into them.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![
        std::env::current_dir()
            .map(|d| d.join("helpdesk.toml"))
            .unwrap_or_else(|_| "helpdesk.toml".into()),
    ];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("helpdesk/helpdesk.toml"));
    }
    candidates.push("/etc/helpdesk/helpdesk.toml".into());

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
