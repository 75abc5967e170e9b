// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpdesk - AI-assisted IT ticketing.
//!
//! Binary entry point: the HTTP server plus maintenance commands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::types::Role;

/// Helpdesk - AI-assisted IT ticketing.
#[derive(Parser, Debug)]
#[command(name = "helpdesk", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Create the database schema and seed default categories.
    InitDb,
    /// Create a manager linked to a category.
    CreateManager {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        category: String,
    },
    /// Create or promote the super admin account.
    CreateSuperAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Change an existing user's role.
    SetRole {
        #[arg(long)]
        email: String,
        /// employee, agent, manager, admin or super_admin.
        #[arg(long)]
        role: Role,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a category; its tickets keep their category name.
    RemoveCategory {
        #[arg(long)]
        name: String,
    },
    /// Print today's summary report.
    Report {
        /// Also email it to the configured recipient.
        #[arg(long)]
        send: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> HelpdeskConfig {
    let loaded = match path {
        Some(path) => helpdesk_config::load_and_validate_path(path),
        None => helpdesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            helpdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    serve::init_tracing(&config.service.log_level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::InitDb => admin::init_db(&config).await,
        Commands::CreateManager {
            email,
            name,
            password,
            category,
        } => admin::create_manager(&config, &email, &name, &password, &category).await,
        Commands::CreateSuperAdmin {
            email,
            name,
            password,
        } => admin::create_super_admin(&config, &email, &name, &password).await,
        Commands::SetRole { email, role, name } => {
            admin::set_role(&config, &email, role, name.as_deref()).await
        }
        Commands::RemoveCategory { name } => admin::remove_category(&config, &name).await,
        Commands::Report { send } => admin::report(&config, send).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["helpdesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["helpdesk", "init-db", "--config", "/etc/desk.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::InitDb));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/desk.toml")));
    }

    #[test]
    fn set_role_parses_snake_case_roles() {
        let cli = Cli::try_parse_from([
            "helpdesk",
            "set-role",
            "--email",
            "a@gmail.com",
            "--role",
            "super_admin",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::SetRole {
                email: "a@gmail.com".into(),
                role: Role::SuperAdmin,
                name: None,
            })
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(
            Cli::try_parse_from(["helpdesk", "set-role", "--email", "a@gmail.com", "--role", "boss"])
                .is_err()
        );
    }

    #[test]
    fn create_manager_requires_category() {
        assert!(
            Cli::try_parse_from([
                "helpdesk",
                "create-manager",
                "--email",
                "m@gmail.com",
                "--name",
                "M",
                "--password",
                "pw"
            ])
            .is_err()
        );
    }

    #[test]
    fn report_send_flag() {
        let cli = Cli::try_parse_from(["helpdesk", "report", "--send"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Report { send: true }));
    }

    #[test]
    fn default_config_is_valid() {
        let config = helpdesk_config::load_and_validate_str("").expect("defaults validate");
        assert_eq!(config.service.name, "helpdesk");
    }
}
