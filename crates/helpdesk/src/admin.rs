// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot maintenance commands.

use helpdesk_config::HelpdeskConfig;
use helpdesk_core::HelpdeskError;
use helpdesk_core::types::Role;
use helpdesk_service::Services;

use crate::serve::build_adapters;

async fn services(config: &HelpdeskConfig) -> Result<Services, HelpdeskError> {
    let adapters = build_adapters(config).await?;
    Ok(Services::new(config, adapters))
}

/// Create the schema and seed the default categories.
pub async fn init_db(config: &HelpdeskConfig) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    let categories = services.admin.seed_categories().await?;
    println!(
        "database ready at {} ({} categories)",
        config.storage.database_path,
        categories.len()
    );
    Ok(())
}

pub async fn create_manager(
    config: &HelpdeskConfig,
    email: &str,
    name: &str,
    password: &str,
    category: &str,
) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    services.admin.seed_categories().await?;
    let user = services
        .admin
        .create_manager(email, name, password, category)
        .await?;
    println!("manager {} linked to {category}", user.email);
    Ok(())
}

pub async fn create_super_admin(
    config: &HelpdeskConfig,
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    let user = services
        .admin
        .create_super_admin(email, name, password)
        .await?;
    println!("super admin {} ready", user.email);
    Ok(())
}

pub async fn set_role(
    config: &HelpdeskConfig,
    email: &str,
    role: Role,
    name: Option<&str>,
) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    let user = services.admin.set_role(email, role, name).await?;
    println!("{} is now {}", user.email, user.role);
    Ok(())
}

pub async fn remove_category(config: &HelpdeskConfig, name: &str) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    let removed = services.admin.remove_category(name).await?;
    println!("removed category {}", removed.name);
    Ok(())
}

/// Print today's summary, optionally emailing it.
pub async fn report(config: &HelpdeskConfig, send: bool) -> Result<(), HelpdeskError> {
    let services = services(config).await?;
    let report = services
        .reports
        .build(chrono::Local::now().date_naive())
        .await?;
    print!("{}", report.render());
    if send {
        services.reports.send(&report).await?;
        println!("report sent");
    }
    Ok(())
}
