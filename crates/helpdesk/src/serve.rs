// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter construction and the `serve` command.

use std::sync::Arc;

use helpdesk_config::HelpdeskConfig;
use helpdesk_core::{CounterAdapter, HelpdeskError, PluginAdapter, StorageAdapter};
use helpdesk_gateway::{AppState, build_router, start_server};
use helpdesk_notify::build_notifier;
use helpdesk_openai::OpenAiProvider;
use helpdesk_router::{InMemoryCounter, RedisCounter};
use helpdesk_service::{Adapters, Services, run_report_scheduler};
use helpdesk_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown::install_signal_handler;

pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helpdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Open storage (running migrations) and construct every adapter.
pub async fn build_adapters(config: &HelpdeskConfig) -> Result<Adapters, HelpdeskError> {
    let sqlite = SqliteStorage::new(config.storage.clone());
    sqlite.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(sqlite);

    let provider = Arc::new(OpenAiProvider::new(&config.llm)?);

    let counter: Arc<dyn CounterAdapter> = if config.redis.enabled {
        Arc::new(RedisCounter::new(&config.redis.url))
    } else {
        Arc::new(InMemoryCounter::new())
    };

    let notifier = build_notifier(&config.email)?;

    info!(
        provider = provider.name(),
        counter = counter.name(),
        notifier = notifier.name(),
        strategy = ?config.routing.strategy,
        "adapters ready"
    );

    Ok(Adapters {
        storage,
        provider,
        counter,
        notifier,
    })
}

/// Run the HTTP server until SIGINT or SIGTERM.
pub async fn run_serve(config: HelpdeskConfig) -> Result<(), HelpdeskError> {
    let adapters = build_adapters(&config).await?;
    let services = Arc::new(Services::new(&config, adapters.clone()));

    let seeded = services.admin.seed_categories().await?;
    info!(categories = seeded.len(), "categories ready");

    let cancel = install_signal_handler();

    let scheduler = if config.report.enabled {
        Some(tokio::spawn(run_report_scheduler(
            Arc::clone(&services.reports),
            config.report.hour,
            config.report.minute,
            cancel.clone(),
        )))
    } else {
        None
    };

    let app = build_router(
        AppState::new(Arc::clone(&services), config.service.name.clone()),
        config.server.cors_permissive,
    );
    let result = start_server(&config.server.host, config.server.port, app, cancel.clone()).await;

    // The server may have stopped on an error rather than a signal.
    cancel.cancel();
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            warn!(error = %e, "report scheduler task failed");
        }
    }

    for (name, shutdown) in [
        ("storage", adapters.storage.shutdown().await),
        ("counter", adapters.counter.shutdown().await),
        ("notifier", adapters.notifier.shutdown().await),
    ] {
        if let Err(e) = shutdown {
            warn!(adapter = name, error = %e, "adapter shutdown failed");
        }
    }

    result
}
