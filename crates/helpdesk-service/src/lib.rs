// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application services for the helpdesk.
//!
//! [`Services`] wires the adapters (storage, language model, counter,
//! notifier) into the ticket pipeline, accounts, dashboards, chat, the
//! intake API and the daily report. Adapters are injected; nothing here
//! constructs a network client.

pub mod accounts;
pub mod admin;
pub mod chat;
pub mod dashboard;
pub mod intake;
pub mod report;
pub mod tickets;

use std::sync::Arc;

use helpdesk_config::HelpdeskConfig;
use helpdesk_core::{CounterAdapter, NotifierAdapter, ProviderAdapter, StorageAdapter};
use helpdesk_router::{ChatRouter, build_strategy};
use helpdesk_triage::TriageAnalyzer;

pub use accounts::{AccountService, AgentRegistration, EmployeeRegistration, LoginOutcome};
pub use admin::{AdminService, DEFAULT_CATEGORIES};
pub use chat::ChatService;
pub use dashboard::DashboardService;
pub use intake::{IntakePatch, IntakeService, IntakeSubmission};
pub use report::{ReportService, run_report_scheduler};
pub use tickets::{CreatedTicket, Flash, FlashLevel, TicketService, TicketUpdate};

/// External collaborators, constructed by the caller.
#[derive(Clone)]
pub struct Adapters {
    pub storage: Arc<dyn StorageAdapter>,
    pub provider: Arc<dyn ProviderAdapter>,
    pub counter: Arc<dyn CounterAdapter>,
    pub notifier: Arc<dyn NotifierAdapter>,
}

pub struct Services {
    pub storage: Arc<dyn StorageAdapter>,
    pub accounts: AccountService,
    pub tickets: TicketService,
    pub dashboards: DashboardService,
    pub chat: ChatService,
    pub intake: IntakeService,
    pub reports: Arc<ReportService>,
    pub admin: AdminService,
}

impl Services {
    pub fn new(config: &HelpdeskConfig, adapters: Adapters) -> Self {
        let Adapters {
            storage,
            provider,
            counter,
            notifier,
        } = adapters;

        let strategy = build_strategy(
            config.routing.strategy,
            Arc::clone(&storage),
            counter,
            &config.redis.key_prefix,
        );
        let analyzer = TriageAnalyzer::new(Arc::clone(&provider), &config.llm);
        let recipient = config
            .report
            .recipient
            .clone()
            .or_else(|| config.registration.super_admin_email.clone());

        Self {
            accounts: AccountService::new(Arc::clone(&storage), config.registration.clone()),
            tickets: TicketService::new(
                Arc::clone(&storage),
                analyzer,
                strategy,
                Arc::clone(&notifier),
            ),
            dashboards: DashboardService::new(Arc::clone(&storage)),
            chat: ChatService::new(ChatRouter::new(provider, &config.llm)),
            intake: IntakeService::new(Arc::clone(&storage)),
            reports: Arc::new(ReportService::new(
                Arc::clone(&storage),
                notifier,
                recipient,
            )),
            admin: AdminService::new(Arc::clone(&storage)),
            storage,
        }
    }
}
