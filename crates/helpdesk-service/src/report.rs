// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily summary report and its scheduler.

use std::sync::Arc;

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use helpdesk_core::types::{Notification, TicketQuery};
use helpdesk_core::{HelpdeskError, NotifierAdapter, StorageAdapter};
use helpdesk_notify::{DailyReport, REPORT_SUBJECT};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct ReportService {
    storage: Arc<dyn StorageAdapter>,
    notifier: Arc<dyn NotifierAdapter>,
    recipient: Option<String>,
}

impl ReportService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        notifier: Arc<dyn NotifierAdapter>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            storage,
            notifier,
            recipient,
        }
    }

    pub async fn build(&self, date: NaiveDate) -> Result<DailyReport, HelpdeskError> {
        let tickets = self.storage.list_tickets(&TicketQuery::default()).await?;
        Ok(DailyReport::from_tickets(&tickets, date))
    }

    pub async fn send(&self, report: &DailyReport) -> Result<(), HelpdeskError> {
        let recipient = self.recipient.as_deref().ok_or_else(|| {
            HelpdeskError::Config(
                "no report recipient: set report.recipient or registration.super_admin_email"
                    .into(),
            )
        })?;
        self.notifier
            .send(&Notification {
                recipient: recipient.to_string(),
                subject: REPORT_SUBJECT.to_string(),
                body: report.render(),
            })
            .await?;
        info!(recipient, total = report.total, "daily report sent");
        Ok(())
    }

    /// Builds today's report and sends it.
    pub async fn send_today(&self) -> Result<DailyReport, HelpdeskError> {
        let report = self.build(Local::now().date_naive()).await?;
        self.send(&report).await?;
        Ok(report)
    }
}

/// First `hour:minute` strictly after `now` in `now`'s time zone. Skips
/// days where that wall-clock time does not exist.
pub fn next_run<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let today = now.date_naive();
    (0..=2u64).find_map(|offset| {
        let at = today
            .checked_add_days(Days::new(offset))?
            .and_hms_opt(hour, minute, 0)?
            .and_local_timezone(now.timezone())
            .earliest()?;
        (at > *now).then_some(at)
    })
}

/// Sends the report every day at `hour:minute` local time until cancelled.
pub async fn run_report_scheduler(
    service: Arc<ReportService>,
    hour: u32,
    minute: u32,
    cancel: CancellationToken,
) {
    info!(hour, minute, "report scheduler started");
    loop {
        let now = Local::now();
        let Some(at) = next_run(&now, hour, minute) else {
            warn!(hour, minute, "no valid report time, scheduler stopping");
            return;
        };
        let wait = (at.clone() - now).to_std().unwrap_or_default();
        debug!(next = %at, "next daily report scheduled");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                if let Err(e) = service.send_today().await {
                    warn!(error = %e, "daily report failed");
                }
            }
            _ = cancel.cancelled() => {
                info!("report scheduler shutting down");
                break;
            }
        }
    }
}
