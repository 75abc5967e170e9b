// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Desk ticket creation and agent updates.
//!
//! Creation runs triage, category resolution, assignment, persistence and
//! notification in that order. Only persistence failures abort it: triage
//! falls back to a fixed analysis, an empty agent pool falls back to the
//! first admin or manager, and notification failures are logged.

use std::sync::Arc;

use helpdesk_core::types::{
    CategoryRecord, NewTicket, Priority, Role, Sentiment, Ticket, TicketChanges, TicketStatus,
    User,
};
use helpdesk_core::{HelpdeskError, NotifierAdapter, StorageAdapter};
use helpdesk_notify::NotificationKind;
use helpdesk_router::AssignmentStrategy;
use helpdesk_triage::TriageAnalyzer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const REMARKS_REQUIRED: &str =
    "Remarks are required to update status to In Progress or Resolved.";

/// Display name when nobody could be assigned.
pub const UNASSIGNED_NAME: &str = "IT Support";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// One-shot message for the submitting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    fn for_assignment(sentiment: Sentiment, assignee: &str) -> Self {
        if sentiment == Sentiment::Furious {
            Self {
                level: FlashLevel::Error,
                message: format!("Critical Priority! Assigned to {assignee} for immediate review."),
            }
        } else {
            Self {
                level: FlashLevel::Success,
                message: format!("Ticket Created! Successfully assigned to {assignee}."),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedTicket {
    pub ticket: Ticket,
    pub assignee_name: String,
    pub flash: Flash,
    /// True when triage fell back to the default analysis.
    pub triage_fallback: bool,
}

/// Agent-supplied changes. Missing fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketUpdate {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub remarks: Option<String>,
}

pub struct TicketService {
    storage: Arc<dyn StorageAdapter>,
    analyzer: TriageAnalyzer,
    strategy: Arc<dyn AssignmentStrategy>,
    notifier: Arc<dyn NotifierAdapter>,
}

impl TicketService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        analyzer: TriageAnalyzer,
        strategy: Arc<dyn AssignmentStrategy>,
        notifier: Arc<dyn NotifierAdapter>,
    ) -> Self {
        Self {
            storage,
            analyzer,
            strategy,
            notifier,
        }
    }

    pub async fn create_ticket(
        &self,
        creator: &User,
        subject: &str,
        description: &str,
    ) -> Result<CreatedTicket, HelpdeskError> {
        let subject = subject.trim();
        let description = description.trim();
        if subject.is_empty() || description.is_empty() {
            return Err(HelpdeskError::Validation(
                "subject and description are required".into(),
            ));
        }

        let outcome = self.analyzer.analyze(subject, description).await;
        let triage_fallback = outcome.is_fallback();
        let analysis = outcome.into_analysis();

        let category = self.resolve_category(&analysis.category.to_string()).await?;
        let assignee = self.pick_assignee(category.as_ref()).await?;

        let ticket = self
            .storage
            .create_ticket(&NewTicket {
                subject: subject.to_string(),
                description: description.to_string(),
                priority: analysis.priority,
                category: category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "software".into()),
                category_id: category.as_ref().map(|c| c.id),
                created_by_id: creator.id,
                assigned_agent_id: assignee.as_ref().map(|a| a.id),
                sentiment: analysis.sentiment,
                suggested_steps: analysis.suggested_steps,
            })
            .await?;

        info!(
            ticket_id = ticket.id,
            category = %ticket.category,
            priority = %ticket.priority,
            assignee = ?ticket.assigned_agent_id,
            strategy = self.strategy.name(),
            "ticket created"
        );

        if let Some(agent) = &assignee {
            self.notify(NotificationKind::NewAgent.render(&ticket, &creator.name, &agent.email))
                .await;
        }
        self.notify(NotificationKind::NewUser.render(&ticket, &creator.name, &creator.email))
            .await;

        let assignee_name = assignee
            .map(|a| a.name)
            .unwrap_or_else(|| UNASSIGNED_NAME.to_string());
        let flash = Flash::for_assignment(ticket.sentiment, &assignee_name);
        Ok(CreatedTicket {
            ticket,
            assignee_name,
            flash,
            triage_fallback,
        })
    }

    pub async fn get_ticket(&self, id: i64) -> Result<Ticket, HelpdeskError> {
        self.storage
            .get_ticket(id)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("ticket", id))
    }

    /// Applies an agent update. Moving to in-progress or resolved requires
    /// non-empty remarks; a status change notifies the creator.
    pub async fn update_ticket(
        &self,
        id: i64,
        update: TicketUpdate,
    ) -> Result<Ticket, HelpdeskError> {
        let current = self.get_ticket(id).await?;
        let status = update.status.unwrap_or(current.status);
        let remarks = update
            .remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);

        if status.requires_remarks() && remarks.is_none() {
            return Err(HelpdeskError::Validation(REMARKS_REQUIRED.into()));
        }

        let updated = self
            .storage
            .update_ticket(
                id,
                &TicketChanges {
                    status,
                    priority: update.priority.unwrap_or(current.priority),
                    remarks: remarks.or(current.remarks),
                },
            )
            .await?;

        if updated.status != current.status {
            info!(ticket_id = id, from = %current.status, to = %updated.status, "ticket status changed");
            match self.storage.get_user(updated.created_by_id).await {
                Ok(Some(creator)) => {
                    self.notify(NotificationKind::Update.render(
                        &updated,
                        &creator.name,
                        &creator.email,
                    ))
                    .await;
                }
                Ok(None) => debug!(ticket_id = id, "creator missing, skipping update email"),
                Err(e) => warn!(ticket_id = id, error = %e, "could not load ticket creator"),
            }
        }
        Ok(updated)
    }

    /// Category named by triage, else the lowest-id category, else none.
    async fn resolve_category(&self, name: &str) -> Result<Option<CategoryRecord>, HelpdeskError> {
        match self.storage.get_category_by_name(name).await? {
            Some(category) => Ok(Some(category)),
            None => self.storage.first_category().await,
        }
    }

    async fn pick_assignee(
        &self,
        category: Option<&CategoryRecord>,
    ) -> Result<Option<User>, HelpdeskError> {
        if let Some(category) = category
            && let Some(agent) = self.strategy.assign(category).await?
        {
            return Ok(Some(agent));
        }
        let fallback = self
            .storage
            .first_user_with_roles(&Role::FALLBACK_ASSIGNEES)
            .await?;
        if fallback.is_none() {
            warn!("no agent, admin or manager available; ticket left unassigned");
        }
        Ok(fallback)
    }

    async fn notify(&self, notification: helpdesk_core::types::Notification) {
        if let Err(e) = self.notifier.send(&notification).await {
            warn!(
                recipient = %notification.recipient,
                error = %e,
                "notification failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn furious_sentiment_flags_critical() {
        let flash = Flash::for_assignment(Sentiment::Furious, "Ravi");
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(
            flash.message,
            "Critical Priority! Assigned to Ravi for immediate review."
        );
    }

    #[test]
    fn other_sentiments_report_success() {
        let flash = Flash::for_assignment(Sentiment::Happy, UNASSIGNED_NAME);
        assert_eq!(flash.level, FlashLevel::Success);
        assert_eq!(
            flash.message,
            "Ticket Created! Successfully assigned to IT Support."
        );
    }

    #[test]
    fn update_deserializes_wire_names() {
        let update: TicketUpdate =
            serde_json::from_str(r#"{"status":"in-progress","priority":"high","remarks":"on it"}"#)
                .unwrap();
        assert_eq!(update.status, Some(TicketStatus::InProgress));
        assert_eq!(update.priority, Some(Priority::High));
    }
}
