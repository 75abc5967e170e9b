// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-classified tickets submitted by integrations (chatbot, mail
//! gateways, GLPI, Solution Manager, web forms).

use std::str::FromStr;
use std::sync::Arc;

use helpdesk_core::types::{
    IntakeFilter, IntakeSource, IntakeTicket, NewIntakeTicket, TicketStatus, Urgency,
};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use helpdesk_triage::classify;
use serde::Deserialize;
use tracing::info;

const VALID_SOURCES: &str = "chatbot, email, glpi, solman, web";
const VALID_URGENCIES: &str = "Low, Medium, High, Critical";

/// Raw submission body. Every field is required; they are optional here
/// so a missing field gets a precise error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub urgency: Option<String>,
}

/// Partial update. Unrecognized values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakePatch {
    pub status: Option<String>,
    pub urgency: Option<String>,
}

pub struct IntakeService {
    storage: Arc<dyn StorageAdapter>,
}

impl IntakeService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub async fn submit(&self, submission: IntakeSubmission) -> Result<IntakeTicket, HelpdeskError> {
        let title = required("title", submission.title)?;
        let description = required("description", submission.description)?;
        let source = required("source", submission.source)?;
        let urgency = required("urgency", submission.urgency)?;

        let source = IntakeSource::from_str(&source).map_err(|_| {
            HelpdeskError::Validation(format!("Invalid source. Must be one of: {VALID_SOURCES}"))
        })?;
        let urgency = Urgency::from_str(&urgency).map_err(|_| {
            HelpdeskError::Validation(format!(
                "Invalid urgency. Must be one of: {VALID_URGENCIES}"
            ))
        })?;

        let classification = classify(&title, &description);
        let ticket = self
            .storage
            .create_intake_ticket(&NewIntakeTicket {
                title,
                description,
                source,
                urgency,
                category: classification.category.to_string(),
                assigned_team: classification.team.to_string(),
            })
            .await?;
        info!(
            ticket_id = %ticket.ticket_id,
            category = %ticket.category,
            team = %ticket.assigned_team,
            "intake ticket created"
        );
        Ok(ticket)
    }

    pub async fn get(&self, ticket_id: &str) -> Result<IntakeTicket, HelpdeskError> {
        self.storage
            .get_intake_ticket(ticket_id)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("ticket", ticket_id))
    }

    pub async fn list(&self, filter: &IntakeFilter) -> Result<Vec<IntakeTicket>, HelpdeskError> {
        self.storage.list_intake_tickets(filter).await
    }

    pub async fn update(
        &self,
        ticket_id: &str,
        patch: IntakePatch,
    ) -> Result<IntakeTicket, HelpdeskError> {
        // Exact wire names only; the status parser itself ignores case.
        let status = patch
            .status
            .as_deref()
            .and_then(|s| TicketStatus::from_str(s).ok().filter(|p| p.to_string() == s));
        let urgency = patch
            .urgency
            .as_deref()
            .and_then(|u| Urgency::from_str(u).ok());
        self.storage
            .update_intake_ticket(ticket_id, status, urgency)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("ticket", ticket_id))
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, HelpdeskError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HelpdeskError::Validation(format!("Missing required field: {field}")))
}
