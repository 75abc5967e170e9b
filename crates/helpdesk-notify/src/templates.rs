// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket notification texts.

use helpdesk_core::types::{Notification, Ticket};

/// Which ticket event a notification announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Sent to the agent a new ticket was assigned to.
    NewAgent,
    /// Receipt sent to the ticket's creator.
    NewUser,
    /// Sent to the creator when the status changes.
    Update,
}

impl NotificationKind {
    /// Renders the notification. `creator_name` greets the ticket's creator.
    pub fn render(self, ticket: &Ticket, creator_name: &str, recipient: &str) -> Notification {
        let (subject, body) = match self {
            NotificationKind::NewAgent => (
                format!("[Action Required] New Ticket #{}: {}", ticket.id, ticket.subject),
                format!(
                    "New Ticket Assigned!\n\nID: #{}\nPriority: {}\nDescription:\n{}\n\nPlease review on dashboard.",
                    ticket.id, ticket.priority, ticket.description
                ),
            ),
            NotificationKind::NewUser => (
                format!("[Ticket #{}] Received: {}", ticket.id, ticket.subject),
                format!(
                    "Hello {creator_name},\n\nWe have received your ticket.\nID: #{}\nStatus: {}\n\nAn admin will review shortly.",
                    ticket.id, ticket.status
                ),
            ),
            NotificationKind::Update => {
                let status = ticket.status.to_string().to_uppercase();
                (
                    format!("[Update] Ticket #{} is now {status}", ticket.id),
                    format!(
                        "Hello {creator_name},\n\nYour ticket status is now: {status}.\nSubject: {}",
                        ticket.subject
                    ),
                )
            }
        };
        Notification {
            recipient: recipient.to_string(),
            subject,
            body,
        }
    }
}
