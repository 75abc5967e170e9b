// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-role ticket overviews.

use std::sync::Arc;

use helpdesk_core::types::{Category, Priority, Role, Ticket, TicketQuery, TicketStatus, User};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use serde::Serialize;

/// How many tickets the employee home page shows.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut counts = Self {
            total: tickets.len(),
            ..Self::default()
        };
        for ticket in tickets {
            match ticket.status {
                TicketStatus::Open => counts.open += 1,
                TicketStatus::InProgress => counts.in_progress += 1,
                TicketStatus::Resolved => counts.resolved += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut counts = Self::default();
        for ticket in tickets {
            match ticket.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeHome {
    pub stats: StatusCounts,
    /// Newest first.
    pub recent: Vec<Ticket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentDashboard {
    pub agent: User,
    pub stats: StatusCounts,
    pub priorities: PriorityCounts,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuperAdminDashboard {
    pub stats: StatusCounts,
    pub categories: Vec<CategoryCount>,
    pub tickets: Vec<Ticket>,
}

pub struct DashboardService {
    storage: Arc<dyn StorageAdapter>,
}

impl DashboardService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub async fn employee_home(&self, user: &User) -> Result<EmployeeHome, HelpdeskError> {
        let mut tickets = self.employee_history(user).await?;
        let stats = StatusCounts::from_tickets(&tickets);
        tickets.truncate(RECENT_LIMIT);
        Ok(EmployeeHome {
            stats,
            recent: tickets,
        })
    }

    /// Every ticket the user created, newest first.
    pub async fn employee_history(&self, user: &User) -> Result<Vec<Ticket>, HelpdeskError> {
        self.storage
            .list_tickets(&TicketQuery {
                created_by: Some(user.id),
                ..TicketQuery::default()
            })
            .await
    }

    /// A manager sees their department (first linked category); everyone
    /// else sees the tickets assigned to them.
    pub async fn agent_dashboard(&self, agent: &User) -> Result<AgentDashboard, HelpdeskError> {
        let tickets = if agent.role == Role::Manager {
            match self.storage.categories_for_user(agent.id).await?.first() {
                Some(category) => {
                    self.storage
                        .list_tickets(&TicketQuery {
                            category_id: Some(category.id),
                            ..TicketQuery::default()
                        })
                        .await?
                }
                None => Vec::new(),
            }
        } else {
            self.storage
                .list_tickets(&TicketQuery {
                    assigned_to: Some(agent.id),
                    ..TicketQuery::default()
                })
                .await?
        };

        Ok(AgentDashboard {
            agent: agent.clone(),
            stats: StatusCounts::from_tickets(&tickets),
            priorities: PriorityCounts::from_tickets(&tickets),
            tickets,
        })
    }

    pub async fn super_admin(&self) -> Result<SuperAdminDashboard, HelpdeskError> {
        let tickets = self.storage.list_tickets(&TicketQuery::default()).await?;
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let name = category.to_string();
                CategoryCount {
                    category,
                    count: tickets
                        .iter()
                        .filter(|t| t.category.eq_ignore_ascii_case(&name))
                        .count(),
                }
            })
            .collect();
        Ok(SuperAdminDashboard {
            stats: StatusCounts::from_tickets(&tickets),
            categories,
            tickets,
        })
    }
}
