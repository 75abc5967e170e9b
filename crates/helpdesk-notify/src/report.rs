// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily summary of ticket volume per category.

use chrono::NaiveDate;
use helpdesk_core::types::{Category, Priority, Ticket, TicketStatus};

pub const REPORT_SUBJECT: &str = "Daily Helpdesk Summary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLine {
    pub category: Category,
    pub open: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total: usize,
    /// High-priority tickets.
    pub urgent: usize,
    pub categories: Vec<CategoryLine>,
}

impl DailyReport {
    pub fn from_tickets(tickets: &[Ticket], date: NaiveDate) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let name = category.to_string();
                let in_category = tickets
                    .iter()
                    .filter(|t| t.category.eq_ignore_ascii_case(&name));
                let (open, resolved) = in_category.fold((0, 0), |(o, r), t| match t.status {
                    TicketStatus::Open => (o + 1, r),
                    TicketStatus::Resolved => (o, r + 1),
                    TicketStatus::InProgress => (o, r),
                });
                CategoryLine {
                    category,
                    open,
                    resolved,
                }
            })
            .collect();

        Self {
            date,
            total: tickets.len(),
            urgent: tickets
                .iter()
                .filter(|t| t.priority == Priority::High)
                .count(),
            categories,
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("DAILY REPORT - {}", self.date.format("%Y-%m-%d")),
            "=".repeat(40),
            format!("TOTAL: {}", self.total),
            format!("URGENT: {}", self.urgent),
            "-".repeat(30),
        ];
        for line in &self.categories {
            lines.push(format!(
                "{}: Open {} | Resolved {}",
                line.category.to_string().to_uppercase(),
                line.open,
                line.resolved
            ));
        }
        lines.join("\n")
    }
}
