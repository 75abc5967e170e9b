// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite rows and the core domain types.

use std::str::FromStr;

use helpdesk_core::types::{CategoryRecord, IntakeTicket, Ticket, User};
use rusqlite::Row;
use rusqlite::types::Type;

pub(crate) const USER_COLUMNS: &str =
    "id, email, name, password_hash, role, employee_role, verified, created_at";

pub(crate) const TICKET_COLUMNS: &str = "id, subject, description, priority, status, category, \
     category_id, created_by_id, assigned_agent_id, sentiment, remarks, suggested_steps, created_at";

pub(crate) const INTAKE_COLUMNS: &str = "id, ticket_id, title, description, source, urgency, \
     category, assigned_team, status, created_at, updated_at";

/// Read a TEXT column and parse it with `FromStr`.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        role: parse_column(row, 4)?,
        employee_role: row.get(5)?,
        verified: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub(crate) fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let steps: String = row.get(11)?;
    let suggested_steps = serde_json::from_str(&steps)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;
    Ok(Ticket {
        id: row.get(0)?,
        subject: row.get(1)?,
        description: row.get(2)?,
        priority: parse_column(row, 3)?,
        status: parse_column(row, 4)?,
        category: row.get(5)?,
        category_id: row.get(6)?,
        created_by_id: row.get(7)?,
        assigned_agent_id: row.get(8)?,
        sentiment: parse_column(row, 9)?,
        remarks: row.get(10)?,
        suggested_steps,
        created_at: row.get(12)?,
    })
}

pub(crate) fn intake_from_row(row: &Row<'_>) -> rusqlite::Result<IntakeTicket> {
    Ok(IntakeTicket {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        source: parse_column(row, 4)?,
        urgency: parse_column(row, 5)?,
        category: row.get(6)?,
        assigned_team: row.get(7)?,
        status: parse_column(row, 8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// `?1, ?2, ...` placeholders starting after `offset` bound parameters.
pub(crate) fn placeholders(count: usize, offset: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i + offset))
        .collect::<Vec<_>>()
        .join(", ")
}
