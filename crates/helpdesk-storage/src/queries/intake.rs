// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake ticket queries and `IT-{year}-{NNN}` id allocation.

use chrono::Datelike;
use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{IntakeFilter, IntakeTicket, NewIntakeTicket, TicketStatus, Urgency};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::{Database, map_tr_err, now_timestamp};
use crate::models::{INTAKE_COLUMNS, intake_from_row};

/// The id following `last` within `year`. Numbering restarts at 001 each year
/// and widens past 999.
pub fn next_ticket_id(last: Option<&str>, year: i32) -> String {
    let next = last
        .and_then(|id| id.rsplit('-').next())
        .and_then(|n| n.parse::<u32>().ok())
        .map_or(1, |n| n + 1);
    format!("IT-{year}-{next:03}")
}

/// Year used for id allocation, in local time like the report schedule.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Insert an intake ticket with status `open` and a freshly allocated id.
pub async fn create_intake_ticket(
    db: &Database,
    ticket: &NewIntakeTicket,
) -> Result<IntakeTicket, HelpdeskError> {
    let ticket = ticket.clone();
    let year = current_year();
    let now = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<IntakeTicket, rusqlite::Error> {
            let tx = conn.transaction()?;
            let last: Option<String> = tx
                .query_row(
                    "SELECT ticket_id FROM intake_tickets WHERE ticket_id LIKE ?1
                     ORDER BY id DESC LIMIT 1",
                    params![format!("IT-{year}-%")],
                    |row| row.get(0),
                )
                .optional()?;
            let ticket_id = next_ticket_id(last.as_deref(), year);
            tx.execute(
                "INSERT INTO intake_tickets (ticket_id, title, description, source, urgency,
                     category, assigned_team, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                params![
                    ticket_id,
                    ticket.title,
                    ticket.description,
                    ticket.source.to_string(),
                    ticket.urgency.to_string(),
                    ticket.category,
                    ticket.assigned_team,
                    TicketStatus::Open.to_string(),
                    now,
                ],
            )?;
            let id = tx.last_insert_rowid();
            let stored = tx.query_row(
                &format!("SELECT {INTAKE_COLUMNS} FROM intake_tickets WHERE id = ?1"),
                params![id],
                intake_from_row,
            )?;
            tx.commit()?;
            Ok(stored)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_intake_ticket(
    db: &Database,
    ticket_id: &str,
) -> Result<Option<IntakeTicket>, HelpdeskError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<IntakeTicket>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {INTAKE_COLUMNS} FROM intake_tickets WHERE ticket_id = ?1"),
                params![ticket_id],
                intake_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Intake tickets matching every provided filter exactly, newest first.
pub async fn list_intake_tickets(
    db: &Database,
    filter: &IntakeFilter,
) -> Result<Vec<IntakeTicket>, HelpdeskError> {
    let filter = filter.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<IntakeTicket>, rusqlite::Error> {
            let mut clauses = Vec::new();
            let mut bound: Vec<Value> = Vec::new();
            for (column, value) in [
                ("status", filter.status),
                ("assigned_team", filter.team),
                ("source", filter.source),
                ("urgency", filter.urgency),
            ] {
                if let Some(value) = value {
                    bound.push(value.into());
                    clauses.push(format!("{column} = ?{}", bound.len()));
                }
            }
            let mut sql = format!("SELECT {INTAKE_COLUMNS} FROM intake_tickets");
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bound), intake_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Apply status and urgency changes. `None` means the ticket does not exist.
pub async fn update_intake_ticket(
    db: &Database,
    ticket_id: &str,
    status: Option<TicketStatus>,
    urgency: Option<Urgency>,
) -> Result<Option<IntakeTicket>, HelpdeskError> {
    let ticket_id = ticket_id.to_string();
    let status = status.map(|s| s.to_string());
    let urgency = urgency.map(|u| u.to_string());
    let now = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<Option<IntakeTicket>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE intake_tickets
                 SET status = COALESCE(?1, status),
                     urgency = COALESCE(?2, urgency),
                     updated_at = ?3
                 WHERE ticket_id = ?4",
                params![status, urgency, now, ticket_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            conn.query_row(
                &format!("SELECT {INTAKE_COLUMNS} FROM intake_tickets WHERE ticket_id = ?1"),
                params![ticket_id],
                intake_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use helpdesk_core::types::IntakeSource;

    use super::*;
    use crate::test_support::temp_db;

    fn sample(title: &str, source: IntakeSource, team: &str) -> NewIntakeTicket {
        NewIntakeTicket {
            title: title.into(),
            description: "details".into(),
            source,
            urgency: Urgency::High,
            category: "Network".into(),
            assigned_team: team.into(),
        }
    }

    #[test]
    fn id_sequence_starts_at_one_and_increments() {
        assert_eq!(next_ticket_id(None, 2026), "IT-2026-001");
        assert_eq!(next_ticket_id(Some("IT-2026-001"), 2026), "IT-2026-002");
        assert_eq!(next_ticket_id(Some("IT-2026-999"), 2026), "IT-2026-1000");
        assert_eq!(next_ticket_id(Some("garbage"), 2026), "IT-2026-001");
    }

    #[tokio::test]
    async fn create_allocates_sequential_ids() {
        let (_dir, db) = temp_db().await;
        let year = chrono::Local::now().year();
        assert_eq!(current_year(), year);

        let first = create_intake_ticket(&db, &sample("a", IntakeSource::Web, "NetworkTeam"))
            .await
            .unwrap();
        let second = create_intake_ticket(&db, &sample("b", IntakeSource::Email, "AppTeam"))
            .await
            .unwrap();
        assert_eq!(first.ticket_id, format!("IT-{year}-001"));
        assert_eq!(second.ticket_id, format!("IT-{year}-002"));
        assert_eq!(first.status, TicketStatus::Open);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn list_applies_exact_filters() {
        let (_dir, db) = temp_db().await;
        create_intake_ticket(&db, &sample("a", IntakeSource::Web, "NetworkTeam"))
            .await
            .unwrap();
        let b = create_intake_ticket(&db, &sample("b", IntakeSource::Email, "AppTeam"))
            .await
            .unwrap();

        let all = list_intake_tickets(&db, &IntakeFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ticket_id, b.ticket_id);

        let filter = IntakeFilter {
            team: Some("AppTeam".into()),
            source: Some("email".into()),
            ..Default::default()
        };
        let filtered = list_intake_tickets(&db, &filter).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "b");

        let none = IntakeFilter {
            urgency: Some("high".into()),
            ..Default::default()
        };
        assert!(list_intake_tickets(&db, &none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let (_dir, db) = temp_db().await;
        let t = create_intake_ticket(&db, &sample("a", IntakeSource::Glpi, "NetworkTeam"))
            .await
            .unwrap();

        let updated = update_intake_ticket(&db, &t.ticket_id, Some(TicketStatus::InProgress), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(updated.urgency, Urgency::High);

        let updated = update_intake_ticket(&db, &t.ticket_id, None, Some(Urgency::Critical))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TicketStatus::InProgress);
        assert_eq!(updated.urgency, Urgency::Critical);

        assert!(
            update_intake_ticket(&db, "IT-1999-001", None, None)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(
            get_intake_ticket(&db, &t.ticket_id).await.unwrap(),
            Some(updated)
        );
    }
}
