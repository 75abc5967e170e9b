// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Desk ticket queries.

use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{NewTicket, Ticket, TicketChanges, TicketQuery, TicketStatus};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::{Database, map_tr_err, now_timestamp};
use crate::models::{TICKET_COLUMNS, placeholders, ticket_from_row};

fn encode_steps(steps: &[String]) -> Result<String, HelpdeskError> {
    serde_json::to_string(steps).map_err(|e| HelpdeskError::Storage {
        source: Box::new(e),
    })
}

/// Insert a ticket with status `open`.
pub async fn create_ticket(db: &Database, ticket: &NewTicket) -> Result<Ticket, HelpdeskError> {
    let steps = encode_steps(&ticket.suggested_steps)?;
    let ticket = ticket.clone();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<Ticket, rusqlite::Error> {
            conn.execute(
                "INSERT INTO tickets (subject, description, priority, status, category, category_id,
                     created_by_id, assigned_agent_id, sentiment, suggested_steps, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    ticket.subject,
                    ticket.description,
                    ticket.priority.to_string(),
                    TicketStatus::Open.to_string(),
                    ticket.category,
                    ticket.category_id,
                    ticket.created_by_id,
                    ticket.assigned_agent_id,
                    ticket.sentiment.to_string(),
                    steps,
                    created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id],
                ticket_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_ticket(db: &Database, id: i64) -> Result<Option<Ticket>, HelpdeskError> {
    db.connection()
        .call(move |conn| -> Result<Option<Ticket>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id],
                ticket_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite status, priority and remarks, returning the updated ticket.
pub async fn update_ticket(
    db: &Database,
    id: i64,
    changes: &TicketChanges,
) -> Result<Ticket, HelpdeskError> {
    let changes = changes.clone();
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<Ticket>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE tickets SET status = ?1, priority = ?2, remarks = ?3 WHERE id = ?4",
                params![
                    changes.status.to_string(),
                    changes.priority.to_string(),
                    changes.remarks,
                    id,
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            conn.query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id],
                ticket_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    updated.ok_or_else(|| HelpdeskError::not_found("ticket", id))
}

/// Tickets matching every set filter, newest first.
pub async fn list_tickets(db: &Database, query: &TicketQuery) -> Result<Vec<Ticket>, HelpdeskError> {
    let query = query.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<Ticket>, rusqlite::Error> {
            let mut clauses = Vec::new();
            let mut bound: Vec<Value> = Vec::new();
            for (column, value) in [
                ("created_by_id", query.created_by),
                ("assigned_agent_id", query.assigned_to),
                ("category_id", query.category_id),
            ] {
                if let Some(value) = value {
                    bound.push(value.into());
                    clauses.push(format!("{column} = ?{}", bound.len()));
                }
            }
            let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets");
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");
            if let Some(limit) = query.limit {
                sql.push_str(&format!(" LIMIT {limit}"));
            }
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bound), ticket_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Count of tickets assigned to `agent_id` in any of `statuses`.
pub async fn count_assigned(
    db: &Database,
    agent_id: i64,
    statuses: &[TicketStatus],
) -> Result<u64, HelpdeskError> {
    if statuses.is_empty() {
        return Ok(0);
    }
    let statuses: Vec<String> = statuses.iter().map(TicketStatus::to_string).collect();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let sql = format!(
                "SELECT COUNT(*) FROM tickets WHERE assigned_agent_id = ?1 AND status IN ({})",
                placeholders(statuses.len(), 1)
            );
            let mut bound: Vec<Value> = vec![agent_id.into()];
            bound.extend(statuses.into_iter().map(Value::from));
            let count: i64 = conn.query_row(&sql, params_from_iter(bound), |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use helpdesk_core::types::{Priority, Role, Sentiment};

    use super::*;
    use crate::queries::categories::ensure_category;
    use crate::test_support::{insert_user, temp_db};

    fn new_ticket(created_by: i64, assigned: Option<i64>, category_id: Option<i64>) -> NewTicket {
        NewTicket {
            subject: "VPN drops".into(),
            description: "Disconnects every ten minutes".into(),
            priority: Priority::High,
            category: "network".into(),
            category_id,
            created_by_id: created_by,
            assigned_agent_id: assigned,
            sentiment: Sentiment::Frustrated,
            suggested_steps: vec!["Restart the client".into(), "Check the cable".into()],
        }
    }

    #[tokio::test]
    async fn create_round_trips_all_fields() {
        let (_dir, db) = temp_db().await;
        let emp = insert_user(&db, "emp@gmail.com", Role::Employee).await;
        let agent = insert_user(&db, "agent@gmail.com", Role::Agent).await;
        let cat = ensure_category(&db, "network").await.unwrap();

        let created = create_ticket(&db, &new_ticket(emp.id, Some(agent.id), Some(cat.id)))
            .await
            .unwrap();
        assert_eq!(created.status, TicketStatus::Open);
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.sentiment, Sentiment::Frustrated);
        assert_eq!(created.suggested_steps.len(), 2);
        assert!(created.remarks.is_none());

        let fetched = get_ticket(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_ticket(&db, created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields() {
        let (_dir, db) = temp_db().await;
        let emp = insert_user(&db, "emp@gmail.com", Role::Employee).await;
        let ticket = create_ticket(&db, &new_ticket(emp.id, None, None)).await.unwrap();

        let changes = TicketChanges {
            status: TicketStatus::Resolved,
            priority: Priority::Low,
            remarks: Some("Replaced router".into()),
        };
        let updated = update_ticket(&db, ticket.id, &changes).await.unwrap();
        assert_eq!(updated.status, TicketStatus::Resolved);
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.remarks.as_deref(), Some("Replaced router"));
        assert_eq!(updated.subject, ticket.subject);

        assert!(matches!(
            update_ticket(&db, 4242, &changes).await,
            Err(HelpdeskError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let (_dir, db) = temp_db().await;
        let emp = insert_user(&db, "emp@gmail.com", Role::Employee).await;
        let other = insert_user(&db, "other@gmail.com", Role::Employee).await;
        let agent = insert_user(&db, "agent@gmail.com", Role::Agent).await;

        let first = create_ticket(&db, &new_ticket(emp.id, Some(agent.id), None))
            .await
            .unwrap();
        let second = create_ticket(&db, &new_ticket(emp.id, None, None)).await.unwrap();
        create_ticket(&db, &new_ticket(other.id, Some(agent.id), None))
            .await
            .unwrap();

        let mine = list_tickets(
            &db,
            &TicketQuery {
                created_by: Some(emp.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<i64> = mine.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let assigned = list_tickets(
            &db,
            &TicketQuery {
                assigned_to: Some(agent.id),
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(assigned.len(), 1);

        assert_eq!(list_tickets(&db, &TicketQuery::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn count_assigned_respects_statuses() {
        let (_dir, db) = temp_db().await;
        let emp = insert_user(&db, "emp@gmail.com", Role::Employee).await;
        let agent = insert_user(&db, "agent@gmail.com", Role::Agent).await;

        let a = create_ticket(&db, &new_ticket(emp.id, Some(agent.id), None)).await.unwrap();
        create_ticket(&db, &new_ticket(emp.id, Some(agent.id), None)).await.unwrap();
        update_ticket(
            &db,
            a.id,
            &TicketChanges {
                status: TicketStatus::Resolved,
                priority: Priority::High,
                remarks: Some("done".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(count_assigned(&db, agent.id, &TicketStatus::ACTIVE).await.unwrap(), 1);
        assert_eq!(
            count_assigned(&db, agent.id, &[TicketStatus::Resolved]).await.unwrap(),
            1
        );
        assert_eq!(count_assigned(&db, emp.id, &TicketStatus::ACTIVE).await.unwrap(), 0);
        assert_eq!(count_assigned(&db, agent.id, &[]).await.unwrap(), 0);
    }
}
