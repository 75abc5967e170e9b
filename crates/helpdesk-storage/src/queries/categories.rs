// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category and agent-category link queries.

use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{CategoryRecord, Role, User};
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::{Database, map_tr_err};
use crate::models::{USER_COLUMNS, category_from_row, placeholders, user_from_row};

pub async fn list_categories(db: &Database) -> Result<Vec<CategoryRecord>, HelpdeskError> {
    db.connection()
        .call(|conn| -> Result<Vec<CategoryRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
            let rows = stmt.query_map([], category_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_category_by_name(
    db: &Database,
    name: &str,
) -> Result<Option<CategoryRecord>, HelpdeskError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<CategoryRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn first_category(db: &Database) -> Result<Option<CategoryRecord>, HelpdeskError> {
    db.connection()
        .call(|conn| -> Result<Option<CategoryRecord>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, name FROM categories ORDER BY id LIMIT 1",
                [],
                category_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert `name` unless present, then return the stored row.
pub async fn ensure_category(db: &Database, name: &str) -> Result<CategoryRecord, HelpdeskError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<CategoryRecord, rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![name],
            )?;
            conn.query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a category with its agent links. Tickets keep the category name
/// but lose the foreign key.
pub async fn delete_category(db: &Database, id: i64) -> Result<(), HelpdeskError> {
    let removed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM agent_categories WHERE category_id = ?1",
                params![id],
            )?;
            tx.execute(
                "UPDATE tickets SET category_id = NULL WHERE category_id = ?1",
                params![id],
            )?;
            let removed = tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)?;
    if removed == 0 {
        return Err(HelpdeskError::not_found("category", id));
    }
    Ok(())
}

pub async fn link_agent_category(
    db: &Database,
    user_id: i64,
    category_id: i64,
) -> Result<(), HelpdeskError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO agent_categories (user_id, category_id) VALUES (?1, ?2)",
                params![user_id, category_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn categories_for_user(
    db: &Database,
    user_id: i64,
) -> Result<Vec<CategoryRecord>, HelpdeskError> {
    db.connection()
        .call(move |conn| -> Result<Vec<CategoryRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name FROM categories c
                 JOIN agent_categories ac ON ac.category_id = c.id
                 WHERE ac.user_id = ?1 ORDER BY c.id",
            )?;
            let rows = stmt.query_map(params![user_id], category_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Users linked to a category whose role is in `roles`, lowest id first.
pub async fn agents_for_category(
    db: &Database,
    category_id: i64,
    roles: &[Role],
) -> Result<Vec<User>, HelpdeskError> {
    if roles.is_empty() {
        return Ok(Vec::new());
    }
    let roles: Vec<String> = roles.iter().map(Role::to_string).collect();
    db.connection()
        .call(move |conn| -> Result<Vec<User>, rusqlite::Error> {
            let columns = USER_COLUMNS
                .split(", ")
                .map(|c| format!("u.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {columns} FROM users u
                 JOIN agent_categories ac ON ac.user_id = u.id
                 WHERE ac.category_id = ?1 AND u.role IN ({})
                 ORDER BY u.id",
                placeholders(roles.len(), 1)
            );
            let mut bound: Vec<rusqlite::types::Value> = Vec::with_capacity(roles.len() + 1);
            bound.push(category_id.into());
            bound.extend(roles.into_iter().map(rusqlite::types::Value::from));
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bound), user_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
