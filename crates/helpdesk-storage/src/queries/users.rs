// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account queries.

use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{NewUser, Role, User};
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::{Database, map_tr_err, now_timestamp};
use crate::models::{USER_COLUMNS, placeholders, user_from_row};

/// Insert a user. Fails if the email is already registered.
pub async fn create_user(db: &Database, user: &NewUser) -> Result<User, HelpdeskError> {
    let user = user.clone();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<User, rusqlite::Error> {
            conn.execute(
                "INSERT INTO users (email, name, password_hash, role, employee_role, verified, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.email,
                    user.name,
                    user.password_hash,
                    user.role.to_string(),
                    user.employee_role,
                    user.verified,
                    created_at,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_user(db: &Database, id: i64) -> Result<Option<User>, HelpdeskError> {
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_user_by_email(db: &Database, email: &str) -> Result<Option<User>, HelpdeskError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Change a user's role, and their display name when `name` is given.
pub async fn update_user_role(
    db: &Database,
    id: i64,
    role: Role,
    name: Option<&str>,
) -> Result<(), HelpdeskError> {
    let name = name.map(str::to_string);
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE users SET role = ?1, name = COALESCE(?2, name) WHERE id = ?3",
                params![role.to_string(), name, id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(HelpdeskError::not_found("user", id));
    }
    Ok(())
}

pub async fn update_user_password(
    db: &Database,
    id: i64,
    password_hash: &str,
) -> Result<(), HelpdeskError> {
    let password_hash = password_hash.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                params![password_hash, id],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(HelpdeskError::not_found("user", id));
    }
    Ok(())
}

/// Lowest-id user holding any of `roles`.
pub async fn first_user_with_roles(
    db: &Database,
    roles: &[Role],
) -> Result<Option<User>, HelpdeskError> {
    if roles.is_empty() {
        return Ok(None);
    }
    let roles: Vec<String> = roles.iter().map(Role::to_string).collect();
    db.connection()
        .call(move |conn| -> Result<Option<User>, rusqlite::Error> {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users WHERE role IN ({}) ORDER BY id LIMIT 1",
                placeholders(roles.len(), 0)
            );
            conn.query_row(&sql, params_from_iter(roles.iter()), user_from_row)
                .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_user, temp_db};

    #[tokio::test]
    async fn create_and_fetch_user() {
        let (_dir, db) = temp_db().await;
        let created = insert_user(&db, "alice@gmail.com", Role::Employee).await;
        assert!(created.id > 0);
        assert_eq!(created.role, Role::Employee);
        assert!(created.verified);

        let by_id = get_user(&db, created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = find_user_by_email(&db, "alice@gmail.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
        assert!(find_user_by_email(&db, "bob@gmail.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, db) = temp_db().await;
        insert_user(&db, "dup@gmail.com", Role::Employee).await;
        let again = NewUser {
            email: "dup@gmail.com".into(),
            name: "Dup".into(),
            password_hash: "x".into(),
            role: Role::Agent,
            employee_role: None,
            verified: false,
        };
        assert!(matches!(
            create_user(&db, &again).await,
            Err(HelpdeskError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn role_update_keeps_name_unless_given() {
        let (_dir, db) = temp_db().await;
        let user = insert_user(&db, "carol@gmail.com", Role::Employee).await;

        update_user_role(&db, user.id, Role::Manager, None).await.unwrap();
        let fetched = get_user(&db, user.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Manager);
        assert_eq!(fetched.name, "carol");

        update_user_role(&db, user.id, Role::SuperAdmin, Some("Carol Boss"))
            .await
            .unwrap();
        let fetched = get_user(&db, user.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::SuperAdmin);
        assert_eq!(fetched.name, "Carol Boss");

        assert!(matches!(
            update_user_role(&db, 999, Role::Agent, None).await,
            Err(HelpdeskError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn password_update_replaces_hash() {
        let (_dir, db) = temp_db().await;
        let user = insert_user(&db, "dan@gmail.com", Role::Agent).await;
        update_user_password(&db, user.id, "new-hash").await.unwrap();
        let fetched = get_user(&db, user.id).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn first_user_with_roles_picks_lowest_id() {
        let (_dir, db) = temp_db().await;
        insert_user(&db, "emp@gmail.com", Role::Employee).await;
        let manager = insert_user(&db, "mgr@gmail.com", Role::Manager).await;
        insert_user(&db, "admin@gmail.com", Role::Admin).await;

        let found = first_user_with_roles(&db, &Role::FALLBACK_ASSIGNEES)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, manager.id);

        assert!(first_user_with_roles(&db, &[Role::SuperAdmin]).await.unwrap().is_none());
        assert!(first_user_with_roles(&db, &[]).await.unwrap().is_none());
    }
}
