// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator maintenance: seeding, privileged accounts, role changes and
//! category removal.

use std::sync::Arc;

use helpdesk_core::types::{CategoryRecord, NewUser, Role, User};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use tracing::info;

use crate::accounts::{hash_password, normalize_email};

/// Categories every deployment starts with.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["software", "hardware", "network", "database"];

pub struct AdminService {
    storage: Arc<dyn StorageAdapter>,
}

impl AdminService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Inserts any missing default category. Safe to repeat.
    pub async fn seed_categories(&self) -> Result<Vec<CategoryRecord>, HelpdeskError> {
        let mut seeded = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for name in DEFAULT_CATEGORIES {
            seeded.push(self.storage.ensure_category(name).await?);
        }
        Ok(seeded)
    }

    /// Creates a manager, or promotes an existing account, and links them
    /// to `category_name`.
    pub async fn create_manager(
        &self,
        email: &str,
        name: &str,
        password: &str,
        category_name: &str,
    ) -> Result<User, HelpdeskError> {
        let category = self
            .storage
            .get_category_by_name(category_name)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("category", category_name))?;

        let email = normalize_email(email);
        let user = match self.storage.find_user_by_email(&email).await? {
            Some(existing) if existing.role == Role::Manager => existing,
            Some(existing) => {
                self.storage
                    .update_user_role(existing.id, Role::Manager, None)
                    .await?;
                info!(user_id = existing.id, "promoted to manager");
                User {
                    role: Role::Manager,
                    ..existing
                }
            }
            None => {
                let user = self
                    .storage
                    .create_user(&NewUser {
                        email,
                        name: name.to_string(),
                        password_hash: hash_password(password)?,
                        role: Role::Manager,
                        employee_role: None,
                        verified: true,
                    })
                    .await?;
                info!(user_id = user.id, "manager created");
                user
            }
        };

        self.storage
            .link_agent_category(user.id, category.id)
            .await?;
        Ok(user)
    }

    /// Creates the super admin, or resets the password and role of an
    /// existing account.
    pub async fn create_super_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, HelpdeskError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        if let Some(existing) = self.storage.find_user_by_email(&email).await? {
            self.storage
                .update_user_password(existing.id, &password_hash)
                .await?;
            self.storage
                .update_user_role(existing.id, Role::SuperAdmin, None)
                .await?;
            info!(user_id = existing.id, "super admin reset");
            return Ok(User {
                role: Role::SuperAdmin,
                password_hash,
                ..existing
            });
        }

        let user = self
            .storage
            .create_user(&NewUser {
                email,
                name: name.to_string(),
                password_hash,
                role: Role::SuperAdmin,
                employee_role: None,
                verified: true,
            })
            .await?;
        info!(user_id = user.id, "super admin created");
        Ok(user)
    }

    pub async fn set_role(
        &self,
        email: &str,
        role: Role,
        name: Option<&str>,
    ) -> Result<User, HelpdeskError> {
        let email = normalize_email(email);
        let user = self
            .storage
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("user", &email))?;
        self.storage.update_user_role(user.id, role, name).await?;
        info!(user_id = user.id, %role, "role updated");
        Ok(User {
            role,
            name: name.map(String::from).unwrap_or(user.name.clone()),
            ..user
        })
    }

    /// Deletes a category. Its tickets keep their category name.
    pub async fn remove_category(&self, name: &str) -> Result<CategoryRecord, HelpdeskError> {
        let category = self
            .storage
            .get_category_by_name(name)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("category", name))?;
        self.storage.delete_category(category.id).await?;
        info!(category = %category.name, "category removed");
        Ok(category)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryRecord>, HelpdeskError> {
        self.storage.list_categories().await
    }
}
