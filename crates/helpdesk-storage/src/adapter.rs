// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StorageAdapter`] backed by SQLite.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use helpdesk_config::model::StorageConfig;
use helpdesk_core::types::{
    CategoryRecord, IntakeFilter, IntakeTicket, NewIntakeTicket, NewTicket, NewUser, Role,
    Ticket, TicketChanges, TicketQuery, TicketStatus, Urgency, User,
};
use helpdesk_core::{AdapterType, HealthStatus, HelpdeskError, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite storage. The database is opened by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, HelpdeskError> {
        self.db.get().ok_or_else(|| HelpdeskError::Storage {
            source: "storage not initialized".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        match db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
        {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("storage shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HelpdeskError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HelpdeskError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HelpdeskError> {
        self.db()?.checkpoint().await
    }

    // --- Users ---

    async fn create_user(&self, user: &NewUser) -> Result<User, HelpdeskError> {
        queries::users::create_user(self.db()?, user).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, HelpdeskError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, HelpdeskError> {
        queries::users::find_user_by_email(self.db()?, email).await
    }

    async fn update_user_role(
        &self,
        id: i64,
        role: Role,
        name: Option<&str>,
    ) -> Result<(), HelpdeskError> {
        queries::users::update_user_role(self.db()?, id, role, name).await
    }

    async fn update_user_password(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<(), HelpdeskError> {
        queries::users::update_user_password(self.db()?, id, password_hash).await
    }

    async fn first_user_with_roles(&self, roles: &[Role]) -> Result<Option<User>, HelpdeskError> {
        queries::users::first_user_with_roles(self.db()?, roles).await
    }

    // --- Categories ---

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, HelpdeskError> {
        queries::categories::list_categories(self.db()?).await
    }

    async fn get_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CategoryRecord>, HelpdeskError> {
        queries::categories::get_category_by_name(self.db()?, name).await
    }

    async fn first_category(&self) -> Result<Option<CategoryRecord>, HelpdeskError> {
        queries::categories::first_category(self.db()?).await
    }

    async fn ensure_category(&self, name: &str) -> Result<CategoryRecord, HelpdeskError> {
        queries::categories::ensure_category(self.db()?, name).await
    }

    async fn delete_category(&self, id: i64) -> Result<(), HelpdeskError> {
        queries::categories::delete_category(self.db()?, id).await
    }

    async fn link_agent_category(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<(), HelpdeskError> {
        queries::categories::link_agent_category(self.db()?, user_id, category_id).await
    }

    async fn categories_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryRecord>, HelpdeskError> {
        queries::categories::categories_for_user(self.db()?, user_id).await
    }

    async fn agents_for_category(
        &self,
        category_id: i64,
        roles: &[Role],
    ) -> Result<Vec<User>, HelpdeskError> {
        queries::categories::agents_for_category(self.db()?, category_id, roles).await
    }

    // --- Desk tickets ---

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, HelpdeskError> {
        queries::tickets::create_ticket(self.db()?, ticket).await
    }

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, HelpdeskError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn update_ticket(
        &self,
        id: i64,
        changes: &TicketChanges,
    ) -> Result<Ticket, HelpdeskError> {
        queries::tickets::update_ticket(self.db()?, id, changes).await
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, HelpdeskError> {
        queries::tickets::list_tickets(self.db()?, query).await
    }

    async fn count_assigned(
        &self,
        agent_id: i64,
        statuses: &[TicketStatus],
    ) -> Result<u64, HelpdeskError> {
        queries::tickets::count_assigned(self.db()?, agent_id, statuses).await
    }

    // --- Intake tickets ---

    async fn create_intake_ticket(
        &self,
        ticket: &NewIntakeTicket,
    ) -> Result<IntakeTicket, HelpdeskError> {
        queries::intake::create_intake_ticket(self.db()?, ticket).await
    }

    async fn get_intake_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<IntakeTicket>, HelpdeskError> {
        queries::intake::get_intake_ticket(self.db()?, ticket_id).await
    }

    async fn list_intake_tickets(
        &self,
        filter: &IntakeFilter,
    ) -> Result<Vec<IntakeTicket>, HelpdeskError> {
        queries::intake::list_intake_tickets(self.db()?, filter).await
    }

    async fn update_intake_ticket(
        &self,
        ticket_id: &str,
        status: Option<TicketStatus>,
        urgency: Option<Urgency>,
    ) -> Result<Option<IntakeTicket>, HelpdeskError> {
        queries::intake::update_intake_ticket(self.db()?, ticket_id, status, urgency).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_for(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn reports_adapter_identity() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_for(&dir.path().join("id.db")));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
        assert_eq!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy("not initialized".into())
        );
    }

    #[tokio::test]
    async fn queries_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_for(&dir.path().join("early.db")));
        assert!(matches!(
            storage.list_categories().await,
            Err(HelpdeskError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn initialize_twice_is_an_error() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_for(&dir.path().join("twice.db")));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn delegates_to_queries() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config_for(&dir.path().join("desk.db")));
        storage.initialize().await.unwrap();

        let cat = storage.ensure_category("software").await.unwrap();
        let user = storage
            .create_user(&NewUser {
                email: "agent@gmail.com".into(),
                name: "Agent".into(),
                password_hash: "h".into(),
                role: Role::Agent,
                employee_role: None,
                verified: true,
            })
            .await
            .unwrap();
        storage.link_agent_category(user.id, cat.id).await.unwrap();

        let pool = storage
            .agents_for_category(cat.id, &Role::ASSIGNABLE)
            .await
            .unwrap();
        assert_eq!(pool, vec![user]);
        storage.shutdown().await.unwrap();
    }
}
