// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test environment.
//!
//! `TestHarness` runs the real service layer against a temporary SQLite
//! database (migrated, default categories seeded) with mock adapters for
//! the language model, the counter and email.

use std::sync::Arc;

use helpdesk_config::model::{HelpdeskConfig, StorageConfig};
use helpdesk_config::RoutingStrategy;
use helpdesk_core::types::{CategoryRecord, NewUser, Role, User};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use helpdesk_service::accounts::hash_password;
use helpdesk_service::{Adapters, Services};
use helpdesk_storage::SqliteStorage;

use crate::mock_counter::MockCounter;
use crate::mock_notifier::MockNotifier;
use crate::mock_provider::MockProvider;

/// Password given to every account created through the harness.
pub const TEST_PASSWORD: &str = "correct horse";

pub struct TestHarnessBuilder {
    responses: Vec<String>,
    provider_failure: Option<String>,
    notifier_fails: bool,
    counter_fails: bool,
    config: HelpdeskConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            provider_failure: None,
            notifier_fails: false,
            counter_fails: false,
            config: HelpdeskConfig::default(),
        }
    }

    /// Queue model replies, consumed in order.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Every model call fails with `message`.
    pub fn with_failing_provider(mut self, message: &str) -> Self {
        self.provider_failure = Some(message.to_string());
        self
    }

    pub fn with_failing_notifier(mut self) -> Self {
        self.notifier_fails = true;
        self
    }

    pub fn with_failing_counter(mut self) -> Self {
        self.counter_fails = true;
        self
    }

    pub fn with_strategy(mut self, strategy: RoutingStrategy) -> Self {
        self.config.routing.strategy = strategy;
        self
    }

    pub fn with_super_admin_email(mut self, email: &str) -> Self {
        self.config.registration.super_admin_email = Some(email.to_string());
        self
    }

    /// Arbitrary config tweaks applied before building.
    pub fn with_config(mut self, edit: impl FnOnce(&mut HelpdeskConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub async fn build(self) -> Result<TestHarness, HelpdeskError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HelpdeskError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("helpdesk-test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };

        let sqlite = SqliteStorage::new(config.storage.clone());
        sqlite.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(sqlite);

        let mock_provider = Arc::new(match self.provider_failure {
            Some(message) => MockProvider::failing(&message),
            None => MockProvider::with_responses(self.responses),
        });
        let mock_notifier = Arc::new(if self.notifier_fails {
            MockNotifier::failing()
        } else {
            MockNotifier::new()
        });
        let mock_counter = Arc::new(if self.counter_fails {
            MockCounter::failing()
        } else {
            MockCounter::new()
        });

        let services = Arc::new(Services::new(
            &config,
            Adapters {
                storage: Arc::clone(&storage),
                provider: mock_provider.clone(),
                counter: mock_counter.clone(),
                notifier: mock_notifier.clone(),
            },
        ));
        services.admin.seed_categories().await?;

        Ok(TestHarness {
            services,
            storage,
            mock_provider,
            mock_notifier,
            mock_counter,
            config,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestHarness {
    pub services: Arc<Services>,
    pub storage: Arc<dyn StorageAdapter>,
    pub mock_provider: Arc<MockProvider>,
    pub mock_notifier: Arc<MockNotifier>,
    pub mock_counter: Arc<MockCounter>,
    pub config: HelpdeskConfig,
    /// Keeps the database directory alive until the harness drops.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Inserts a verified user whose password is [`TEST_PASSWORD`].
    pub async fn create_user(&self, email: &str, role: Role) -> Result<User, HelpdeskError> {
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.storage
            .create_user(&NewUser {
                email: email.to_string(),
                name,
                password_hash: hash_password(TEST_PASSWORD)?,
                role,
                employee_role: None,
                verified: true,
            })
            .await
    }

    /// Inserts a user with `role` linked to the named category.
    pub async fn create_agent(
        &self,
        email: &str,
        role: Role,
        category: &str,
    ) -> Result<User, HelpdeskError> {
        let category = self.category(category).await?;
        let user = self.create_user(email, role).await?;
        self.storage.link_agent_category(user.id, category.id).await?;
        Ok(user)
    }

    pub async fn category(&self, name: &str) -> Result<CategoryRecord, HelpdeskError> {
        self.storage
            .get_category_by_name(name)
            .await?
            .ok_or_else(|| HelpdeskError::not_found("category", name))
    }

    /// A triage reply the analyzer accepts.
    pub fn triage_reply(category: &str, priority: &str, sentiment: &str) -> String {
        format!(
            r#"{{"summary": "Test issue", "category": "{category}", "priority": "{priority}", "sentiment": "{sentiment}", "suggested_steps": ["Restart", "Escalate"]}}"#
        )
    }
}
