// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration, password login and bearer sessions.
//!
//! Passwords are stored as Argon2id PHC strings. Sessions are opaque
//! random tokens held in memory with a fixed time-to-live; a restart
//! logs everyone out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use dashmap::DashMap;
use helpdesk_config::model::RegistrationConfig;
use helpdesk_core::types::{NewUser, Role, User};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const LANDING_SUPER_ADMIN: &str = "/super-admin";
pub const LANDING_AGENT: &str = "/agent/dashboard";
pub const LANDING_EMPLOYEE: &str = "/employee/home";

const DUPLICATE_EMAIL: &str = "An account with this email already exists.";

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeRegistration {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub employee_role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentRegistration {
    pub email: String,
    pub name: String,
    pub password: String,
    pub category_id: i64,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
    /// Where the client should navigate next.
    pub landing: &'static str,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: i64,
    expires_at: Instant,
}

pub struct AccountService {
    storage: Arc<dyn StorageAdapter>,
    config: RegistrationConfig,
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl AccountService {
    pub fn new(storage: Arc<dyn StorageAdapter>, config: RegistrationConfig) -> Self {
        let ttl = Duration::from_secs(config.session_ttl_secs);
        Self {
            storage,
            config,
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Whether the email's domain is on the login allow-list.
    pub fn is_allowed_domain(&self, email: &str) -> bool {
        let Some((_, domain)) = email.split_once('@') else {
            return false;
        };
        let domain = domain.trim().to_lowercase();
        self.config
            .allowed_email_domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&domain))
    }

    pub fn is_super_admin(&self, user: &User) -> bool {
        user.role == Role::SuperAdmin
            || self
                .config
                .super_admin_email
                .as_deref()
                .is_some_and(|email| email.eq_ignore_ascii_case(&user.email))
    }

    pub fn landing_path(&self, user: &User) -> &'static str {
        if self.is_super_admin(user) {
            LANDING_SUPER_ADMIN
        } else if matches!(user.role, Role::Admin | Role::Manager | Role::Agent) {
            LANDING_AGENT
        } else {
            LANDING_EMPLOYEE
        }
    }

    pub async fn register_employee(
        &self,
        registration: EmployeeRegistration,
    ) -> Result<User, HelpdeskError> {
        let email = normalize_email(&registration.email);
        require_credentials(&email, &registration.name, &registration.password)?;
        self.ensure_unused(&email).await?;

        let user = self
            .storage
            .create_user(&NewUser {
                email,
                name: registration.name.trim().to_string(),
                password_hash: hash_password(&registration.password)?,
                role: Role::Employee,
                employee_role: registration
                    .employee_role
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
                verified: self.config.auto_verify,
            })
            .await?;
        info!(user_id = user.id, "employee registered");
        Ok(user)
    }

    /// Registers an agent and links them to one category.
    pub async fn register_agent(
        &self,
        registration: AgentRegistration,
    ) -> Result<User, HelpdeskError> {
        let email = normalize_email(&registration.email);
        require_credentials(&email, &registration.name, &registration.password)?;
        let categories = self.storage.list_categories().await?;
        if !categories.iter().any(|c| c.id == registration.category_id) {
            return Err(HelpdeskError::not_found("category", registration.category_id));
        }
        self.ensure_unused(&email).await?;

        let user = self
            .storage
            .create_user(&NewUser {
                email,
                name: registration.name.trim().to_string(),
                password_hash: hash_password(&registration.password)?,
                role: Role::Agent,
                employee_role: None,
                verified: true,
            })
            .await?;
        self.storage
            .link_agent_category(user.id, registration.category_id)
            .await?;
        info!(
            user_id = user.id,
            category_id = registration.category_id,
            "agent registered"
        );
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, HelpdeskError> {
        let email = normalize_email(email);
        if !self.is_allowed_domain(&email) {
            return Err(HelpdeskError::Unauthorized("Restricted domain.".into()));
        }

        let user = match self.storage.find_user_by_email(&email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => return Err(HelpdeskError::Unauthorized("Invalid credentials.".into())),
        };

        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                user_id: user.id,
                expires_at: Instant::now() + self.ttl,
            },
        );
        debug!(user_id = user.id, "session opened");

        let landing = self.landing_path(&user);
        Ok(LoginOutcome {
            token,
            user,
            landing,
        })
    }

    /// Drops the session. Returns whether the token was live.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Resolves a bearer token to the current user row.
    pub async fn authenticate(&self, token: &str) -> Result<User, HelpdeskError> {
        let user_id = {
            let Some(entry) = self.sessions.get(token) else {
                return Err(HelpdeskError::Unauthorized("invalid session".into()));
            };
            if entry.expires_at <= Instant::now() {
                drop(entry);
                self.sessions.remove(token);
                return Err(HelpdeskError::Unauthorized("session expired".into()));
            }
            entry.user_id
        };

        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| HelpdeskError::Unauthorized("account no longer exists".into()))
    }

    /// Removes expired sessions and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        before - self.sessions.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    async fn ensure_unused(&self, email: &str) -> Result<(), HelpdeskError> {
        match self.storage.find_user_by_email(email).await? {
            Some(_) => Err(HelpdeskError::Validation(DUPLICATE_EMAIL.into())),
            None => Ok(()),
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn require_credentials(email: &str, name: &str, password: &str) -> Result<(), HelpdeskError> {
    if !email.contains('@') {
        return Err(HelpdeskError::Validation("a valid email is required".into()));
    }
    if name.trim().is_empty() {
        return Err(HelpdeskError::Validation("name is required".into()));
    }
    if password.is_empty() {
        return Err(HelpdeskError::Validation("password is required".into()));
    }
    Ok(())
}

/// Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, HelpdeskError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HelpdeskError::Internal(format!("password hashing failed: {e}")))
}

/// False for a wrong password and for an unparseable stored hash.
pub fn verify_password(password: &str, phc: &str) -> bool {
    PasswordHash::new(phc)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("x", "not-a-phc-string"));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Asha@GMail.com "), "asha@gmail.com");
    }

    #[test]
    fn credentials_are_required() {
        assert!(require_credentials("a@gmail.com", "A", "pw").is_ok());
        assert!(require_credentials("nope", "A", "pw").is_err());
        assert!(require_credentials("a@gmail.com", " ", "pw").is_err());
        assert!(require_credentials("a@gmail.com", "A", "").is_err());
    }
}
