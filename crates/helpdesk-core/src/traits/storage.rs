// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the relational store.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    CategoryRecord, IntakeFilter, IntakeTicket, NewIntakeTicket, NewTicket, NewUser, Role,
    Ticket, TicketChanges, TicketQuery, TicketStatus, Urgency, User,
};

/// Persistence for users, categories, agent-category links and tickets.
///
/// Only persistence failures surface as errors. Lookups that find nothing
/// return `Ok(None)` or an empty list.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), HelpdeskError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), HelpdeskError>;

    // --- Users ---

    async fn create_user(&self, user: &NewUser) -> Result<User, HelpdeskError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, HelpdeskError>;

    /// Looks up a user by exact (already normalized) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, HelpdeskError>;

    /// Changes a user's role, optionally renaming them.
    async fn update_user_role(
        &self,
        id: i64,
        role: Role,
        name: Option<&str>,
    ) -> Result<(), HelpdeskError>;

    async fn update_user_password(&self, id: i64, password_hash: &str)
    -> Result<(), HelpdeskError>;

    /// Lowest-id user whose role is one of `roles`.
    async fn first_user_with_roles(&self, roles: &[Role]) -> Result<Option<User>, HelpdeskError>;

    // --- Categories ---

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, HelpdeskError>;

    async fn get_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<CategoryRecord>, HelpdeskError>;

    /// Lowest-id category.
    async fn first_category(&self) -> Result<Option<CategoryRecord>, HelpdeskError>;

    /// Inserts a category unless one with the same name exists. Returns the row either way.
    async fn ensure_category(&self, name: &str) -> Result<CategoryRecord, HelpdeskError>;

    /// Deletes a category and its agent links. Tickets keep their category name.
    async fn delete_category(&self, id: i64) -> Result<(), HelpdeskError>;

    /// Links an agent to a category. Linking twice is a no-op.
    async fn link_agent_category(&self, user_id: i64, category_id: i64)
    -> Result<(), HelpdeskError>;

    /// Categories linked to a user, lowest id first.
    async fn categories_for_user(&self, user_id: i64)
    -> Result<Vec<CategoryRecord>, HelpdeskError>;

    /// Users linked to `category_id` whose role is one of `roles`, lowest id first.
    async fn agents_for_category(
        &self,
        category_id: i64,
        roles: &[Role],
    ) -> Result<Vec<User>, HelpdeskError>;

    // --- Desk tickets ---

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, HelpdeskError>;

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, HelpdeskError>;

    /// Overwrites status, priority and remarks. Returns the updated row.
    async fn update_ticket(
        &self,
        id: i64,
        changes: &TicketChanges,
    ) -> Result<Ticket, HelpdeskError>;

    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, HelpdeskError>;

    /// Number of tickets assigned to `agent_id` whose status is one of `statuses`.
    async fn count_assigned(
        &self,
        agent_id: i64,
        statuses: &[TicketStatus],
    ) -> Result<u64, HelpdeskError>;

    // --- Intake tickets ---

    /// Inserts an intake ticket, allocating the next `IT-{year}-{NNN}` id.
    async fn create_intake_ticket(
        &self,
        ticket: &NewIntakeTicket,
    ) -> Result<IntakeTicket, HelpdeskError>;

    async fn get_intake_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<IntakeTicket>, HelpdeskError>;

    async fn list_intake_tickets(
        &self,
        filter: &IntakeFilter,
    ) -> Result<Vec<IntakeTicket>, HelpdeskError>;

    /// Applies the given changes. Returns `None` when the ticket does not exist.
    async fn update_intake_ticket(
        &self,
        ticket_id: &str,
        status: Option<TicketStatus>,
        urgency: Option<Urgency>,
    ) -> Result<Option<IntakeTicket>, HelpdeskError>;
}
