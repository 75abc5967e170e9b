// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the helpdesk crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Provider,
    Counter,
    Notifier,
}

// --- Ticket taxonomy ---

/// Routing bucket for desk tickets. Agents are linked to categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Software,
    Hardware,
    Network,
    Database,
}

impl Category {
    /// Every category, in seeding order.
    pub const ALL: [Category; 4] = [
        Category::Software,
        Category::Hardware,
        Category::Network,
        Category::Database,
    ];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Lifecycle state of a ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    /// Moving a ticket into this status needs non-empty remarks.
    pub fn requires_remarks(self) -> bool {
        matches!(self, TicketStatus::InProgress | TicketStatus::Resolved)
    }

    /// Statuses that count toward an agent's open load.
    pub const ACTIVE: [TicketStatus; 2] = [TicketStatus::Open, TicketStatus::InProgress];
}

/// Emotional tone detected in a ticket. Ten fixed labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Sentiment {
    Furious,
    Frustrated,
    Urgent,
    Sad,
    Confused,
    Neutral,
    Happy,
    Grateful,
    Sarcastic,
    Professional,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Agent,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Roles eligible for category-scoped assignment.
    pub const ASSIGNABLE: [Role; 2] = [Role::Agent, Role::Admin];

    /// Roles used when no category agent is available.
    pub const FALLBACK_ASSIGNEES: [Role; 2] = [Role::Admin, Role::Manager];

    /// Whether this role may work tickets (update status, open the agent dashboard).
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Employee)
    }
}

// --- Persistent entities ---

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// Argon2 PHC string. Never leaves the service.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub employee_role: Option<String>,
    pub verified: bool,
    pub created_at: String,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub employee_role: Option<String>,
    pub verified: bool,
}

/// A category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

/// A desk ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub category: String,
    pub category_id: Option<i64>,
    pub created_by_id: i64,
    pub assigned_agent_id: Option<i64>,
    pub sentiment: Sentiment,
    pub remarks: Option<String>,
    pub suggested_steps: Vec<String>,
    pub created_at: String,
}

/// Input for inserting a desk ticket. Status is always `open` on insert.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub category_id: Option<i64>,
    pub created_by_id: i64,
    pub assigned_agent_id: Option<i64>,
    pub sentiment: Sentiment,
    pub suggested_steps: Vec<String>,
}

/// Full replacement of the mutable ticket fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketChanges {
    pub status: TicketStatus,
    pub priority: Priority,
    pub remarks: Option<String>,
}

/// Filter for listing desk tickets. Results are newest first.
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub category_id: Option<i64>,
    pub limit: Option<usize>,
}

// --- Intake API ---

/// Channel an intake ticket arrived through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IntakeSource {
    Chatbot,
    Email,
    Glpi,
    Solman,
    Web,
}

/// Reporter-declared urgency of an intake ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Routing weight: Low 1, Medium 2, High 3, Critical 4.
    pub fn priority_boost(self) -> u8 {
        match self {
            Urgency::Low => 1,
            Urgency::Medium => 2,
            Urgency::High => 3,
            Urgency::Critical => 4,
        }
    }
}

/// A keyword-classified ticket submitted through the intake API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeTicket {
    pub id: i64,
    /// Public identifier, `IT-{year}-{NNN}`.
    pub ticket_id: String,
    pub title: String,
    pub description: String,
    pub source: IntakeSource,
    pub urgency: Urgency,
    pub category: String,
    pub assigned_team: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewIntakeTicket {
    pub title: String,
    pub description: String,
    pub source: IntakeSource,
    pub urgency: Urgency,
    pub category: String,
    pub assigned_team: String,
}

/// Exact-match filters for listing intake tickets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeFilter {
    pub status: Option<String>,
    pub team: Option<String>,
    pub source: Option<String>,
    pub urgency: Option<String>,
}

// --- Language model ---

/// One chat turn in the OpenAI message shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// A single non-streaming completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model override. `None` uses the provider's configured model.
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// The text of a completion plus provider metadata.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Notifications ---

/// A plain-text email addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
