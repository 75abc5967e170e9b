// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Desk API handlers under `/v1` plus the public `/health` probe.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use helpdesk_core::PluginAdapter;
use helpdesk_core::types::{CategoryRecord, ChatMessage, HealthStatus, Ticket, User};
use helpdesk_service::dashboard::{AgentDashboard, EmployeeHome, SuperAdminDashboard};
use helpdesk_service::{
    AgentRegistration, CreatedTicket, EmployeeRegistration, LoginOutcome, TicketUpdate,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, bearer_token};
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub uptime_secs: u64,
    pub storage: String,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, storage) = match state.services.storage.health_check().await {
        Ok(HealthStatus::Healthy) => ("ok", "healthy".to_string()),
        Ok(HealthStatus::Degraded(reason)) => ("degraded", reason),
        Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy", reason),
        Err(e) => ("unhealthy", e.to_string()),
    };
    let code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        code,
        Json(HealthResponse {
            status,
            service: state.service_name.clone(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            storage,
        }),
    )
}

/// GET /v1/categories
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    Ok(Json(state.services.admin.categories().await?))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// POST /v1/chat
pub async fn post_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> impl IntoResponse {
    Json(
        state
            .services
            .chat
            .respond(&body.message, &body.history)
            .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /v1/auth/login
pub async fn post_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, ApiError> {
    Ok(Json(
        state
            .services
            .accounts
            .login(&body.email, &body.password)
            .await?,
    ))
}

/// POST /v1/auth/register/employee
pub async fn post_register_employee(
    State(state): State<AppState>,
    Json(body): Json<EmployeeRegistration>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.services.accounts.register_employee(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /v1/auth/register/agent
pub async fn post_register_agent(
    State(state): State<AppState>,
    Json(body): Json<AgentRegistration>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.services.accounts.register_agent(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /v1/auth/logout
pub async fn post_logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.services.accounts.logout(token);
    }
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct NewTicketRequest {
    pub subject: String,
    pub description: String,
}

/// POST /v1/tickets
pub async fn post_ticket(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<NewTicketRequest>,
) -> Result<(StatusCode, Json<CreatedTicket>), ApiError> {
    let created = state
        .services
        .tickets
        .create_ticket(&user, &body.subject, &body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /v1/tickets/{id}. Employees may only read their own tickets.
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state.services.tickets.get_ticket(id).await?;
    if !user.role.is_staff() && ticket.created_by_id != user.id {
        return Err(ApiError::forbidden("not your ticket"));
    }
    Ok(Json(ticket))
}

/// PATCH /v1/tickets/{id}
pub async fn patch_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TicketUpdate>,
) -> Result<Json<Ticket>, ApiError> {
    Ok(Json(state.services.tickets.update_ticket(id, body).await?))
}

/// GET /v1/employee/home
pub async fn get_employee_home(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<EmployeeHome>, ApiError> {
    Ok(Json(state.services.dashboards.employee_home(&user).await?))
}

#[derive(Debug, Serialize)]
pub struct TicketList {
    pub count: usize,
    pub tickets: Vec<Ticket>,
}

/// GET /v1/employee/history
pub async fn get_employee_history(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<TicketList>, ApiError> {
    let tickets = state.services.dashboards.employee_history(&user).await?;
    Ok(Json(TicketList {
        count: tickets.len(),
        tickets,
    }))
}

/// GET /v1/agent/dashboard
pub async fn get_agent_dashboard(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<AgentDashboard>, ApiError> {
    Ok(Json(state.services.dashboards.agent_dashboard(&user).await?))
}

/// GET /v1/super-admin
pub async fn get_super_admin(
    State(state): State<AppState>,
) -> Result<Json<SuperAdminDashboard>, ApiError> {
    Ok(Json(state.services.dashboards.super_admin().await?))
}
