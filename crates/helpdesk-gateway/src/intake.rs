// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake REST API under `/api`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{IntakeFilter, IntakeTicket};
use helpdesk_service::{IntakePatch, IntakeSubmission};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;

pub const INTAKE_SERVICE_NAME: &str = "Smart Helpdesk API";

#[derive(Debug, Serialize)]
pub struct TicketEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub status: &'static str,
    pub ticket: IntakeTicket,
}

#[derive(Debug, Serialize)]
pub struct TicketListEnvelope {
    pub status: &'static str,
    pub count: usize,
    pub tickets: Vec<IntakeTicket>,
}

#[derive(Debug, Serialize)]
pub struct IntakeHealth {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

fn not_found(err: HelpdeskError) -> ApiError {
    match err {
        HelpdeskError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "Ticket not found"),
        other => other.into(),
    }
}

/// POST /api/tickets. A missing or unparsable body is a 400.
pub async fn create_ticket(
    State(state): State<AppState>,
    body: Result<Json<IntakeSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<TicketEnvelope>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "intake body rejected");
        ApiError::new(StatusCode::BAD_REQUEST, "No data provided")
    })?;
    let ticket = state.services.intake.submit(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(TicketEnvelope {
            message: Some("Ticket created successfully"),
            status: "success",
            ticket,
        }),
    ))
}

/// GET /api/tickets?status=&team=&source=&urgency=
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(filter): Query<IntakeFilter>,
) -> Result<Json<TicketListEnvelope>, ApiError> {
    let tickets = state.services.intake.list(&filter).await?;
    Ok(Json(TicketListEnvelope {
        status: "success",
        count: tickets.len(),
        tickets,
    }))
}

/// GET /api/tickets/{ticket_id}
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state
        .services
        .intake
        .get(&ticket_id)
        .await
        .map_err(not_found)?;
    Ok(Json(TicketEnvelope {
        message: None,
        status: "success",
        ticket,
    }))
}

/// PATCH /api/tickets/{ticket_id}
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(body): Json<IntakePatch>,
) -> Result<Json<TicketEnvelope>, ApiError> {
    let ticket = state
        .services
        .intake
        .update(&ticket_id, body)
        .await
        .map_err(not_found)?;
    Ok(Json(TicketEnvelope {
        message: Some("Ticket updated successfully"),
        status: "success",
        ticket,
    }))
}

/// GET /api/health
pub async fn health() -> Json<IntakeHealth> {
    Json(IntakeHealth {
        status: "healthy",
        service: INTAKE_SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
