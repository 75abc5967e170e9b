// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, patch, post};
use helpdesk_core::HelpdeskError;
use helpdesk_service::Services;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_session, require_staff};
use crate::{handlers, intake};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub service_name: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(services: Arc<Services>, service_name: impl Into<String>) -> Self {
        Self {
            services,
            service_name: service_name.into(),
            start_time: Instant::now(),
        }
    }
}

/// Assemble the full route table:
/// - public: `/health`, categories, chat, login and registration
/// - session: logout, ticket create/read, employee pages, super-admin dashboard
/// - staff: ticket update, agent dashboard
/// - intake: `/api/*`, unauthenticated
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/categories", get(handlers::get_categories))
        .route("/v1/chat", post(handlers::post_chat))
        .route("/v1/auth/login", post(handlers::post_login))
        .route(
            "/v1/auth/register/employee",
            post(handlers::post_register_employee),
        )
        .route(
            "/v1/auth/register/agent",
            post(handlers::post_register_agent),
        )
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/v1/auth/logout", post(handlers::post_logout))
        .route("/v1/tickets", post(handlers::post_ticket))
        .route("/v1/tickets/{id}", get(handlers::get_ticket))
        .route("/v1/employee/home", get(handlers::get_employee_home))
        .route("/v1/employee/history", get(handlers::get_employee_history))
        .route("/v1/super-admin", get(handlers::get_super_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .with_state(state.clone());

    // Last layer added runs first: session, then the staff check.
    let staff_routes = Router::new()
        .route("/v1/tickets/{id}", patch(handlers::patch_ticket))
        .route("/v1/agent/dashboard", get(handlers::get_agent_dashboard))
        .route_layer(axum_middleware::from_fn(require_staff))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .with_state(state.clone());

    let intake_routes = Router::new()
        .route("/api/health", get(intake::health))
        .route(
            "/api/tickets",
            get(intake::list_tickets).post(intake::create_ticket),
        )
        .route(
            "/api/tickets/{ticket_id}",
            get(intake::get_ticket).patch(intake::update_ticket),
        )
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(staff_routes)
        .merge(intake_routes)
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind `host:port` and serve until `cancel` fires.
pub async fn start_server(
    host: &str,
    port: u16,
    app: Router,
    cancel: CancellationToken,
) -> Result<(), HelpdeskError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HelpdeskError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("helpdesk listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| HelpdeskError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
