// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the helpdesk.
//!
//! Two APIs share one router: the desk API under `/v1` (bearer sessions,
//! role checks) and the unauthenticated intake API under `/api`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_router, start_server};
