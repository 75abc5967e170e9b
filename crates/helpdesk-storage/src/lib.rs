// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the helpdesk service.
//!
//! WAL-mode SQLite with embedded refinery migrations, a single async
//! connection via `tokio-rusqlite`, and typed queries for users, categories,
//! desk tickets and intake tickets.

pub mod adapter;
pub mod database;
pub mod migrations;
mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
