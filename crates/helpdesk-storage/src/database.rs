// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle: migrations, PRAGMA setup and WAL checkpointing.
//!
//! Every query goes through the single tokio-rusqlite background thread.

use std::path::Path;

use helpdesk_core::HelpdeskError;
use tracing::debug;

use crate::migrations;

/// Wrap a tokio-rusqlite failure as a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HelpdeskError {
    HelpdeskError::Storage {
        source: Box::new(e),
    }
}

fn storage_err<E>(e: E) -> HelpdeskError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HelpdeskError::Storage {
        source: Box::new(e),
    }
}

/// Current UTC time in the format stored in every `*_at` column.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Handle to the helpdesk SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, HelpdeskError> {
        Self::open_with(path, true).await
    }

    /// Open the database, apply pending migrations and configure the connection.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, HelpdeskError> {
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), HelpdeskError> {
            if let Some(parent) = Path::new(&migrate_path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(storage_err)?;
            }
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(storage_err)?;
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(storage_err)?;
            }
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| HelpdeskError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(storage_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), HelpdeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
