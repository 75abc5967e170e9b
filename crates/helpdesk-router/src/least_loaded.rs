// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Least-loaded assignment within a category.
//!
//! Loads are recomputed from storage on every call. Two concurrent
//! assignments can read the same snapshot and pick the same agent.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::types::{CategoryRecord, Role, TicketStatus, User};
use helpdesk_core::{HelpdeskError, StorageAdapter};
use tracing::debug;

use crate::strategy::AssignmentStrategy;

/// An eligible agent with their current ticket counts.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentLoad {
    pub agent: User,
    /// Assigned tickets that are open or in progress.
    pub open: u64,
    /// Assigned tickets already resolved.
    pub resolved: u64,
}

/// Lowest `(open, resolved)` wins; equal loads keep input order.
pub fn select_least_loaded(loads: Vec<AgentLoad>) -> Option<AgentLoad> {
    loads.into_iter().min_by_key(|l| (l.open, l.resolved))
}

pub struct LeastLoaded {
    storage: Arc<dyn StorageAdapter>,
}

impl LeastLoaded {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Agents and admins linked to `category`, with their loads, lowest id first.
    pub async fn loads(&self, category: &CategoryRecord) -> Result<Vec<AgentLoad>, HelpdeskError> {
        let candidates = self
            .storage
            .agents_for_category(category.id, &Role::ASSIGNABLE)
            .await?;

        let mut loads = Vec::with_capacity(candidates.len());
        for agent in candidates {
            let open = self
                .storage
                .count_assigned(agent.id, &TicketStatus::ACTIVE)
                .await?;
            let resolved = self
                .storage
                .count_assigned(agent.id, &[TicketStatus::Resolved])
                .await?;
            loads.push(AgentLoad {
                agent,
                open,
                resolved,
            });
        }
        Ok(loads)
    }
}

#[async_trait]
impl AssignmentStrategy for LeastLoaded {
    fn name(&self) -> &'static str {
        "least_loaded"
    }

    async fn assign(&self, category: &CategoryRecord) -> Result<Option<User>, HelpdeskError> {
        let loads = self.loads(category).await?;
        let picked = select_least_loaded(loads);
        if let Some(load) = &picked {
            debug!(
                category = %category.name,
                agent_id = load.agent.id,
                open = load.open,
                resolved = load.resolved,
                "least-loaded agent selected"
            );
        }
        Ok(picked.map(|l| l.agent))
    }
}
