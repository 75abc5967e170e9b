// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable agent assignment.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_config::RoutingStrategy;
use helpdesk_core::types::{CategoryRecord, User};
use helpdesk_core::{CounterAdapter, HelpdeskError, StorageAdapter};

use crate::least_loaded::LeastLoaded;
use crate::round_robin::{RoundRobin, RoundRobinCounter};

/// Picks an agent for a new ticket in `category`.
///
/// `Ok(None)` means no eligible agent is linked to the category; the caller
/// decides the fallback.
#[async_trait]
pub trait AssignmentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn assign(&self, category: &CategoryRecord) -> Result<Option<User>, HelpdeskError>;
}

/// Build the strategy selected by `routing.strategy`.
pub fn build_strategy(
    strategy: RoutingStrategy,
    storage: Arc<dyn StorageAdapter>,
    counter: Arc<dyn CounterAdapter>,
    key_prefix: &str,
) -> Arc<dyn AssignmentStrategy> {
    match strategy {
        RoutingStrategy::LeastLoaded => Arc::new(LeastLoaded::new(storage)),
        RoutingStrategy::RoundRobin => Arc::new(RoundRobin::new(
            storage,
            RoundRobinCounter::new(counter, key_prefix),
        )),
    }
}
