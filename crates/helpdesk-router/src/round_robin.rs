// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-category round-robin over the agent pool.
//!
//! The rotation position lives in a shared counter (Redis `INCR`, or an
//! in-process map). Counter failures never propagate: the index falls back
//! to 0 and the failure is logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use helpdesk_core::types::{AdapterType, CategoryRecord, HealthStatus, Role, User};
use helpdesk_core::{CounterAdapter, HelpdeskError, PluginAdapter, StorageAdapter};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::strategy::AssignmentStrategy;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Maps a category to its next pool index.
#[derive(Clone)]
pub struct RoundRobinCounter {
    counter: Arc<dyn CounterAdapter>,
    key_prefix: String,
}

impl RoundRobinCounter {
    pub fn new(counter: Arc<dyn CounterAdapter>, key_prefix: &str) -> Self {
        Self {
            counter,
            key_prefix: key_prefix.to_string(),
        }
    }

    pub fn key(&self, category: &str) -> String {
        format!("{}:{category}", self.key_prefix)
    }

    /// Next index in `0..pool_size`, cycling 0, 1, 2, ... per category.
    /// Returns 0 for an empty pool or when the counter fails.
    pub async fn next_index(&self, category: &str, pool_size: usize) -> usize {
        if pool_size == 0 {
            return 0;
        }
        let key = self.key(category);
        match self.counter.incr(&key).await {
            Ok(count) => (count.saturating_sub(1) % pool_size as u64) as usize,
            Err(e) => {
                warn!(key = %key, error = %e, "round-robin counter unavailable, using index 0");
                0
            }
        }
    }
}

/// Rotates through agents and admins linked to the category, ordered by id.
pub struct RoundRobin {
    storage: Arc<dyn StorageAdapter>,
    counter: RoundRobinCounter,
}

impl RoundRobin {
    pub fn new(storage: Arc<dyn StorageAdapter>, counter: RoundRobinCounter) -> Self {
        Self { storage, counter }
    }
}

#[async_trait]
impl AssignmentStrategy for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    async fn assign(&self, category: &CategoryRecord) -> Result<Option<User>, HelpdeskError> {
        let mut pool = self
            .storage
            .agents_for_category(category.id, &Role::ASSIGNABLE)
            .await?;
        if pool.is_empty() {
            return Ok(None);
        }
        let index = self.counter.next_index(&category.name, pool.len()).await;
        debug!(category = %category.name, index, pool = pool.len(), "round-robin agent selected");
        Ok(Some(pool.swap_remove(index)))
    }
}

/// Redis-backed counter. Connects on first use; a failed connect is retried
/// on the next call.
pub struct RedisCounter {
    url: String,
    conn: OnceCell<ConnectionManager>,
}

impl RedisCounter {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            conn: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, HelpdeskError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let client = redis::Client::open(self.url.as_str()).map_err(counter_err)?;
                let manager = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
                    .await
                    .map_err(|_| HelpdeskError::Timeout {
                        duration: CONNECT_TIMEOUT,
                    })?
                    .map_err(counter_err)?;
                debug!(url = %self.url, "connected to redis");
                Ok::<_, HelpdeskError>(manager)
            })
            .await?;
        Ok(conn.clone())
    }
}

fn counter_err(e: redis::RedisError) -> HelpdeskError {
    HelpdeskError::Counter {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for RedisCounter {
    fn name(&self) -> &str {
        "redis"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Counter
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(match self.connection().await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl CounterAdapter for RedisCounter {
    async fn incr(&self, key: &str) -> Result<u64, HelpdeskError> {
        let mut conn = self.connection().await?;
        conn.incr(key, 1u64).await.map_err(counter_err)
    }
}

/// Process-local counter for single-node deployments and tests.
#[derive(Default)]
pub struct InMemoryCounter {
    counts: DashMap<String, u64>,
}

impl InMemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for InMemoryCounter {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Counter
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl CounterAdapter for InMemoryCounter {
    async fn incr(&self, key: &str) -> Result<u64, HelpdeskError> {
        let mut entry = self.counts.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_test_utils::MockCounter;

    fn rr(counter: Arc<dyn CounterAdapter>) -> RoundRobinCounter {
        RoundRobinCounter::new(counter, "ticket_rr")
    }

    #[test]
    fn key_combines_prefix_and_category() {
        let counter = rr(Arc::new(InMemoryCounter::new()));
        assert_eq!(counter.key("network"), "ticket_rr:network");
    }

    #[tokio::test]
    async fn cycles_from_zero() {
        let counter = rr(Arc::new(InMemoryCounter::new()));
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(counter.next_index("software", 3).await);
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[tokio::test]
    async fn categories_rotate_independently() {
        let counter = rr(Arc::new(InMemoryCounter::new()));
        assert_eq!(counter.next_index("software", 2).await, 0);
        assert_eq!(counter.next_index("software", 2).await, 1);
        assert_eq!(counter.next_index("hardware", 2).await, 0);
    }

    #[tokio::test]
    async fn empty_pool_is_index_zero_without_touching_counter() {
        let mock = Arc::new(MockCounter::new());
        let counter = rr(mock.clone());
        assert_eq!(counter.next_index("network", 0).await, 0);
        assert!(mock.keys().is_empty());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn counter_failure_is_absorbed() {
        let counter = rr(Arc::new(MockCounter::failing()));
        assert_eq!(counter.next_index("network", 4).await, 0);
        assert!(logs_contain("round-robin counter unavailable"));
    }

    #[tokio::test]
    async fn unreachable_redis_is_a_counter_failure() {
        let redis = RedisCounter::new("redis://127.0.0.1:1");
        assert!(redis.incr("ticket_rr:network").await.is_err());
        assert!(matches!(
            redis.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));

        let counter = rr(Arc::new(redis));
        assert_eq!(counter.next_index("network", 3).await, 0);
    }

    #[tokio::test]
    async fn invalid_redis_url_is_a_counter_failure() {
        let redis = RedisCounter::new("not a url");
        assert!(matches!(
            redis.incr("k").await,
            Err(HelpdeskError::Counter { .. })
        ));
    }
}
