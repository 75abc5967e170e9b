// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket routing: least-loaded and round-robin agent assignment plus the
//! chat intent router.

pub mod chat;
pub mod least_loaded;
pub mod round_robin;
pub mod strategy;

pub use chat::{ChatReply, ChatRouter, match_intent};
pub use least_loaded::{AgentLoad, LeastLoaded, select_least_loaded};
pub use round_robin::{InMemoryCounter, RedisCounter, RoundRobin, RoundRobinCounter};
pub use strategy::{AssignmentStrategy, build_strategy};
