// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket triage: an offline keyword classifier for intake tickets and an
//! LLM analyzer with a fixed fallback for desk tickets.

pub mod analyzer;
pub mod keyword;

pub use analyzer::{TicketAnalysis, TriageAnalyzer, TriageOutcome};
pub use keyword::{Classification, KeywordCategory, Team, classify, priority_boost};
