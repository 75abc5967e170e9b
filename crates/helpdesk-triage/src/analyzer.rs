// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed ticket triage.
//!
//! The analyzer is an absorption boundary: transport errors, timeouts,
//! malformed JSON and schema violations all collapse into
//! [`TriageOutcome::Fallback`] carrying the fixed default analysis.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use helpdesk_config::model::LlmConfig;
use helpdesk_core::types::{
    Category, ChatMessage, CompletionRequest, Priority, Sentiment,
};
use helpdesk_core::{HelpdeskError, ProviderAdapter};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const TRIAGE_SYSTEM_PROMPT: &str = r#"
You are an IT Triage Bot.
Analyze the ticket content (Subject and Description).
Output ONLY raw JSON. No markdown.

1. CLASSIFY into exactly one category: hardware, software, network, database.
2. DETECT sentiment from this list ONLY:
   [ "Furious", "Frustrated", "Urgent", "Sad", "Confused", "Neutral", "Happy", "Grateful", "Sarcastic", "Professional" ]

Schema:
{
  "summary": "Max 5 words",
  "category": "hardware" | "software" | "network" | "database",
  "priority": "high" | "medium" | "low",
  "sentiment": "One value from the list above",
  "suggested_steps": ["Step 1", "Step 2", "Step 3"]
}
"#;

/// Outermost `{ ... }` span, greedy so nested objects stay intact.
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)(\{.*\})").unwrap());

/// Validated classification of one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketAnalysis {
    pub summary: String,
    pub category: Category,
    pub priority: Priority,
    pub sentiment: Sentiment,
    pub suggested_steps: Vec<String>,
}

impl TicketAnalysis {
    /// The analysis used whenever the model cannot be consulted or trusted.
    pub fn fallback() -> Self {
        Self {
            summary: "Manual Review".into(),
            category: Category::Software,
            priority: Priority::Medium,
            sentiment: Sentiment::Neutral,
            suggested_steps: vec!["Check logs".into(), "Contact user".into()],
        }
    }
}

/// Result of triage. Never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    Analyzed(TicketAnalysis),
    Fallback {
        analysis: TicketAnalysis,
        reason: String,
    },
}

impl TriageOutcome {
    pub fn analysis(&self) -> &TicketAnalysis {
        match self {
            TriageOutcome::Analyzed(analysis) | TriageOutcome::Fallback { analysis, .. } => {
                analysis
            }
        }
    }

    pub fn into_analysis(self) -> TicketAnalysis {
        match self {
            TriageOutcome::Analyzed(analysis) | TriageOutcome::Fallback { analysis, .. } => {
                analysis
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TriageOutcome::Fallback { .. })
    }
}

/// Shape the model is asked to produce. Every field is required.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    summary: String,
    category: String,
    priority: String,
    sentiment: String,
    suggested_steps: Vec<String>,
}

/// Coerce a free-form category label onto the four desk categories.
pub fn normalize_category(raw: &str) -> Category {
    let lower = raw.to_lowercase();
    if lower.contains("hardware") {
        Category::Hardware
    } else if lower.contains("network") {
        Category::Network
    } else if lower.contains("data") || lower.contains("db") {
        Category::Database
    } else {
        Category::Software
    }
}

/// Coerce a free-form priority label onto high/medium/low.
pub fn normalize_priority(raw: &str) -> Priority {
    let lower = raw.to_lowercase();
    if ["critical", "urgent", "furious", "high"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Priority::High
    } else if lower.contains("low") {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Known labels match case-insensitively; anything else is `Neutral`.
pub fn normalize_sentiment(raw: &str) -> Sentiment {
    Sentiment::from_str(raw.trim()).unwrap_or(Sentiment::Neutral)
}

/// The first-to-last brace span of `text`, or `text` itself when there is none.
pub fn extract_json(text: &str) -> &str {
    JSON_OBJECT
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str())
}

/// Parse and validate a raw model reply.
pub fn parse_analysis(reply: &str) -> Result<TicketAnalysis, HelpdeskError> {
    let raw: RawAnalysis = serde_json::from_str(extract_json(reply)).map_err(|e| {
        HelpdeskError::Validation(format!("triage reply is not the expected JSON: {e}"))
    })?;

    let suggested_steps: Vec<String> = raw
        .suggested_steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if suggested_steps.is_empty() {
        return Err(HelpdeskError::Validation(
            "triage reply has no suggested steps".into(),
        ));
    }

    Ok(TicketAnalysis {
        summary: raw.summary.trim().to_string(),
        category: normalize_category(&raw.category),
        priority: normalize_priority(&raw.priority),
        sentiment: normalize_sentiment(&raw.sentiment),
        suggested_steps,
    })
}

/// Sends ticket text to the language model and validates its verdict.
pub struct TriageAnalyzer {
    provider: Arc<dyn ProviderAdapter>,
    temperature: f32,
    max_tokens: u32,
}

impl TriageAnalyzer {
    pub fn new(provider: Arc<dyn ProviderAdapter>, config: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: config.triage_temperature,
            max_tokens: config.triage_max_tokens,
        }
    }

    /// Classify a ticket. Any failure yields [`TriageOutcome::Fallback`].
    pub async fn analyze(&self, subject: &str, description: &str) -> TriageOutcome {
        match self.try_analyze(subject, description).await {
            Ok(analysis) => {
                debug!(
                    category = %analysis.category,
                    priority = %analysis.priority,
                    sentiment = %analysis.sentiment,
                    "ticket triaged"
                );
                TriageOutcome::Analyzed(analysis)
            }
            Err(e) => {
                warn!(error = %e, "triage failed, using fallback analysis");
                TriageOutcome::Fallback {
                    analysis: TicketAnalysis::fallback(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_analyze(
        &self,
        subject: &str,
        description: &str,
    ) -> Result<TicketAnalysis, HelpdeskError> {
        let request = CompletionRequest {
            model: None,
            messages: vec![
                ChatMessage::system(TRIAGE_SYSTEM_PROMPT),
                ChatMessage::user(format!("Subject: {subject}\nDescription: {description}")),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response = self.provider.complete(request).await?;
        parse_analysis(&response.content)
    }
}
