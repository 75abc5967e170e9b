// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat intent routing.
//!
//! Short messages are checked against three fixed intents before anything
//! is sent to the language model. Only explicit commands redirect; questions
//! and refusals always fall through to free-form chat.

use std::sync::Arc;

use helpdesk_config::model::LlmConfig;
use helpdesk_core::ProviderAdapter;
use helpdesk_core::types::{ChatMessage, CompletionRequest};
use serde::Serialize;
use tracing::{debug, warn};

pub const CHAT_SYSTEM_PROMPT: &str = r#"
You are the Official IT Support AI for PowerGrid (PGCIL).

RULES:
1. HELP FIRST: Try to solve the user's issue (WiFi, VPN, Password) using your knowledge.
2. ASK BEFORE ACTION: If you cannot solve it, ask: "Would you like to raise a ticket?"
3. FORMAT: Use bullet points ( * ) for clarity.
4. TONE: Professional and concise.
"#;

pub const CHAT_ERROR_REPLY: &str = "* System Error: Could not connect to AI.";

const PREFILL_SUBJECT: &str = "Issue Reported via Chatbot";
const PREFILL_FALLBACK_DESCRIPTION: &str = "User requested ticket via chatbot.";

/// Substrings that veto every redirect.
const GUARD_MARKERS: &[&str] = &["how", "where", "don't", "do not", "wait", "no"];
const RAISE_VERBS: &[&str] = &["raise", "create", "submit", "file"];
const DASHBOARD_MARKERS: &[&str] = &["dashboard", "my tickets", "check status"];
const LOGIN_MARKERS: &[&str] = &["login", "sign in"];

/// Text shown to the user plus an optional client-side redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub text: String,
    pub redirect: Option<String>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            redirect: None,
        }
    }

    fn redirect(text: &str, path: String) -> Self {
        Self {
            text: text.to_string(),
            redirect: Some(path),
        }
    }
}

/// Percent-encode a query value, leaving `/` literal.
fn encode_param(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Most recent user turn that is not itself a ticket command.
fn problem_from_history(history: &[ChatMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .filter(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .find(|content| {
            let lower = content.to_lowercase();
            !lower.contains("raise") && !lower.contains("ticket")
        })
        .filter(|content| !content.is_empty())
}

/// Match `message` against the fixed intents. `None` means free-form chat.
pub fn match_intent(message: &str, history: &[ChatMessage]) -> Option<ChatReply> {
    let msg = message.to_lowercase();

    if contains_any(&msg, GUARD_MARKERS) {
        return None;
    }

    let raise = (contains_any(&msg, RAISE_VERBS) && msg.contains("ticket"))
        || (msg.contains("yes") && msg.contains("raise"));
    if raise {
        let description = problem_from_history(history).unwrap_or(PREFILL_FALLBACK_DESCRIPTION);
        let path = format!(
            "/tickets/new?subject={}&description={}",
            encode_param(PREFILL_SUBJECT),
            encode_param(description)
        );
        return Some(ChatReply::redirect(
            "Understood. I am redirecting you to the ticket form with your details pre-filled.",
            path,
        ));
    }

    if contains_any(&msg, DASHBOARD_MARKERS) {
        return Some(ChatReply::redirect(
            "Opening your Dashboard...",
            "/employee/home".into(),
        ));
    }

    if contains_any(&msg, LOGIN_MARKERS) {
        return Some(ChatReply::redirect(
            "Taking you to the Login page...",
            "/auth?tab=login".into(),
        ));
    }

    None
}

/// Intent matching with language-model fallback.
pub struct ChatRouter {
    provider: Arc<dyn ProviderAdapter>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatRouter {
    pub fn new(provider: Arc<dyn ProviderAdapter>, config: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: config.chat_temperature,
            max_tokens: config.chat_max_tokens,
        }
    }

    /// Answer `message`. Model failures become [`CHAT_ERROR_REPLY`].
    pub async fn route(&self, message: &str, history: &[ChatMessage]) -> ChatReply {
        if let Some(reply) = match_intent(message, history) {
            debug!(redirect = ?reply.redirect, "chat intent matched");
            return reply;
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(message));

        let request = CompletionRequest {
            model: None,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        match self.provider.complete(request).await {
            Ok(response) => ChatReply::text(response.content),
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                ChatReply::text(CHAT_ERROR_REPLY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_test_utils::MockProvider;

    fn redirect_of(message: &str, history: &[ChatMessage]) -> Option<String> {
        match_intent(message, history).and_then(|r| r.redirect)
    }

    #[test]
    fn raise_without_history_uses_placeholder() {
        let path = redirect_of("please raise a ticket for me", &[]).unwrap();
        assert_eq!(
            path,
            "/tickets/new?subject=Issue%20Reported%20via%20Chatbot\
             &description=User%20requested%20ticket%20via%20chatbot."
        );
    }

    #[test]
    fn question_never_redirects() {
        assert!(match_intent("how do I raise a ticket", &[]).is_none());
        assert!(match_intent("where is my dashboard", &[]).is_none());
    }

    #[test]
    fn refusal_never_redirects() {
        assert!(match_intent("don't create a ticket", &[]).is_none());
        assert!(match_intent("wait, login later", &[]).is_none());
    }

    #[test]
    fn guard_matches_substrings() {
        // "now" contains "no".
        assert!(match_intent("create ticket now", &[]).is_none());
    }

    #[test]
    fn raise_prefills_last_real_problem() {
        let history = vec![
            ChatMessage::user("My VPN drops"),
            ChatMessage::assistant("Try reconnecting."),
            ChatMessage::user("Printer is jammed"),
            ChatMessage::assistant("Would you like to raise a ticket?"),
            ChatMessage::user("raise ticket"),
        ];
        let path = redirect_of("yes raise it", &history).unwrap();
        assert!(path.ends_with("&description=Printer%20is%20jammed"), "got {path}");
    }

    #[test]
    fn prefill_keeps_slashes_literal() {
        let history = vec![ChatMessage::user("Disk full in C:/temp & D:/logs")];
        let path = redirect_of("raise ticket", &history).unwrap();
        assert!(
            path.ends_with("&description=Disk%20full%20in%20C%3A/temp%20%26%20D%3A/logs"),
            "got {path}"
        );
    }

    #[test]
    fn file_and_submit_are_raise_verbs() {
        assert!(redirect_of("submit ticket", &[]).unwrap().starts_with("/tickets/new?"));
        assert!(redirect_of("FILE A TICKET", &[]).unwrap().starts_with("/tickets/new?"));
    }

    #[test]
    fn dashboard_and_login_intents() {
        let dash = match_intent("open my tickets", &[]).unwrap();
        assert_eq!(dash.text, "Opening your Dashboard...");
        assert_eq!(dash.redirect.as_deref(), Some("/employee/home"));

        let login = match_intent("sign in please", &[]).unwrap();
        assert_eq!(login.redirect.as_deref(), Some("/auth?tab=login"));
    }

    #[test]
    fn ticket_intent_wins_over_dashboard() {
        let reply = match_intent("create ticket from dashboard", &[]).unwrap();
        assert!(reply.redirect.unwrap().starts_with("/tickets/new"));
    }

    #[test]
    fn plain_message_has_no_intent() {
        assert!(match_intent("my laptop is slow", &[]).is_none());
    }

    #[test]
    fn reply_serializes_as_response_and_redirect() {
        let json = serde_json::to_value(ChatReply::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"response": "hi", "redirect": null}));
    }

    #[tokio::test]
    async fn free_form_goes_to_model_with_history() {
        let provider = MockProvider::with_responses(vec!["* Restart the router".into()]);
        let requests = provider.requests();
        let router = ChatRouter::new(Arc::new(provider), &LlmConfig::default());

        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let reply = router.route("wifi is slow", &history).await;
        assert_eq!(reply, ChatReply::text("* Restart the router"));

        let sent = requests.lock().unwrap();
        let req = &sent[0];
        assert_eq!(req.temperature, 0.3);
        assert_eq!(req.max_tokens, 300);
        assert_eq!(req.messages.len(), 4);
        assert_eq!(req.messages[0].content, CHAT_SYSTEM_PROMPT);
        assert_eq!(req.messages[3], ChatMessage::user("wifi is slow"));
    }

    #[tokio::test]
    async fn intent_skips_the_model() {
        let provider = MockProvider::new();
        let requests = provider.requests();
        let router = ChatRouter::new(Arc::new(provider), &LlmConfig::default());
        let reply = router.route("open dashboard", &[]).await;
        assert_eq!(reply.redirect.as_deref(), Some("/employee/home"));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_failure_returns_fixed_error() {
        let router = ChatRouter::new(
            Arc::new(MockProvider::failing("timeout")),
            &LlmConfig::default(),
        );
        let reply = router.route("printer broken", &[]).await;
        assert_eq!(reply, ChatReply::text(CHAT_ERROR_REPLY));
    }
}
