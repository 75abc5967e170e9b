// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use helpdesk_core::types::ChatMessage;
use helpdesk_router::{ChatReply, ChatRouter};

pub const EMPTY_MESSAGE_REPLY: &str = "Say something!";

/// Chat endpoint logic: blank messages are answered locally, the rest go
/// through intent routing.
pub struct ChatService {
    router: ChatRouter,
}

impl ChatService {
    pub fn new(router: ChatRouter) -> Self {
        Self { router }
    }

    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> ChatReply {
        let message = message.trim();
        if message.is_empty() {
            return ChatReply::text(EMPTY_MESSAGE_REPLY);
        }
        self.router.route(message, history).await
    }
}
