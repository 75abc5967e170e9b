// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification dispatcher trait.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Notification;

#[async_trait]
pub trait NotifierAdapter: PluginAdapter {
    /// Delivers one notification.
    async fn send(&self, notification: &Notification) -> Result<(), HelpdeskError>;
}
