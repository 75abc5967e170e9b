// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-hit classification for intake tickets.
//!
//! Deterministic and offline: each category scores one point per keyword
//! found as a substring of the lower-cased `"{title} {description}"`.

use std::str::FromStr;

use helpdesk_core::types::Urgency;
use strum::{Display, EnumString};

/// Intake category. Declaration order breaks score ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum KeywordCategory {
    Network,
    Application,
    Hardware,
    Access,
    Software,
}

/// Team that owns a [`KeywordCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Team {
    NetworkTeam,
    AppTeam,
    HardwareTeam,
    AccessTeam,
    SoftwareTeam,
}

const NETWORK: &[&str] = &[
    "vpn", "network", "connectivity", "internet", "wifi", "lan", "wan", "router", "switch",
    "ip", "dns", "gateway", "firewall", "ping", "connection", "bandwidth", "ethernet", "cable",
    "port",
];

const APPLICATION: &[&str] = &[
    "outlook", "teams", "sap", "glpi", "solman", "application", "app", "software crash",
    "program", "excel", "word", "powerpoint", "sharepoint", "erp", "crm", "database query",
    "report", "dashboard",
];

const HARDWARE: &[&str] = &[
    "laptop", "desktop", "computer", "printer", "scanner", "mouse", "keyboard", "monitor",
    "screen", "display", "cpu", "ram", "hard drive", "disk", "usb", "charger", "battery",
    "hardware", "device", "equipment",
];

const ACCESS: &[&str] = &[
    "password", "login", "account", "access", "permission", "unlock", "locked",
    "authentication", "credential", "reset password", "forgot password", "user account",
    "access denied", "authorization", "rights", "privileges",
];

const SOFTWARE: &[&str] = &[
    "windows", "office", "installation", "install", "update", "patch", "license", "antivirus",
    "software", "driver", "upgrade", "uninstall", "config", "configuration", "settings",
    "system",
];

impl KeywordCategory {
    /// Every category in tie-break order.
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Network,
        KeywordCategory::Application,
        KeywordCategory::Hardware,
        KeywordCategory::Access,
        KeywordCategory::Software,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            KeywordCategory::Network => NETWORK,
            KeywordCategory::Application => APPLICATION,
            KeywordCategory::Hardware => HARDWARE,
            KeywordCategory::Access => ACCESS,
            KeywordCategory::Software => SOFTWARE,
        }
    }

    pub fn team(self) -> Team {
        match self {
            KeywordCategory::Network => Team::NetworkTeam,
            KeywordCategory::Application => Team::AppTeam,
            KeywordCategory::Hardware => Team::HardwareTeam,
            KeywordCategory::Access => Team::AccessTeam,
            KeywordCategory::Software => Team::SoftwareTeam,
        }
    }

    /// Number of this category's keywords present in `text` (already lower-cased).
    fn score(self, text: &str) -> usize {
        self.keywords().iter().filter(|k| text.contains(*k)).count()
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: KeywordCategory,
    pub team: Team,
}

/// Highest-scoring category for the ticket text, `Software` when nothing matches.
pub fn classify(title: &str, description: &str) -> Classification {
    let text = format!("{title} {description}").to_lowercase();

    let mut best = KeywordCategory::Software;
    let mut best_score = 0;
    for category in KeywordCategory::ALL {
        let score = category.score(&text);
        if score > best_score {
            best = category;
            best_score = score;
        }
    }

    Classification {
        category: best,
        team: best.team(),
    }
}

/// Routing weight for a raw urgency label. Unknown labels weigh as `Medium`.
pub fn priority_boost(urgency: &str) -> u8 {
    Urgency::from_str(urgency).map_or(2, Urgency::priority_boost)
}
