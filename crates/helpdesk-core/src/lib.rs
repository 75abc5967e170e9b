// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the helpdesk service.
//!
//! Holds the shared error type, the domain types (tickets, users, categories,
//! intake tickets, chat messages) and the adapter traits every backend
//! implements.

pub mod error;
pub mod traits;
pub mod types;

pub use error::HelpdeskError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{
    CounterAdapter, NotifierAdapter, PluginAdapter, ProviderAdapter, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::types::*;
    use super::*;

    #[test]
    fn error_variants_render() {
        let err = HelpdeskError::not_found("ticket", 42);
        assert_eq!(err.to_string(), "ticket not found: 42");

        let err = HelpdeskError::Validation("remarks required".into());
        assert_eq!(err.to_string(), "validation error: remarks required");

        let err = HelpdeskError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(err.to_string().contains("disk full"));

        let _timeout = HelpdeskError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
    }

    #[test]
    fn ticket_status_wire_names() {
        assert_eq!(TicketStatus::InProgress.to_string(), "in-progress");
        assert_eq!(
            TicketStatus::from_str("in-progress").unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::Resolved).unwrap(),
            "\"resolved\""
        );
        assert!(TicketStatus::from_str("closed").is_err());
    }

    #[test]
    fn remarks_required_only_for_progress_and_resolution() {
        assert!(!TicketStatus::Open.requires_remarks());
        assert!(TicketStatus::InProgress.requires_remarks());
        assert!(TicketStatus::Resolved.requires_remarks());
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
        assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("Manager").unwrap(), Role::Manager);
        assert!(!Role::Employee.is_staff());
        assert!(Role::Manager.is_staff());
    }

    #[test]
    fn sentiment_has_ten_labels_and_parses_any_case() {
        let labels = [
            "Furious",
            "Frustrated",
            "Urgent",
            "Sad",
            "Confused",
            "Neutral",
            "Happy",
            "Grateful",
            "Sarcastic",
            "Professional",
        ];
        for label in labels {
            let parsed = Sentiment::from_str(&label.to_lowercase()).unwrap();
            assert_eq!(parsed.to_string(), label);
        }
        assert!(Sentiment::from_str("Elated").is_err());
    }

    #[test]
    fn category_and_priority_are_lowercase() {
        assert_eq!(Category::Database.to_string(), "database");
        assert_eq!(Category::from_str("Hardware").unwrap(), Category::Hardware);
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(
            serde_json::to_string(&Priority::Medium).unwrap(),
            "\"medium\""
        );
    }

    #[test]
    fn intake_enums_match_api_values() {
        assert_eq!(IntakeSource::Solman.to_string(), "solman");
        assert!(IntakeSource::from_str("fax").is_err());
        assert_eq!(Urgency::Critical.to_string(), "Critical");
        assert!(Urgency::from_str("critical").is_err());
    }

    #[test]
    fn user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            email: "a@gmail.com".into(),
            name: "A".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Agent,
            employee_role: None,
            verified: true,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"agent\""));
    }

    #[test]
    fn adapter_type_round_trips() {
        for variant in [
            AdapterType::Storage,
            AdapterType::Provider,
            AdapterType::Counter,
            AdapterType::Notifier,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _plugin<T: PluginAdapter>() {}
        fn _storage<T: StorageAdapter>() {}
        fn _provider<T: ProviderAdapter>() {}
        fn _counter<T: CounterAdapter>() {}
        fn _notifier<T: NotifierAdapter>() {}
    }
}
