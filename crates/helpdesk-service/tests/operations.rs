// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboards, intake API, daily report, maintenance and chat.

use chrono::NaiveDate;
use helpdesk_core::HelpdeskError;
use helpdesk_core::types::{Category, IntakeFilter, Role, TicketStatus, Urgency};
use helpdesk_service::{IntakePatch, IntakeSubmission, TicketUpdate};
use helpdesk_test_utils::TestHarness;

#[tokio::test]
async fn employee_home_counts_own_tickets_and_limits_recent() {
    let harness = TestHarness::builder().build().await.unwrap();
    let me = harness
        .create_user("me@gmail.com", Role::Employee)
        .await
        .unwrap();
    let other = harness
        .create_user("other@gmail.com", Role::Employee)
        .await
        .unwrap();
    let tickets = &harness.services.tickets;
    for n in 0..12 {
        tickets
            .create_ticket(&me, &format!("Issue {n}"), "details")
            .await
            .unwrap();
    }
    tickets.create_ticket(&other, "Not mine", "x").await.unwrap();

    let home = harness.services.dashboards.employee_home(&me).await.unwrap();
    assert_eq!(home.stats.total, 12);
    assert_eq!(home.stats.open, 12);
    assert_eq!(home.recent.len(), 10);
    assert_eq!(home.recent[0].subject, "Issue 11");

    let history = harness
        .services
        .dashboards
        .employee_history(&me)
        .await
        .unwrap();
    assert_eq!(history.len(), 12);
    assert!(history.iter().all(|t| t.created_by_id == me.id));
}

#[tokio::test]
async fn manager_sees_department_agent_sees_own() {
    let responses = vec![
        TestHarness::triage_reply("network", "high", "Neutral"),
        TestHarness::triage_reply("network", "low", "Neutral"),
        TestHarness::triage_reply("software", "medium", "Neutral"),
    ];
    let harness = TestHarness::builder()
        .with_mock_responses(responses)
        .build()
        .await
        .unwrap();
    let employee = harness
        .create_user("emp@gmail.com", Role::Employee)
        .await
        .unwrap();
    let net_agent = harness
        .create_agent("net@gmail.com", Role::Agent, "network")
        .await
        .unwrap();
    let manager = harness
        .create_agent("head@gmail.com", Role::Manager, "network")
        .await
        .unwrap();
    let tickets = &harness.services.tickets;
    for subject in ["a", "b", "c"] {
        tickets.create_ticket(&employee, subject, "d").await.unwrap();
    }

    let agent_view = harness
        .services
        .dashboards
        .agent_dashboard(&net_agent)
        .await
        .unwrap();
    assert_eq!(agent_view.stats.total, 2);
    assert_eq!(agent_view.priorities.high, 1);
    assert_eq!(agent_view.priorities.low, 1);

    let manager_view = harness
        .services
        .dashboards
        .agent_dashboard(&manager)
        .await
        .unwrap();
    assert_eq!(manager_view.stats.total, 2);
    assert!(manager_view.tickets.iter().all(|t| t.category == "network"));
}

#[tokio::test]
async fn manager_without_category_sees_nothing() {
    let harness = TestHarness::builder().build().await.unwrap();
    let manager = harness
        .create_user("head@gmail.com", Role::Manager)
        .await
        .unwrap();
    let view = harness
        .services
        .dashboards
        .agent_dashboard(&manager)
        .await
        .unwrap();
    assert!(view.tickets.is_empty());
}

#[tokio::test]
async fn super_admin_dashboard_counts_categories() {
    let responses = vec![
        TestHarness::triage_reply("database", "high", "Neutral"),
        TestHarness::triage_reply("database", "high", "Neutral"),
    ];
    let harness = TestHarness::builder()
        .with_mock_responses(responses)
        .build()
        .await
        .unwrap();
    let employee = harness
        .create_user("emp@gmail.com", Role::Employee)
        .await
        .unwrap();
    for subject in ["a", "b", "c"] {
        harness
            .services
            .tickets
            .create_ticket(&employee, subject, "d")
            .await
            .unwrap();
    }

    let view = harness.services.dashboards.super_admin().await.unwrap();
    assert_eq!(view.stats.total, 3);
    let count = |category: Category| {
        view.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
    };
    assert_eq!(count(Category::Database), Some(2));
    assert_eq!(count(Category::Software), Some(1));
    assert_eq!(count(Category::Network), Some(0));
}

fn submission(title: &str, description: &str) -> IntakeSubmission {
    IntakeSubmission {
        title: Some(title.into()),
        description: Some(description.into()),
        source: Some("email".into()),
        urgency: Some("High".into()),
    }
}

#[tokio::test]
async fn intake_ticket_is_keyword_classified() {
    let harness = TestHarness::builder().build().await.unwrap();
    let intake = &harness.services.intake;

    let ticket = intake
        .submit(submission("VPN broken", "cannot connect to wifi or vpn"))
        .await
        .unwrap();
    assert!(ticket.ticket_id.starts_with("IT-"));
    assert!(ticket.ticket_id.ends_with("-001"));
    assert_eq!(ticket.category, "Network");
    assert_eq!(ticket.assigned_team, "NetworkTeam");
    assert_eq!(ticket.status, TicketStatus::Open);

    let second = intake.submit(submission("Hello", "nothing")).await.unwrap();
    assert!(second.ticket_id.ends_with("-002"));
    assert_eq!(second.category, "Software");

    let fetched = intake.get(&ticket.ticket_id).await.unwrap();
    assert_eq!(fetched, ticket);
}

#[tokio::test]
async fn intake_validation_messages() {
    let harness = TestHarness::builder().build().await.unwrap();
    let intake = &harness.services.intake;

    let missing = intake
        .submit(IntakeSubmission {
            description: None,
            ..submission("t", "d")
        })
        .await
        .unwrap_err();
    assert_eq!(
        missing.to_string(),
        "validation error: Missing required field: description"
    );

    let bad_source = intake
        .submit(IntakeSubmission {
            source: Some("Email".into()),
            ..submission("t", "d")
        })
        .await
        .unwrap_err();
    assert!(bad_source.to_string().contains("Invalid source"));

    let bad_urgency = intake
        .submit(IntakeSubmission {
            urgency: Some("high".into()),
            ..submission("t", "d")
        })
        .await
        .unwrap_err();
    assert!(bad_urgency.to_string().contains("Invalid urgency"));
}

#[tokio::test]
async fn intake_patch_ignores_invalid_values() {
    let harness = TestHarness::builder().build().await.unwrap();
    let intake = &harness.services.intake;
    let ticket = intake.submit(submission("Printer", "toner")).await.unwrap();

    let updated = intake
        .update(
            &ticket.ticket_id,
            IntakePatch {
                status: Some("closed".into()),
                urgency: Some("Critical".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TicketStatus::Open);
    assert_eq!(updated.urgency, Urgency::Critical);

    let resolved = intake
        .update(
            &ticket.ticket_id,
            IntakePatch {
                status: Some("resolved".into()),
                urgency: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, TicketStatus::Resolved);

    let filtered = intake
        .list(&IntakeFilter {
            status: Some("resolved".into()),
            ..IntakeFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);

    let missing = intake
        .update("IT-1999-001", IntakePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(missing, HelpdeskError::NotFound { .. }));
}

#[tokio::test]
async fn daily_report_goes_to_super_admin() {
    let harness = TestHarness::builder()
        .with_super_admin_email("ceo@gmail.com")
        .build()
        .await
        .unwrap();
    let employee = harness
        .create_user("emp@gmail.com", Role::Employee)
        .await
        .unwrap();
    let ticket = harness
        .services
        .tickets
        .create_ticket(&employee, "Crash", "App crashes")
        .await
        .unwrap()
        .ticket;
    harness
        .services
        .tickets
        .update_ticket(
            ticket.id,
            TicketUpdate {
                status: Some(TicketStatus::Resolved),
                remarks: Some("Reinstalled".into()),
                ..TicketUpdate::default()
            },
        )
        .await
        .unwrap();

    let reports = &harness.services.reports;
    let report = reports
        .build(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
        .await
        .unwrap();
    reports.send(&report).await.unwrap();

    let sent = harness.mock_notifier.sent_to("ceo@gmail.com");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Daily Helpdesk Summary");
    assert!(sent[0].body.starts_with("DAILY REPORT - 2026-06-01"));
    assert!(sent[0].body.contains("SOFTWARE: Open 0 | Resolved 1"));
}

#[tokio::test]
async fn report_without_recipient_is_a_config_error() {
    let harness = TestHarness::builder().build().await.unwrap();
    let err = harness.services.reports.send_today().await.unwrap_err();
    assert!(matches!(err, HelpdeskError::Config(_)));
}

#[tokio::test]
async fn maintenance_commands() {
    let harness = TestHarness::builder().build().await.unwrap();
    let admin = &harness.services.admin;

    // Seeding twice keeps four categories.
    admin.seed_categories().await.unwrap();
    assert_eq!(admin.categories().await.unwrap().len(), 4);

    let manager = admin
        .create_manager("Head@gmail.com", "Head", "pw", "hardware")
        .await
        .unwrap();
    assert_eq!(manager.role, Role::Manager);
    assert_eq!(manager.email, "head@gmail.com");
    let linked = harness
        .storage
        .categories_for_user(manager.id)
        .await
        .unwrap();
    assert_eq!(linked[0].name, "hardware");

    let promoted = admin
        .create_manager("head@gmail.com", "ignored", "pw", "network")
        .await
        .unwrap();
    assert_eq!(promoted.id, manager.id);
    assert_eq!(
        harness
            .storage
            .categories_for_user(manager.id)
            .await
            .unwrap()
            .len(),
        2
    );

    assert!(matches!(
        admin.create_manager("x@gmail.com", "X", "pw", "knowledge").await,
        Err(HelpdeskError::NotFound { .. })
    ));

    let root = admin
        .create_super_admin("root@gmail.com", "Root", "first")
        .await
        .unwrap();
    let reset = admin
        .create_super_admin("root@gmail.com", "Root", "second")
        .await
        .unwrap();
    assert_eq!(root.id, reset.id);
    assert!(
        harness
            .services
            .accounts
            .login("root@gmail.com", "second")
            .await
            .is_ok()
    );

    let renamed = admin
        .set_role("head@gmail.com", Role::Agent, Some("Hardware Agent"))
        .await
        .unwrap();
    assert_eq!(renamed.role, Role::Agent);
    assert_eq!(renamed.name, "Hardware Agent");

    let removed = admin.remove_category("database").await.unwrap();
    assert_eq!(removed.name, "database");
    assert_eq!(admin.categories().await.unwrap().len(), 3);
    assert!(admin.remove_category("database").await.is_err());
}

#[tokio::test]
async fn chat_answers_blank_and_routes_intents() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec!["Try restarting the router.".into()])
        .build()
        .await
        .unwrap();
    let chat = &harness.services.chat;

    let blank = chat.respond("   ", &[]).await;
    assert_eq!(blank.text, "Say something!");
    assert_eq!(blank.redirect, None);

    let login = chat.respond("take me to login", &[]).await;
    assert_eq!(login.redirect.as_deref(), Some("/auth?tab=login"));

    let free = chat.respond("my wifi is slow", &[]).await;
    assert_eq!(free.text, "Try restarting the router.");
    assert_eq!(harness.mock_provider.request_count(), 1);
}
