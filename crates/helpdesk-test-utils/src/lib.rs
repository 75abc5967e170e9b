// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for helpdesk integration tests.
//!
//! Mock adapters with scripted behaviour plus [`TestHarness`], which runs
//! the service layer against a temporary database.

pub mod harness;
pub mod mock_counter;
pub mod mock_notifier;
pub mod mock_provider;

pub use harness::{TEST_PASSWORD, TestHarness, TestHarnessBuilder};
pub use mock_counter::MockCounter;
pub use mock_notifier::MockNotifier;
pub use mock_provider::MockProvider;
