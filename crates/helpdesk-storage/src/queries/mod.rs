// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions, one module per table group.

pub mod categories;
pub mod intake;
pub mod tickets;
pub mod users;
