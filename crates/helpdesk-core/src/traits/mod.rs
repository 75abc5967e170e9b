// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every external collaborator (database, language model, counter store,
//! mail relay) sits behind one of these traits and is injected as an
//! `Arc<dyn Trait>` by the binary.

pub mod adapter;
pub mod counter;
pub mod notifier;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use counter::CounterAdapter;
pub use notifier::NotifierAdapter;
pub use provider::ProviderAdapter;
pub use storage::StorageAdapter;
