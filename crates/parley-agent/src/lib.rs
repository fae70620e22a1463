// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session management and response orchestration for Parley.
//!
//! This crate ties the leaf components together:
//! - [`SessionStore`] owns sessions and their append-only message logs
//! - [`SessionApi`] is the facade the UI layer calls; `send_message` returns
//!   a placeholder synchronously
//! - [`EnhancementWorker`] upgrades placeholders in the background via cache
//!   lookup and provider failover
//! - [`Notifier`] broadcasts upgrades to per-session subscribers

pub mod api;
pub mod notifier;
pub mod store;
pub mod worker;

pub use api::SessionApi;
pub use notifier::{MessageUpdate, Notifier};
pub use store::{PatchOutcome, SessionStore};
pub use worker::{EnhancementWorker, OrchestrationPolicy};
