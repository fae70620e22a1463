// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley conversational orchestration layer.
//!
//! This crate provides the foundational error type, entities, and the
//! provider adapter trait used throughout the Parley workspace.

pub mod error;
pub mod provider;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ParleyError, ProviderFailure};
pub use provider::ProviderAdapter;
pub use types::{
    ChatTurn, ConversationPayload, Message, MessageState, Role, Session, SessionInit,
    SessionStatus,
};
