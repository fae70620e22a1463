// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entities and common types used across the Parley workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The author of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Delivery state of an assistant message.
///
/// A `Placeholder` is the immediately-returned heuristic reply; it may be
/// upgraded to `Final` exactly once by the enhancement worker. `Final` is
/// terminal. User messages are always `Final`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageState {
    Placeholder,
    Final,
}

/// Lifecycle status of a conversation session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Archived,
}

/// A conversation session.
///
/// Owned exclusively by the session store; ids are opaque and unique for the
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub initial_idea: Option<String>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a session.
///
/// Within a session, message order is the append order. Position is fixed at
/// append time; only the *content* of a placeholder may change later, in
/// place, when enhancement completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub state: MessageState,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInit {
    /// Session title; a default is filled in when absent.
    pub title: Option<String>,
    /// The idea or question that opened the conversation, used to seed the
    /// provider system prompt.
    pub initial_idea: Option<String>,
}

/// One turn of conversation history, as sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// The full conversation context handed to the failover executor.
///
/// Providers receive the system prompt, the prior turns in order, and a
/// token cap; everything else (wire schema, auth) is provider-specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPayload {
    pub system: Option<String>,
    pub turns: Vec<ChatTurn>,
    pub max_tokens: u32,
}
