// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session and message store.
//!
//! Owns the `Session` and `Message` entities. Per session, the message log
//! is append-only with one controlled exception: a placeholder message may
//! be upgraded in place, exactly once, via [`SessionStore::patch_message`].
//!
//! The store is an explicit instance injected into the API facade and the
//! enhancement worker; tests construct as many independent stores as they
//! need.

use std::collections::HashMap;

use chrono::Utc;
use parley_core::{Message, MessageState, ParleyError, Role, Session, SessionInit, SessionStatus};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a patch attempt.
///
/// `AlreadyFinal` and `NotFound` are soft outcomes, not errors: a duplicate
/// or late enhancement completion, or one racing a session deletion, must
/// resolve silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The placeholder was upgraded to final content.
    Upgraded,
    /// The message was already final; content left unchanged.
    AlreadyFinal,
    /// The session or message no longer exists.
    NotFound,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Vec<Message>>,
}

/// Owns all sessions and their message logs.
pub struct SessionStore {
    inner: RwLock<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Create a new active session.
    pub async fn create_session(&self, init: SessionInit) -> Session {
        let now = Utc::now();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            title: init
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "New conversation".to_string()),
            initial_idea: init.initial_idea,
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.messages.insert(session.id.clone(), Vec::new());
        inner.sessions.insert(session.id.clone(), session.clone());
        debug!(session_id = %session.id, "session created");
        session
    }

    /// Fetch a session by id.
    pub async fn get_session(&self, id: &str) -> Result<Session, ParleyError> {
        self.inner
            .read()
            .await
            .sessions
            .get(id)
            .cloned()
            .ok_or_else(|| ParleyError::UnknownSession { id: id.to_string() })
    }

    /// All sessions, newest first.
    pub async fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> =
            self.inner.read().await.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    /// Append a message to a session's log.
    pub async fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: String,
        state: MessageState,
    ) -> Result<Message, ParleyError> {
        let mut inner = self.inner.write().await;
        let session = inner.sessions.get_mut(session_id).ok_or_else(|| {
            ParleyError::UnknownSession {
                id: session_id.to_string(),
            }
        })?;
        session.updated_at = Utc::now();

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            role,
            content,
            state,
            created_at: Utc::now(),
        };
        inner
            .messages
            .get_mut(session_id)
            .expect("message log exists for every live session")
            .push(message.clone());
        Ok(message)
    }

    /// Upgrade a placeholder message in place.
    ///
    /// Only the `Placeholder -> Final` transition exists. Patching an
    /// already-final message is a no-op (`AlreadyFinal`), so duplicate or
    /// late completions are harmless; a missing session or message resolves
    /// to `NotFound` so a completion racing `delete_session` abandons
    /// silently.
    pub async fn patch_message(
        &self,
        session_id: &str,
        message_id: &str,
        new_content: String,
    ) -> PatchOutcome {
        let mut inner = self.inner.write().await;
        let Some(log) = inner.messages.get_mut(session_id) else {
            return PatchOutcome::NotFound;
        };
        let Some(message) = log.iter_mut().find(|m| m.id == message_id) else {
            return PatchOutcome::NotFound;
        };
        if message.state == MessageState::Final {
            return PatchOutcome::AlreadyFinal;
        }

        message.content = new_content;
        message.state = MessageState::Final;
        if let Some(session) = inner.sessions.get_mut(session_id) {
            session.updated_at = Utc::now();
        }
        PatchOutcome::Upgraded
    }

    /// A session's messages in append order.
    pub async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, ParleyError> {
        self.inner
            .read()
            .await
            .messages
            .get(session_id)
            .cloned()
            .ok_or_else(|| ParleyError::UnknownSession {
                id: session_id.to_string(),
            })
    }

    /// Remove a session and its messages.
    ///
    /// In-flight enhancement tasks for the session observe
    /// [`PatchOutcome::NotFound`] afterwards and abandon their patch.
    pub async fn delete_session(&self, id: &str) -> Result<(), ParleyError> {
        let mut inner = self.inner.write().await;
        inner
            .sessions
            .remove(id)
            .ok_or_else(|| ParleyError::UnknownSession { id: id.to_string() })?;
        inner.messages.remove(id);
        debug!(session_id = id, "session deleted");
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
