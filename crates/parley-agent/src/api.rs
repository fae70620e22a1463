// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session API facade consumed by UI layers.
//!
//! Session and message reads delegate straight to the store; the interesting
//! method is [`SessionApi::send_message`], which implements the synchronous
//! half of the two-phase delivery contract: it never awaits network I/O and
//! always returns a placeholder immediately.

use std::sync::Arc;

use parley_core::{
    ChatTurn, ConversationPayload, Message, MessageState, ParleyError, Role, Session,
    SessionInit,
};
use parley_quick::QuickResponseSelector;
use tracing::debug;

use crate::notifier::Notifier;
use crate::store::SessionStore;
use crate::worker::EnhancementWorker;

/// Placeholder text used when quick responses are disabled by policy.
const PLAIN_ACKNOWLEDGMENT: &str = "Working on it -- a fuller answer is on its way.";

/// Base system prompt for the provider conversation; the session's initial
/// idea is appended when present.
const SYSTEM_PROMPT: &str = "\
You are a seasoned product strategist and startup mentor. Through focused, \
progressive questions you help the user sharpen their idea across user \
value, market positioning, business model, technical path, and growth. \
Challenge assumptions, offer concrete frameworks and examples, and keep each \
reply moving the conversation forward with two or three pointed questions.";

/// The single entry point the UI layer talks to.
pub struct SessionApi {
    store: Arc<SessionStore>,
    quick: QuickResponseSelector,
    worker: Arc<EnhancementWorker>,
    notifier: Arc<Notifier>,
    quick_enabled: bool,
    system_prompt_override: Option<String>,
    max_tokens: u32,
}

impl SessionApi {
    pub fn new(
        store: Arc<SessionStore>,
        quick: QuickResponseSelector,
        worker: Arc<EnhancementWorker>,
        notifier: Arc<Notifier>,
        quick_enabled: bool,
        system_prompt_override: Option<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            store,
            quick,
            worker,
            notifier,
            quick_enabled,
            system_prompt_override,
            max_tokens,
        }
    }

    pub async fn create_session(&self, init: SessionInit) -> Session {
        self.store.create_session(init).await
    }

    pub async fn get_session(&self, id: &str) -> Result<Session, ParleyError> {
        self.store.get_session(id).await
    }

    pub async fn list_sessions(&self) -> Vec<Session> {
        self.store.list_sessions().await
    }

    pub async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, ParleyError> {
        self.store.list_messages(session_id).await
    }

    /// Remove a session, its messages, and its notification channel.
    pub async fn delete_session(&self, id: &str) -> Result<(), ParleyError> {
        self.store.delete_session(id).await?;
        self.notifier.remove_session(id);
        Ok(())
    }

    /// Append the user message and return a placeholder reply immediately.
    ///
    /// The placeholder's content is the quick response; enhancement is
    /// scheduled fire-and-forget, so this method completes without touching
    /// the network. On total provider failure the placeholder simply remains
    /// the visible answer.
    pub async fn send_message(
        &self,
        session_id: &str,
        content: String,
    ) -> Result<Message, ParleyError> {
        let session = self.store.get_session(session_id).await?;

        self.store
            .append_message(session_id, Role::User, content.clone(), MessageState::Final)
            .await?;

        // Build the provider conversation before appending the placeholder:
        // the heuristic reply must not appear as an assistant turn.
        let turns: Vec<ChatTurn> = self
            .store
            .list_messages(session_id)
            .await?
            .into_iter()
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content,
            })
            .collect();

        let quick_reply = if self.quick_enabled {
            self.quick.select(&content)
        } else {
            PLAIN_ACKNOWLEDGMENT.to_string()
        };

        let placeholder = self
            .store
            .append_message(
                session_id,
                Role::Assistant,
                quick_reply,
                MessageState::Placeholder,
            )
            .await?;

        debug!(
            session_id,
            message_id = %placeholder.id,
            "placeholder appended, scheduling enhancement"
        );

        let payload = ConversationPayload {
            system: Some(self.system_prompt(&session.initial_idea)),
            turns,
            max_tokens: self.max_tokens,
        };
        self.worker.schedule(
            session_id.to_string(),
            placeholder.id.clone(),
            content,
            session.initial_idea.clone(),
            payload,
        );

        Ok(placeholder)
    }

    fn system_prompt(&self, initial_idea: &Option<String>) -> String {
        let base = self
            .system_prompt_override
            .as_deref()
            .unwrap_or(SYSTEM_PROMPT);
        match initial_idea {
            Some(idea) if !idea.trim().is_empty() => {
                format!("{base}\n\nInitial project idea: {idea}")
            }
            _ => base.to_string(),
        }
    }
}
