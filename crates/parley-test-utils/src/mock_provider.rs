// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with a scripted behavior
//! queue and a call counter, enabling fast, CI-runnable tests of failover
//! order, short-circuiting, and cache hits without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parley_core::{ConversationPayload, ParleyError, ProviderAdapter};
use tokio::sync::Mutex;

/// One scripted call outcome.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this completion text.
    Reply(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Sleep for the duration, then reply; pair with a short provider
    /// timeout to simulate a timed-out call.
    Stall(Duration),
}

/// A mock provider that pops behaviors from a FIFO script.
///
/// When the script is empty, a default "mock reply" is returned. Every
/// `complete` call increments the counter, whether it succeeds or not.
pub struct MockProvider {
    id: String,
    script: Mutex<VecDeque<MockBehavior>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider with an empty script.
    pub fn new(id: &str) -> Arc<Self> {
        Self::with_script(id, Vec::new())
    }

    /// Create a mock provider pre-loaded with the given behaviors.
    pub fn with_script(id: &str, script: Vec<MockBehavior>) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            script: Mutex::new(VecDeque::from(script)),
            calls: AtomicUsize::new(0),
        })
    }

    /// Append a behavior to the end of the script.
    pub async fn push_behavior(&self, behavior: MockBehavior) {
        self.script.lock().await.push_back(behavior);
    }

    /// Number of `complete` calls made against this provider.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn complete(&self, _payload: &ConversationPayload) -> Result<String, ParleyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockBehavior::Reply("mock reply".to_string()));

        match behavior {
            MockBehavior::Reply(text) => Ok(text),
            MockBehavior::Fail(message) => Err(ParleyError::Provider {
                message,
                source: None,
            }),
            MockBehavior::Stall(duration) => {
                tokio::time::sleep(duration).await;
                Ok("stalled reply".to_string())
            }
        }
    }
}
