// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background enhancement of placeholder messages.
//!
//! The worker owns the asynchronous half of the two-phase delivery model:
//! `send_message` returns a placeholder synchronously, then a tracked
//! background task fetches the real answer (cache first, then failover
//! across providers) and patches the placeholder in place.
//!
//! Every failure mode on this path is absorbed: the user already has a
//! response, so the worst outcome is that the placeholder is never upgraded.

use std::sync::Arc;

use parley_cache::{ResponseCache, make_key};
use parley_config::ProviderRegistry;
use parley_core::ConversationPayload;
use parley_failover::FailoverExecutor;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::notifier::{MessageUpdate, Notifier};
use crate::store::{PatchOutcome, SessionStore};

/// Policy switches for the single orchestration core.
///
/// There is exactly one enhancement path; variants of it are expressed here
/// rather than as parallel implementations.
#[derive(Debug, Clone, Copy)]
pub struct OrchestrationPolicy {
    /// Consult and populate the response cache.
    pub cache_enabled: bool,
    /// Use keyword-matched quick replies for placeholders; when false the
    /// facade uses a fixed acknowledgment instead.
    pub quick_enabled: bool,
}

impl Default for OrchestrationPolicy {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            quick_enabled: true,
        }
    }
}

/// Schedules and runs enhancement tasks.
pub struct EnhancementWorker {
    store: Arc<SessionStore>,
    cache: Arc<ResponseCache>,
    registry: Arc<ProviderRegistry>,
    executor: Arc<FailoverExecutor>,
    notifier: Arc<Notifier>,
    policy: OrchestrationPolicy,
    tasks: TaskTracker,
}

impl EnhancementWorker {
    pub fn new(
        store: Arc<SessionStore>,
        cache: Arc<ResponseCache>,
        registry: Arc<ProviderRegistry>,
        executor: Arc<FailoverExecutor>,
        notifier: Arc<Notifier>,
        policy: OrchestrationPolicy,
    ) -> Self {
        Self {
            store,
            cache,
            registry,
            executor,
            notifier,
            policy,
            tasks: TaskTracker::new(),
        }
    }

    /// Fire-and-forget: spawn the enhancement task for one placeholder and
    /// return immediately.
    ///
    /// `user_input` and `context` feed the cache key; `payload` is the full
    /// conversation handed to providers on a cache miss. Each task is scoped
    /// to its own `message_id`, so a stale completion can never touch a
    /// newer message.
    pub fn schedule(
        &self,
        session_id: String,
        message_id: String,
        user_input: String,
        context: Option<String>,
        payload: ConversationPayload,
    ) {
        let store = Arc::clone(&self.store);
        let cache = Arc::clone(&self.cache);
        let registry = Arc::clone(&self.registry);
        let executor = Arc::clone(&self.executor);
        let notifier = Arc::clone(&self.notifier);
        let policy = self.policy;

        self.tasks.spawn(async move {
            let cache_key = make_key(&session_id, &user_input, context.as_deref());

            if policy.cache_enabled
                && let Some(content) = cache.get(&cache_key).await
            {
                debug!(session_id = %session_id, "cache hit, patching immediately");
                apply_patch(&store, &notifier, &session_id, &message_id, content).await;
                return;
            }

            // The provider list is a snapshot: registry mutations after this
            // point affect the next run, not this one.
            let providers = registry.enabled_ordered();
            match executor.execute(&providers, &payload).await {
                Ok(result) => {
                    info!(
                        session_id = %session_id,
                        provider_id = %result.provider_id,
                        latency_ms = result.latency_ms,
                        "enhancement succeeded"
                    );
                    if policy.cache_enabled {
                        cache.put(cache_key, result.content.clone()).await;
                    }
                    apply_patch(&store, &notifier, &session_id, &message_id, result.content)
                        .await;
                }
                Err(e) => {
                    // Degraded terminal state: the quick reply stays as the
                    // visible content. Nothing propagates to the UI.
                    warn!(
                        session_id = %session_id,
                        error = %e,
                        "enhancement failed, leaving placeholder"
                    );
                }
            }
        });
    }

    /// Wait until all in-flight enhancement tasks have finished.
    ///
    /// Used by tests and shutdown paths; new tasks may be scheduled again
    /// afterwards.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

async fn apply_patch(
    store: &SessionStore,
    notifier: &Notifier,
    session_id: &str,
    message_id: &str,
    content: String,
) {
    match store
        .patch_message(session_id, message_id, content.clone())
        .await
    {
        PatchOutcome::Upgraded => {
            notifier.emit(MessageUpdate {
                session_id: session_id.to_string(),
                message_id: message_id.to_string(),
                content,
            });
        }
        PatchOutcome::AlreadyFinal => {
            debug!(
                session_id,
                message_id, "duplicate enhancement completion ignored"
            );
        }
        PatchOutcome::NotFound => {
            debug!(
                session_id,
                message_id, "session gone mid-flight, abandoning patch"
            );
        }
    }
}
