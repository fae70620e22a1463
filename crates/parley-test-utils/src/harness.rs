// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end orchestration testing.
//!
//! `TestHarness` assembles a complete orchestration stack — store, cache,
//! registry, failover executor, worker, notifier, API facade — around mock
//! providers. `settle()` awaits background enhancement so tests can assert
//! on the post-enhancement state deterministically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parley_agent::{EnhancementWorker, Notifier, OrchestrationPolicy, SessionApi, SessionStore};
use parley_cache::ResponseCache;
use parley_config::{ProviderConfig, ProviderRegistry};
use parley_core::ProviderAdapter;
use parley_failover::FailoverExecutor;
use parley_quick::QuickResponseSelector;

use crate::mock_provider::MockProvider;

/// Build a provider config entry suitable for tests.
pub fn test_provider_config(id: &str, priority: u32, timeout_ms: u64) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        display_name: id.to_uppercase(),
        enabled: true,
        priority,
        api_key: Some("test-key".to_string()),
        base_url: format!("https://{id}.example/v1/chat"),
        model: "test-model".to_string(),
        timeout_ms,
        description: String::new(),
    }
}

/// Builder for creating orchestration test environments.
pub struct TestHarnessBuilder {
    providers: Vec<ProviderConfig>,
    mocks: Vec<Arc<MockProvider>>,
    retry_attempts: u32,
    policy: OrchestrationPolicy,
    cache_capacity: usize,
    cache_ttl: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            providers: Vec::new(),
            mocks: Vec::new(),
            retry_attempts: 0,
            policy: OrchestrationPolicy::default(),
            cache_capacity: 64,
            cache_ttl: None,
        }
    }

    /// Register a provider config together with the mock serving its id.
    pub fn with_provider(mut self, config: ProviderConfig, mock: Arc<MockProvider>) -> Self {
        self.providers.push(config);
        self.mocks.push(mock);
        self
    }

    /// Set the registry-wide retry budget (default 0: one attempt each).
    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Toggle the response cache (default on).
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.policy.cache_enabled = enabled;
        self
    }

    /// Toggle keyword quick responses (default on).
    pub fn with_quick_enabled(mut self, enabled: bool) -> Self {
        self.policy.quick_enabled = enabled;
        self
    }

    /// Set the cache TTL (default: no expiry).
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Assemble the full stack.
    pub fn build(self) -> TestHarness {
        let store = Arc::new(SessionStore::new());
        let notifier = Arc::new(Notifier::new());
        let cache = Arc::new(ResponseCache::new(self.cache_capacity, self.cache_ttl));
        let registry = Arc::new(ProviderRegistry::new(self.providers));

        let mut executor = FailoverExecutor::new(self.retry_attempts);
        let mut mocks = HashMap::new();
        for mock in self.mocks {
            mocks.insert(mock.id().to_string(), Arc::clone(&mock));
            executor.register(mock);
        }

        let worker = Arc::new(EnhancementWorker::new(
            Arc::clone(&store),
            cache,
            Arc::clone(&registry),
            Arc::new(executor),
            Arc::clone(&notifier),
            self.policy,
        ));

        let api = SessionApi::new(
            Arc::clone(&store),
            QuickResponseSelector::built_in(),
            Arc::clone(&worker),
            Arc::clone(&notifier),
            self.policy.quick_enabled,
            None,
            256,
        );

        TestHarness {
            api,
            store,
            registry,
            notifier,
            worker,
            mocks,
        }
    }
}

/// A fully assembled orchestration stack around mock providers.
pub struct TestHarness {
    pub api: SessionApi,
    pub store: Arc<SessionStore>,
    pub registry: Arc<ProviderRegistry>,
    pub notifier: Arc<Notifier>,
    worker: Arc<EnhancementWorker>,
    mocks: HashMap<String, Arc<MockProvider>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The mock serving a provider id. Panics on unknown ids — a test bug.
    pub fn mock(&self, id: &str) -> &Arc<MockProvider> {
        self.mocks
            .get(id)
            .unwrap_or_else(|| panic!("no mock registered for provider `{id}`"))
    }

    /// Await all in-flight enhancement tasks.
    pub async fn settle(&self) {
        self.worker.settle().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_sends() {
        let mock = MockProvider::new("p1");
        let harness = TestHarness::builder()
            .with_provider(test_provider_config("p1", 1, 1_000), mock)
            .build();

        let session = harness
            .api
            .create_session(Default::default())
            .await;
        let placeholder = harness
            .api
            .send_message(&session.id, "hello".to_string())
            .await
            .expect("send succeeds");
        assert_eq!(placeholder.session_id, session.id);

        harness.settle().await;
        assert_eq!(harness.mock("p1").call_count(), 1);
    }
}
