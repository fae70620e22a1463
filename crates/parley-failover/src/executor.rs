// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failover execution across an ordered provider list.
//!
//! The caller supplies providers already sorted by `(priority, id)` (see
//! `ProviderRegistry::enabled_ordered`); the executor attempts them in that
//! order and short-circuits on the first success. Worst-case latency is
//! bounded at `sum(timeout_ms * (1 + retry_attempts))` over the list.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parley_config::ProviderConfig;
use parley_core::{ConversationPayload, ParleyError, ProviderAdapter, ProviderFailure};
use tracing::{debug, warn};

/// Outcome of a successful failover run. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCallResult {
    /// Id of the provider that answered.
    pub provider_id: String,
    /// The completion text.
    pub content: String,
    /// Wall-clock latency of the winning call, in milliseconds.
    pub latency_ms: u64,
}

/// Attempts providers in the given order until one succeeds.
pub struct FailoverExecutor {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
    retry_attempts: u32,
}

impl FailoverExecutor {
    /// Create an executor with the registry-wide retry budget.
    ///
    /// `retry_attempts` is the number of *additional* attempts per provider
    /// after the first failure; 0 means one attempt per provider.
    pub fn new(retry_attempts: u32) -> Self {
        Self {
            adapters: HashMap::new(),
            retry_attempts,
        }
    }

    /// Register the adapter serving a provider id. Replaces any previous
    /// adapter with the same id.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.id().to_string(), adapter);
    }

    /// Attempt `providers` in order; return the first success.
    ///
    /// An empty list short-circuits to [`ParleyError::NoProvidersEnabled`]
    /// with zero network attempts. Each individual call is wrapped in a hard
    /// deadline of the provider's `timeout_ms`; a timed-out call is treated
    /// as a failure and failover proceeds. Once a provider succeeds, later
    /// providers are never called.
    pub async fn execute(
        &self,
        providers: &[ProviderConfig],
        payload: &ConversationPayload,
    ) -> Result<ProviderCallResult, ParleyError> {
        if providers.is_empty() {
            return Err(ParleyError::NoProvidersEnabled);
        }

        let mut failures = Vec::new();

        for provider in providers {
            let Some(adapter) = self.adapters.get(&provider.id) else {
                warn!(provider_id = %provider.id, "no adapter registered for provider");
                failures.push(ProviderFailure {
                    provider_id: provider.id.clone(),
                    error: "no adapter registered".to_string(),
                });
                continue;
            };

            let deadline = Duration::from_millis(provider.timeout_ms);
            let mut last_error = String::new();

            for attempt in 0..=self.retry_attempts {
                if attempt > 0 {
                    debug!(
                        provider_id = %provider.id,
                        attempt,
                        "retrying provider after failure"
                    );
                }

                let started = Instant::now();
                match tokio::time::timeout(deadline, adapter.complete(payload)).await {
                    Ok(Ok(content)) => {
                        let latency_ms = started.elapsed().as_millis() as u64;
                        debug!(
                            provider_id = %provider.id,
                            latency_ms,
                            attempt,
                            "provider call succeeded"
                        );
                        return Ok(ProviderCallResult {
                            provider_id: provider.id.clone(),
                            content,
                            latency_ms,
                        });
                    }
                    Ok(Err(e)) => {
                        warn!(
                            provider_id = %provider.id,
                            attempt,
                            error = %e,
                            "provider call failed"
                        );
                        last_error = e.to_string();
                    }
                    Err(_) => {
                        // The in-flight future is dropped at the deadline;
                        // nothing keeps the request alive past timeout_ms.
                        warn!(
                            provider_id = %provider.id,
                            attempt,
                            timeout_ms = provider.timeout_ms,
                            "provider call timed out"
                        );
                        last_error = ParleyError::Timeout { duration: deadline }.to_string();
                    }
                }
            }

            failures.push(ProviderFailure {
                provider_id: provider.id.clone(),
                error: last_error,
            });
        }

        Err(ParleyError::AllProvidersFailed { failures })
    }
}
