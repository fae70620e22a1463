// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM provider integrations.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::types::ConversationPayload;

/// Adapter for an external AI completion service.
///
/// One adapter instance exists per configured provider; the failover
/// executor resolves adapters by [`id`](ProviderAdapter::id) and calls them
/// in priority order. Adapters perform exactly one request per `complete`
/// call — retry and timeout policy belong to the executor.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// The provider id this adapter serves, matching `ProviderConfig::id`.
    fn id(&self) -> &str;

    /// Sends the conversation to the provider and returns the completion text.
    async fn complete(&self, payload: &ConversationPayload) -> Result<String, ParleyError>;
}
