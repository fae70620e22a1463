// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley orchestration layer.

use thiserror::Error;

/// A single provider's failure, recorded during failover.
///
/// Collected by the failover executor as it walks the priority-ordered
/// provider list; surfaced in aggregate via [`ParleyError::AllProvidersFailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Id of the provider that failed.
    pub provider_id: String,
    /// Human-readable failure description (network error, timeout, bad payload).
    pub error: String,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider_id, self.error)
    }
}

/// The primary error type used across all Parley crates.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A single LLM provider call failed (API failure, auth failure, malformed response).
    ///
    /// Consumed internally by the failover executor; never surfaced to the UI.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation referenced a session id that does not exist.
    #[error("unknown session: {id}")]
    UnknownSession { id: String },

    /// Configuration operation referenced an unregistered provider id.
    #[error("unknown provider: {id}")]
    UnknownProvider { id: String },

    /// Every enabled provider failed during a failover run.
    #[error("all {} enabled providers failed", failures.len())]
    AllProvidersFailed { failures: Vec<ProviderFailure> },

    /// The registry has no enabled providers; failover short-circuits without
    /// any network attempt.
    #[error("no providers enabled")]
    NoProvidersEnabled,

    /// A provider call exceeded its configured deadline.
    #[error("provider call timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
