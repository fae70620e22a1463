// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parley orchestration layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Parley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Agent identity and prompt settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// The provider table. Defaults to the built-in provider set.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Failover policy shared by all providers.
    #[serde(default)]
    pub failover: FailoverConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Quick-response settings.
    #[serde(default)]
    pub quick: QuickConfig,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            providers: default_providers(),
            failover: FailoverConfig::default(),
            cache: CacheConfig::default(),
            quick: QuickConfig::default(),
        }
    }
}

/// Agent identity and prompt configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum tokens to request per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Inline system prompt override. When unset, the built-in prompt is used.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            max_tokens: default_max_tokens(),
            system_prompt: None,
        }
    }
}

fn default_agent_name() -> String {
    "parley".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

/// A single AI provider entry in the `[[providers]]` table.
///
/// Providers are never deleted at runtime, only disabled. Enabled providers
/// are attempted in ascending `(priority, id)` order; priorities need not be
/// unique.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Stable identifier, unique within the table.
    pub id: String,

    /// Human-readable name shown in settings surfaces.
    #[serde(default)]
    pub display_name: String,

    /// Whether this provider participates in failover.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Attempt order; 1 is highest. Ties break on `id`.
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// API credential. `None` means not yet configured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Completion endpoint URL.
    pub base_url: String,

    /// Model identifier sent on each request.
    pub model: String,

    /// Hard per-call deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Free-form description shown in settings surfaces.
    #[serde(default)]
    pub description: String,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> u32 {
    1
}

fn default_timeout_ms() -> u64 {
    15_000
}

/// The built-in default provider set.
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            id: "claude".to_string(),
            display_name: "Claude 3 Haiku".to_string(),
            enabled: true,
            priority: 1,
            api_key: None,
            base_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            timeout_ms: default_timeout_ms(),
            description: "Fast general-purpose model with strong comprehension".to_string(),
        },
        ProviderConfig {
            id: "deepseek".to_string(),
            display_name: "DeepSeek Chat".to_string(),
            enabled: true,
            priority: 2,
            api_key: None,
            base_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            timeout_ms: default_timeout_ms(),
            description: "Specialized coding and technical Q&A model".to_string(),
        },
    ]
}

/// Failover policy applied registry-wide, not per provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FailoverConfig {
    /// Additional attempts per provider after the first failure.
    ///
    /// Worst-case latency of a failover run is bounded by
    /// `sum(timeout_ms * (1 + retry_attempts))` across enabled providers.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
        }
    }
}

fn default_retry_attempts() -> u32 {
    1
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether enhancement consults and populates the cache.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Maximum number of cached answers (LRU-evicted beyond this).
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Optional entry lifetime in seconds. `None` retains until evicted.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            capacity: default_cache_capacity(),
            ttl_secs: None,
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    256
}

/// Quick-response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuickConfig {
    /// Whether keyword-matched quick replies are used for placeholders.
    /// When disabled, a fixed acknowledgment is used instead.
    #[serde(default = "default_quick_enabled")]
    pub enabled: bool,
}

impl Default for QuickConfig {
    fn default() -> Self {
        Self {
            enabled: default_quick_enabled(),
        }
    }
}

fn default_quick_enabled() -> bool {
    true
}
