// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as unique provider ids and positive deadlines.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if config.agent.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "agent.max_tokens must be positive".to_string(),
        });
    }

    // Provider ids must be non-empty and unique; priorities may repeat.
    let mut seen_ids = HashSet::new();
    for (i, provider) in config.providers.iter().enumerate() {
        if provider.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("providers[{i}].id must not be empty"),
            });
            continue;
        }
        if !seen_ids.insert(&provider.id) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate provider id `{}` in [[providers]] array",
                    provider.id
                ),
            });
        }
        if provider.priority == 0 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "providers[{i}].priority must be at least 1 (1 = highest), got 0"
                ),
            });
        }
        if provider.timeout_ms == 0 {
            errors.push(ConfigError::Validation {
                message: format!("providers[{i}].timeout_ms must be positive"),
            });
        }
        if provider.base_url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("providers[{i}].base_url must not be empty"),
            });
        }
        if provider.model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("providers[{i}].model must not be empty"),
            });
        }
    }

    if config.cache.enabled && config.cache.capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.capacity must be positive when cache.enabled".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
