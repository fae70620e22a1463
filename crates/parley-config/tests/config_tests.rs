// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Parley configuration system.

use parley_config::model::ParleyConfig;
use parley_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_parley_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"
max_tokens = 2048

[[providers]]
id = "primary"
display_name = "Primary"
priority = 1
api_key = "sk-123"
base_url = "https://primary.example/v1/chat"
model = "primary-large"
timeout_ms = 5000

[[providers]]
id = "backup"
priority = 2
base_url = "https://backup.example/v1/chat"
model = "backup-small"
enabled = false

[failover]
retry_attempts = 2

[cache]
enabled = true
capacity = 64
ttl_secs = 600

[quick]
enabled = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.max_tokens, 2048);
    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.providers[0].id, "primary");
    assert_eq!(config.providers[0].api_key.as_deref(), Some("sk-123"));
    assert_eq!(config.providers[0].timeout_ms, 5000);
    assert!(config.providers[0].enabled, "enabled defaults to true");
    assert!(!config.providers[1].enabled);
    assert_eq!(config.failover.retry_attempts, 2);
    assert_eq!(config.cache.capacity, 64);
    assert_eq!(config.cache.ttl_secs, Some(600));
    assert!(!config.quick.enabled);
}

/// Unknown field in [agent] produces an error naming the bad key.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in a [[providers]] entry produces an error.
#[test]
fn unknown_field_in_provider_produces_error() {
    let toml = r#"
[[providers]]
id = "p"
base_url = "https://p.example"
model = "m"
prioirty = 1
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("prioirty"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Empty TOML uses compiled defaults: persistence is optional by design.
#[test]
fn missing_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "parley");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.providers.len(), 2);
    assert_eq!(config.providers[0].id, "claude");
    assert_eq!(config.providers[1].id, "deepseek");
    assert_eq!(config.failover.retry_attempts, 1);
    assert!(config.cache.enabled);
    assert!(config.quick.enabled);
}

/// Dot-notation override (as produced by the PARLEY_ env provider) wins
/// over TOML values.
#[test]
fn env_style_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[agent]
name = "from-toml"
"#;

    let config: ParleyConfig = Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("agent.name", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.agent.name, "from-env");
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_rejects_duplicate_provider_ids() {
    let toml = r#"
[[providers]]
id = "same"
base_url = "https://a.example"
model = "m"

[[providers]]
id = "same"
base_url = "https://b.example"
model = "m"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject duplicates");
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("duplicate provider id")),
        "got: {errors:?}"
    );
}
