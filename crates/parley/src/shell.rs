// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive chat shell.
//!
//! Stands in for the out-of-scope UI layer: creates one session, sends each
//! line through the session API, prints the immediate placeholder reply, and
//! prints the enhanced answer when the notifier reports the upgrade.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use parley_agent::{
    EnhancementWorker, Notifier, OrchestrationPolicy, SessionApi, SessionStore,
};
use parley_cache::ResponseCache;
use parley_config::{ParleyConfig, ProviderRegistry};
use parley_core::{ParleyError, SessionInit};
use parley_failover::FailoverExecutor;
use parley_provider_http::HttpChatProvider;
use parley_quick::QuickResponseSelector;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

/// Assemble the orchestration stack from config and run the REPL.
pub async fn run(config: ParleyConfig) -> Result<(), ParleyError> {
    let store = Arc::new(SessionStore::new());
    let notifier = Arc::new(Notifier::new());
    let cache = Arc::new(ResponseCache::new(
        config.cache.capacity,
        config.cache.ttl_secs.map(Duration::from_secs),
    ));
    let registry = Arc::new(ProviderRegistry::new(config.providers.clone()));

    let mut executor = FailoverExecutor::new(config.failover.retry_attempts);
    for provider in &config.providers {
        match HttpChatProvider::from_config(provider) {
            Ok(adapter) => executor.register(Arc::new(adapter)),
            Err(e) => {
                warn!(provider_id = %provider.id, error = %e, "provider not usable, skipping");
            }
        }
    }

    let policy = OrchestrationPolicy {
        cache_enabled: config.cache.enabled,
        quick_enabled: config.quick.enabled,
    };
    let worker = Arc::new(EnhancementWorker::new(
        Arc::clone(&store),
        cache,
        Arc::clone(&registry),
        Arc::new(executor),
        Arc::clone(&notifier),
        policy,
    ));
    let api = SessionApi::new(
        store,
        QuickResponseSelector::built_in(),
        Arc::clone(&worker),
        Arc::clone(&notifier),
        policy.quick_enabled,
        config.agent.system_prompt.clone(),
        config.agent.max_tokens,
    );

    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Internal(format!("readline init failed: {e}")))?;

    println!(
        "{}",
        "parley shell -- describe your idea to start, 'exit' to quit".dimmed()
    );

    let idea = match rl.readline(&"idea> ".cyan().to_string()) {
        Ok(line) => line.trim().to_string(),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
        Err(e) => return Err(ParleyError::Internal(format!("readline failed: {e}"))),
    };

    let session = api
        .create_session(SessionInit {
            title: None,
            initial_idea: (!idea.is_empty()).then_some(idea),
        })
        .await;

    // Print enhanced answers as the notifier reports placeholder upgrades.
    let mut updates = notifier.subscribe(&session.id);
    tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            println!(
                "\n{} {}",
                "assistant (enhanced)>".green().bold(),
                update.content
            );
        }
    });

    loop {
        let line = match rl.readline(&"you> ".cyan().to_string()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                warn!(error = %e, "readline failed, leaving shell");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        let _ = rl.add_history_entry(line);

        match api.send_message(&session.id, line.to_string()).await {
            Ok(placeholder) => {
                println!("{} {}", "assistant>".yellow(), placeholder.content);
            }
            Err(e) => eprintln!("{} {e}", "error:".red()),
        }
    }

    // Let in-flight enhancements finish before tearing the process down.
    worker.settle().await;
    Ok(())
}
