// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end orchestration tests: two-phase delivery, failover order,
//! caching, and race behavior across the assembled stack.

use std::time::Duration;

use parley_core::{MessageState, Role};
use parley_test_utils::{MockBehavior, MockProvider, TestHarness, test_provider_config};

/// Message order is the append order, regardless of when enhancement lands.
#[tokio::test]
async fn message_order_is_append_order() {
    let mock = MockProvider::new("p1");
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), mock)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    for text in ["one", "two", "three"] {
        harness
            .api
            .send_message(&session.id, text.to_string())
            .await
            .expect("send");
    }
    harness.settle().await;

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    assert_eq!(messages.len(), 6, "three user + three assistant messages");

    let user_contents: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(user_contents, vec!["one", "two", "three"]);

    // Roles alternate in append order: user, assistant, user, assistant...
    for (i, message) in messages.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role, expected, "position {i}");
    }
}

/// Priorities [2:A, 1:B, 3:C]: B is attempted first; when it succeeds,
/// A and C are never called.
#[tokio::test]
async fn failover_respects_priority_order_and_short_circuits() {
    let a = MockProvider::new("a");
    let b = MockProvider::with_script("b", vec![MockBehavior::Reply("from b".into())]);
    let c = MockProvider::new("c");

    let harness = TestHarness::builder()
        .with_provider(test_provider_config("a", 2, 1_000), a.clone())
        .with_provider(test_provider_config("b", 1, 1_000), b.clone())
        .with_provider(test_provider_config("c", 3, 1_000), c.clone())
        .build();

    let session = harness.api.create_session(Default::default()).await;
    let placeholder = harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send");
    harness.settle().await;

    assert_eq!(b.call_count(), 1);
    assert_eq!(a.call_count(), 0, "a must never be called");
    assert_eq!(c.call_count(), 0, "c must never be called");

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    let enhanced = messages.iter().find(|m| m.id == placeholder.id).expect("present");
    assert_eq!(enhanced.content, "from b");
    assert_eq!(enhanced.state, MessageState::Final);
}

/// Scenario A: p1 times out, p2 answers "ok"; the placeholder is returned
/// immediately and upgraded to "ok" once enhancement settles.
#[tokio::test]
async fn timeout_fails_over_to_next_provider() {
    let p1 = MockProvider::with_script(
        "p1",
        vec![MockBehavior::Stall(Duration::from_secs(3600))],
    );
    let p2 = MockProvider::with_script("p2", vec![MockBehavior::Reply("ok".into())]);

    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 50), p1.clone())
        .with_provider(test_provider_config("p2", 2, 1_000), p2.clone())
        .build();

    let session = harness.api.create_session(Default::default()).await;
    let placeholder = harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send");
    assert_eq!(placeholder.state, MessageState::Placeholder);
    assert!(!placeholder.content.is_empty(), "quick reply is immediate");

    harness.settle().await;

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    let enhanced = messages.iter().find(|m| m.id == placeholder.id).expect("present");
    assert_eq!(enhanced.content, "ok");
    assert_eq!(p1.call_count(), 1);
    assert_eq!(p2.call_count(), 1);
}

/// Scenario B / total failure: with no providers enabled, the placeholder
/// content survives enhancement unchanged and nothing is raised.
#[tokio::test]
async fn no_providers_enabled_leaves_placeholder() {
    let harness = TestHarness::builder().build();

    let session = harness.api.create_session(Default::default()).await;
    let placeholder = harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send never fails on provider state");
    harness.settle().await;

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    let last = messages.last().expect("placeholder present");
    assert_eq!(last.content, placeholder.content, "content unchanged");
    assert_eq!(last.state, MessageState::Placeholder, "degraded terminal state");
}

/// All providers failing (not just disabled) behaves the same way.
#[tokio::test]
async fn all_providers_failing_leaves_placeholder() {
    let p1 = MockProvider::with_script(
        "p1",
        vec![MockBehavior::Fail("500".into()), MockBehavior::Fail("500".into())],
    );
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1.clone())
        .with_retry_attempts(1)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    let placeholder = harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send");
    harness.settle().await;

    // 1 initial attempt + 1 retry, then degradation.
    assert_eq!(p1.call_count(), 2);
    let messages = harness.api.list_messages(&session.id).await.expect("list");
    assert_eq!(messages.last().expect("present").content, placeholder.content);
}

/// Scenario C: a repeated question hits the cache; the provider is called
/// exactly once across both sends.
#[tokio::test]
async fn repeated_question_hits_cache() {
    let p1 = MockProvider::with_script("p1", vec![MockBehavior::Reply("ANSWER".into())]);
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1.clone())
        .build();

    let session = harness.api.create_session(Default::default()).await;

    let first = harness
        .api
        .send_message(&session.id, "budget question".to_string())
        .await
        .expect("send");
    harness.settle().await;

    let second = harness
        .api
        .send_message(&session.id, "budget question".to_string())
        .await
        .expect("send");
    harness.settle().await;

    assert_eq!(p1.call_count(), 1, "second send must be served from cache");

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    for id in [&first.id, &second.id] {
        let message = messages.iter().find(|m| m.id == *id).expect("present");
        assert_eq!(message.content, "ANSWER");
        assert_eq!(message.state, MessageState::Final);
    }
}

/// With the cache disabled by policy, every send reaches the provider.
#[tokio::test]
async fn cache_disabled_calls_provider_every_time() {
    let p1 = MockProvider::new("p1");
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1.clone())
        .with_cache_enabled(false)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    for _ in 0..2 {
        harness
            .api
            .send_message(&session.id, "same question".to_string())
            .await
            .expect("send");
        harness.settle().await;
    }

    assert_eq!(p1.call_count(), 2);
}

/// Deleting the session while enhancement is in flight must not raise, and
/// the session stays gone.
#[tokio::test]
async fn deleted_session_race_is_silent() {
    let p1 = MockProvider::with_script(
        "p1",
        vec![MockBehavior::Stall(Duration::from_millis(50))],
    );
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send");

    // Delete before the stalled provider call resolves.
    harness.api.delete_session(&session.id).await.expect("delete");
    harness.settle().await;

    assert!(harness.api.list_sessions().await.is_empty());
    assert!(harness.api.get_session(&session.id).await.is_err());
}

/// A second send issued before the first enhancement completes gets its own
/// task; the slow completion patches its own message, not the newer one.
#[tokio::test]
async fn concurrent_sends_patch_their_own_messages() {
    let p1 = MockProvider::with_script(
        "p1",
        vec![
            MockBehavior::Stall(Duration::from_millis(80)),
            MockBehavior::Reply("second answer".into()),
        ],
    );
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1)
        .with_cache_enabled(false)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    let first = harness
        .api
        .send_message(&session.id, "first question".to_string())
        .await
        .expect("send");
    let second = harness
        .api
        .send_message(&session.id, "second question".to_string())
        .await
        .expect("send");
    harness.settle().await;

    let messages = harness.api.list_messages(&session.id).await.expect("list");
    let first_msg = messages.iter().find(|m| m.id == first.id).expect("present");
    let second_msg = messages.iter().find(|m| m.id == second.id).expect("present");

    // Which task pops which scripted behavior is a scheduling detail; the
    // invariant is that each placeholder was patched with its own task's
    // answer, with no cross-overwrite.
    assert_eq!(first_msg.state, MessageState::Final);
    assert_eq!(second_msg.state, MessageState::Final);
    let mut contents = [first_msg.content.as_str(), second_msg.content.as_str()];
    contents.sort_unstable();
    assert_eq!(contents, ["second answer", "stalled reply"]);
}

/// Subscribers receive an update when the placeholder is upgraded.
#[tokio::test]
async fn notifier_delivers_upgrade_to_subscriber() {
    let p1 = MockProvider::with_script("p1", vec![MockBehavior::Reply("enhanced".into())]);
    let harness = TestHarness::builder()
        .with_provider(test_provider_config("p1", 1, 1_000), p1)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    let mut updates = harness.notifier.subscribe(&session.id);

    let placeholder = harness
        .api
        .send_message(&session.id, "hi".to_string())
        .await
        .expect("send");
    harness.settle().await;

    let update = updates.recv().await.expect("update delivered");
    assert_eq!(update.session_id, session.id);
    assert_eq!(update.message_id, placeholder.id);
    assert_eq!(update.content, "enhanced");
}

/// Enablement changes take effect for the next enhancement run.
#[tokio::test]
async fn registry_mutation_applies_to_next_run() {
    let a = MockProvider::with_script("a", vec![MockBehavior::Reply("from a".into())]);
    let b = MockProvider::with_script("b", vec![MockBehavior::Reply("from b".into())]);

    let harness = TestHarness::builder()
        .with_provider(test_provider_config("a", 1, 1_000), a.clone())
        .with_provider(test_provider_config("b", 2, 1_000), b.clone())
        .with_cache_enabled(false)
        .build();

    let session = harness.api.create_session(Default::default()).await;
    harness
        .api
        .send_message(&session.id, "first".to_string())
        .await
        .expect("send");
    harness.settle().await;
    assert_eq!(a.call_count(), 1);

    harness.registry.set_enabled("a", false).expect("known id");

    harness
        .api
        .send_message(&session.id, "second".to_string())
        .await
        .expect("send");
    harness.settle().await;

    assert_eq!(a.call_count(), 1, "disabled provider is not attempted");
    assert_eq!(b.call_count(), 1);
}

/// Sending to an unknown session is the one synchronous, caller-visible error.
#[tokio::test]
async fn send_to_unknown_session_errors_synchronously() {
    let harness = TestHarness::builder().build();
    let err = harness
        .api
        .send_message("ghost", "hi".to_string())
        .await
        .expect_err("unknown session");
    assert!(err.to_string().contains("unknown session"));
}
