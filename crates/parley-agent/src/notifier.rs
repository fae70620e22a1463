// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped publish/subscribe channel for message upgrades.
//!
//! Each session gets its own broadcast channel, created lazily on first
//! subscribe or emit, so independent sessions (and independent tests) never
//! cross-talk. Delivery is best-effort with no replay: a subscriber that
//! joins after an emit reads the already-patched store state instead.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast channel depth per session. Updates are small and consumed
/// promptly; lagging receivers lose the oldest updates, which is acceptable
/// for a best-effort channel.
const CHANNEL_CAPACITY: usize = 64;

/// Notification that a placeholder message was upgraded.
#[derive(Debug, Clone)]
pub struct MessageUpdate {
    pub session_id: String,
    pub message_id: String,
    pub content: String,
}

/// Per-session broadcast of [`MessageUpdate`]s.
pub struct Notifier {
    channels: RwLock<HashMap<String, broadcast::Sender<MessageUpdate>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to updates for one session. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self, session_id: &str) -> broadcast::Receiver<MessageUpdate> {
        let mut channels = self.channels.write().expect("notifier lock poisoned");
        channels
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Deliver an update to all current subscribers of its session.
    ///
    /// Best-effort: with no subscribers (or no channel yet) the update is
    /// simply dropped.
    pub fn emit(&self, update: MessageUpdate) {
        let channels = self.channels.read().expect("notifier lock poisoned");
        if let Some(sender) = channels.get(&update.session_id) {
            let delivered = sender.send(update).map(|n| n > 0).unwrap_or(false);
            if !delivered {
                debug!("message update emitted with no subscribers");
            }
        }
    }

    /// Drop the channel for a deleted session, disconnecting its subscribers.
    pub fn remove_session(&self, session_id: &str) {
        self.channels
            .write()
            .expect("notifier lock poisoned")
            .remove(session_id);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
