// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared provider registry with snapshot reads and serialized mutations.
//!
//! The provider table lives in an [`ArcSwap`], so every read sees a complete
//! snapshot: a failover run started before a mutation keeps the provider list
//! it was given, and the mutation takes effect for the *next* run. Mutations
//! are serialized by a small guard mutex so concurrent configuration changes
//! cannot drop each other's updates on a multi-threaded runtime.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use parley_core::ParleyError;
use tracing::info;

use crate::model::{ProviderConfig, default_providers};

/// Holds the set of configured AI providers.
///
/// Pure in-memory state; persistence (if any) is the caller's concern via
/// [`crate::loader::save_config`].
pub struct ProviderRegistry {
    providers: ArcSwap<Vec<ProviderConfig>>,
    write_guard: Mutex<()>,
}

impl ProviderRegistry {
    /// Create a registry from an initial provider table (typically the
    /// `[[providers]]` section of the loaded config).
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        Self {
            providers: ArcSwap::from_pointee(providers),
            write_guard: Mutex::new(()),
        }
    }

    /// Returns all known providers, enabled or not.
    pub fn list(&self) -> Vec<ProviderConfig> {
        self.providers.load().as_ref().clone()
    }

    /// Returns enabled providers sorted ascending by `(priority, id)`.
    ///
    /// The returned list is a snapshot; registry mutations after this call
    /// do not affect it.
    pub fn enabled_ordered(&self) -> Vec<ProviderConfig> {
        let mut enabled: Vec<ProviderConfig> = self
            .providers
            .load()
            .iter()
            .filter(|p| p.enabled)
            .cloned()
            .collect();
        enabled.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(&b.id))
        });
        enabled
    }

    /// Enable or disable a provider.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), ParleyError> {
        self.mutate(id, |p| p.enabled = enabled)?;
        info!(provider_id = id, enabled, "provider enablement changed");
        Ok(())
    }

    /// Change a provider's priority (1 = highest).
    pub fn set_priority(&self, id: &str, priority: u32) -> Result<(), ParleyError> {
        self.mutate(id, |p| p.priority = priority)?;
        info!(provider_id = id, priority, "provider priority changed");
        Ok(())
    }

    /// Set or replace a provider's API credential.
    pub fn set_credential(&self, id: &str, api_key: String) -> Result<(), ParleyError> {
        self.mutate(id, move |p| p.api_key = Some(api_key))?;
        // The credential itself is never logged.
        info!(provider_id = id, "provider credential updated");
        Ok(())
    }

    /// Restore the built-in default provider set, discarding all overrides.
    pub fn reset_to_defaults(&self) {
        let _guard = self.write_guard.lock().expect("registry guard poisoned");
        self.providers.store(Arc::new(default_providers()));
        info!("provider registry reset to defaults");
    }

    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut ProviderConfig),
    ) -> Result<(), ParleyError> {
        let _guard = self.write_guard.lock().expect("registry guard poisoned");
        let mut next = self.providers.load().as_ref().clone();
        let entry = next
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ParleyError::UnknownProvider { id: id.to_string() })?;
        f(entry);
        self.providers.store(Arc::new(next));
        Ok(())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(default_providers())
    }
}
