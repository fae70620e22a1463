// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP chat-completions provider adapter.
//!
//! Provides [`HttpChatProvider`], a [`parley_core::ProviderAdapter`] over a
//! chat-completions style JSON API with bearer-token auth. The exact wire
//! schema beyond `{model, messages, max_tokens}` → `{choices}` is the
//! upstream service's concern.

pub mod client;
pub mod types;

pub use client::HttpChatProvider;
