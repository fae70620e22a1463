// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous quick-response selection.
//!
//! Produces the placeholder reply shown to the user while the real provider
//! answer is fetched in the background. Sits on the synchronous critical path
//! of `send_message`, so selection is pure: no network, no blocking I/O, no
//! await points.

use parley_core::ParleyError;
use rand::Rng;

/// One keyword-matched canned reply.
///
/// Rules are checked in order; the first rule whose keyword set intersects
/// the (lowercased) user input wins.
#[derive(Debug, Clone)]
pub struct QuickRule {
    /// Case-insensitive substrings that trigger this rule.
    pub keywords: Vec<String>,
    /// The canned reply returned on a match.
    pub response: String,
}

/// Selects an immediate, locally-computed placeholder reply.
pub struct QuickResponseSelector {
    rules: Vec<QuickRule>,
    generic_pool: Vec<String>,
}

impl QuickResponseSelector {
    /// Build a selector from an explicit rule table and generic fallback pool.
    ///
    /// Validated at construction: every rule needs at least one non-empty
    /// keyword and a non-empty response, and the generic pool must not be
    /// empty (it is the guaranteed fallback).
    pub fn new(rules: Vec<QuickRule>, generic_pool: Vec<String>) -> Result<Self, ParleyError> {
        for (i, rule) in rules.iter().enumerate() {
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ParleyError::Config(format!(
                    "quick rule {i} has an empty keyword set or blank keyword"
                )));
            }
            if rule.response.trim().is_empty() {
                return Err(ParleyError::Config(format!(
                    "quick rule {i} has an empty response"
                )));
            }
        }
        if generic_pool.is_empty() || generic_pool.iter().any(|r| r.trim().is_empty()) {
            return Err(ParleyError::Config(
                "quick generic pool must contain non-empty responses".to_string(),
            ));
        }
        Ok(Self {
            rules: rules
                .into_iter()
                .map(|r| QuickRule {
                    keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
                    response: r.response,
                })
                .collect(),
            generic_pool,
        })
    }

    /// Build a selector with the built-in rule table and generic pool.
    pub fn built_in() -> Self {
        Self::new(built_in_rules(), built_in_generic_pool())
            .expect("built-in rule table is valid")
    }

    /// Match `user_input` against the rule table; fall back to a uniform
    /// random draw from the generic pool.
    ///
    /// Selection here is intentionally non-deterministic on the fallback
    /// path, unlike cache keys.
    pub fn select(&self, user_input: &str) -> String {
        let lowered = user_input.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return rule.response.clone();
            }
        }
        let idx = rand::thread_rng().gen_range(0..self.generic_pool.len());
        self.generic_pool[idx].clone()
    }
}

impl Default for QuickResponseSelector {
    fn default() -> Self {
        Self::built_in()
    }
}

/// The built-in topic rules, checked in order.
fn built_in_rules() -> Vec<QuickRule> {
    let table: &[(&[&str], &str)] = &[
        (
            &["user", "audience", "customer", "persona", "segment"],
            "Understanding your users is the foundation here. A common trap is \
             assuming what users need instead of validating their actual pain \
             points. Let me map out your target audience in more depth -- a \
             fuller analysis is on its way.",
        ),
        (
            &["tech", "stack", "framework", "architecture", "develop"],
            "Technology choices should serve the business goal, not the other \
             way around. Let me work back from the value you want to deliver \
             toward a technical roadmap -- a fuller analysis is on its way.",
        ),
        (
            &["feature", "requirement", "scope", "module", "functionality"],
            "Strong products focus value rather than stack features. Let me \
             help prioritize what belongs in the core -- a fuller analysis is \
             on its way.",
        ),
        (
            &["budget", "cost", "price", "pricing", "investment"],
            "Cash flow decides how far a product gets to travel. Let me sketch \
             a lean spending plan for this -- a fuller analysis is on its way.",
        ),
        (
            &["timeline", "schedule", "milestone", "deadline", "roadmap"],
            "Timing often matters more than polish. Let me lay out milestones \
             that get you to market early -- a fuller analysis is on its way.",
        ),
        (
            &["competitor", "competition", "market", "differentiation", "rival"],
            "Competition is a map of opportunities, not a threat. Let me look \
             for the differentiation gaps -- a fuller analysis is on its way.",
        ),
        (
            &["business model", "revenue", "monetization", "profit"],
            "A product lives or dies by its business model. Let me outline a \
             sustainable revenue design -- a fuller analysis is on its way.",
        ),
    ];

    table
        .iter()
        .map(|(keywords, response)| QuickRule {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            response: response.to_string(),
        })
        .collect()
}

/// The built-in generic fallback pool.
fn built_in_generic_pool() -> Vec<String> {
    [
        "That has real potential. Let me take a closer look at the idea -- a \
         fuller analysis is on its way.",
        "Interesting direction. The key will be finding where user value and \
         business value meet -- a fuller analysis is on its way.",
        "I can see a differentiation opportunity in this. Let me dig into \
         where you could lead the niche -- a fuller analysis is on its way.",
        "Good starting point. Let me think through how this becomes something \
         users would pay for -- a fuller analysis is on its way.",
        "Products that matter start from a real pain point. Let me dig into \
         the underlying need here -- a fuller analysis is on its way.",
        "Solid insight. Execution will count for more than the idea itself, \
         so let me sketch a path from zero to one -- a fuller analysis is on \
         its way.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
