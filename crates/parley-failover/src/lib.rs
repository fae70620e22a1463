// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority-ordered provider failover.
//!
//! The [`FailoverExecutor`] walks an ordered provider list, bounding each
//! call with a hard deadline and a registry-wide retry budget, and returns
//! the first success or an aggregated failure.

pub mod executor;

pub use executor::{FailoverExecutor, ProviderCallResult};
