// SPDX-License-Identifier: Apache-2.0

//! Timestamp-to-block resolution.
//!
//! This module provides functionality for:
//! - Resolving a timestamp to the latest block sealed at or before it
//! - Caching resolved blocks so bracketed regions never re-query the ledger

pub mod cache;
mod finder;

// Re-export public API
pub use cache::{BlockCache, CacheStats};
pub use finder::BlockFinder;
