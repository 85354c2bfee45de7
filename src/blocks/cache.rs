// SPDX-License-Identifier: Apache-2.0

//! In-memory cache of resolved blocks, keyed by block number
//!
//! The block finder funnels every ledger fetch through this cache so that a
//! block number is never requested from the ledger twice. Entries are kept
//! in number order and inserts are idempotent: block content at a given
//! number is immutable once finalized, so a later write of an already-cached
//! number is a no-op rather than an overwrite.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::ledger::Block;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits (block already known)
    pub hits: u64,
    /// Number of cache misses (block had to be fetched)
    pub misses: u64,
    /// Current number of cached blocks
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Internal state: cached blocks plus statistics
#[derive(Debug, Default)]
struct BlockCacheState {
    /// Blocks by number; BTreeMap keeps them sorted and deduplicated
    blocks: BTreeMap<u64, Block>,
    stats: CacheStats,
}

/// Thread-safe block cache with idempotent inserts
///
/// Owned by one [`BlockFinder`](crate::BlockFinder); sharing the cache
/// across price feeds means sharing the finder itself.
#[derive(Debug, Default)]
pub struct BlockCache {
    state: Mutex<BlockCacheState>,
}

impl BlockCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached block at `number`, if known
    ///
    /// Counts a hit or miss in the statistics either way.
    pub async fn get(&self, number: u64) -> Option<Block> {
        let mut state = self.state.lock().await;
        let found = state.blocks.get(&number).copied();
        if found.is_some() {
            state.stats.hits += 1;
            debug!(number, "Block cache hit");
        } else {
            state.stats.misses += 1;
            debug!(number, "Block cache miss");
        }
        found
    }

    /// Inserts a block, keyed by its number
    ///
    /// Idempotent: if the number is already cached the existing entry is
    /// kept untouched. Concurrent insert-if-absent of the same number is
    /// therefore safe.
    pub async fn insert(&self, block: Block) {
        let mut state = self.state.lock().await;
        state.blocks.entry(block.number).or_insert(block);
        state.stats.entries = state.blocks.len();
    }

    /// Returns current cache statistics
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        state.stats.clone()
    }
}
