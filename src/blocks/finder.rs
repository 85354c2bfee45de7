//! Timestamp-to-block resolution over a ledger accessor
//!
//! [`BlockFinder`] answers "which block corresponds to timestamp T": the
//! latest block whose timestamp does not exceed T, with plateau ties broken
//! toward the earliest block carrying that timestamp. Every probed block is
//! fetched through an idempotent cache so repeated resolutions in an
//! already-bracketed region cost no further ledger round-trips.
//!
//! # Examples
//!
//! ```rust,ignore
//! use oraclefeed::{AlloyLedger, BlockFinder, UnixTimestamp};
//! use std::sync::Arc;
//!
//! let finder = Arc::new(BlockFinder::new(Arc::new(AlloyLedger::new(provider))));
//!
//! let block = finder.resolve(UnixTimestamp(1_700_000_000)).await?;
//! println!("block {} sealed at {}", block.number, block.timestamp);
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::blocks::cache::{BlockCache, CacheStats};
use crate::errors::{BlockFinderError, LedgerError};
use crate::ledger::{Block, BlockRef, Ledger, UnixTimestamp};
use crate::tracing::spans;

/// Maps timestamps to blocks with as few ledger round-trips as possible
///
/// One finder owns one cache. To amortize ledger queries across several
/// price feeds reading the same chain, share a single finder behind an
/// [`Arc`] and pass the clone to each feed at construction.
pub struct BlockFinder {
    ledger: Arc<dyn Ledger>,
    cache: BlockCache,
}

impl BlockFinder {
    /// Creates a finder over the given ledger accessor with an empty cache
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            cache: BlockCache::new(),
        }
    }

    /// Returns current cache statistics
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Fetches the block at `number`, going to the ledger only on a cache miss
    ///
    /// Every ledger-fetched block is inserted into the cache, so no block
    /// number is ever requested from the ledger twice for the lifetime of
    /// this finder.
    async fn block_at(&self, number: u64) -> Result<Block, LedgerError> {
        if let Some(block) = self.cache.get(number).await {
            return Ok(block);
        }
        let block = self.ledger.block(BlockRef::Number(number)).await?;
        self.cache.insert(block).await;
        Ok(block)
    }

    /// Binary search for the last block with timestamp <= `target`
    ///
    /// - **Search space**: [0, latest_block]
    /// - **Invariant**: all blocks > hi have timestamp > target
    /// - **Result**: the largest block number with timestamp <= target,
    ///   or 0 if no block qualifies (the caller checks block 0 itself)
    async fn find_last_at_or_before(
        &self,
        target: UnixTimestamp,
        latest_block: u64,
    ) -> Result<u64, BlockFinderError> {
        let mut lo = 0u64;
        let mut hi = latest_block;
        let mut result = 0u64;

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let ts = self.block_at(mid).await?.timestamp;

            if ts <= target {
                // Candidate; keep looking right for later blocks that qualify
                result = mid;
                lo = mid + 1;
            } else {
                // Too late; search the left half
                if mid == 0 {
                    break;
                }
                hi = mid - 1;
            }
        }

        Ok(result)
    }

    /// Binary search for the first block with timestamp >= `target`
    ///
    /// Search space is [0, upper_block]; `upper_block` must already be known
    /// to satisfy the bound, so it doubles as the initial result.
    async fn find_first_at_or_after(
        &self,
        target: UnixTimestamp,
        upper_block: u64,
    ) -> Result<u64, BlockFinderError> {
        let mut lo = 0u64;
        let mut hi = upper_block;
        let mut result = upper_block;

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let ts = self.block_at(mid).await?.timestamp;

            if ts >= target {
                // Candidate; keep looking left for earlier blocks that qualify
                result = mid;
                if mid == 0 {
                    break;
                }
                hi = mid - 1;
            } else {
                // Too early; search the right half
                lo = mid + 1;
            }
        }

        Ok(result)
    }

    /// Resolves `target` to the block whose timestamp is the latest value
    /// not exceeding it
    ///
    /// When several consecutive blocks share that boundary timestamp, the
    /// one with the lowest number is returned, so resolution is
    /// deterministic under timestamp plateaus.
    ///
    /// # Errors
    ///
    /// - [`BlockFinderError::AfterHead`] if `target` is later than the chain
    ///   head's timestamp
    /// - [`BlockFinderError::BeforeHistory`] if `target` predates the first
    ///   block
    /// - [`BlockFinderError::Ledger`] if the ledger accessor fails; the
    ///   search is abandoned without internal retry
    ///
    /// # Complexity
    ///
    /// O(log n) ledger round-trips on a cold cache, where n is the chain
    /// height; zero round-trips once the surrounding region is cached.
    pub async fn resolve(&self, target: UnixTimestamp) -> Result<Block, BlockFinderError> {
        let span = spans::resolve_block(target);
        let _guard = span.enter();

        // One head fetch per resolution seeds the upper search bound and
        // rejects future timestamps.
        let head = self.ledger.block(BlockRef::Latest).await?;
        self.cache.insert(head).await;

        if target > head.timestamp {
            return Err(BlockFinderError::AfterHead {
                target,
                head: head.timestamp,
            });
        }

        let boundary_number = self.find_last_at_or_before(target, head.number).await?;
        let boundary = self.block_at(boundary_number).await?;

        // The search bottoms out at block 0 when every block is too late.
        if boundary.timestamp > target {
            return Err(BlockFinderError::BeforeHistory {
                target,
                genesis: boundary.timestamp,
            });
        }

        // Plateau tie-break: walk back to the first block sealed at the
        // boundary timestamp.
        let first_number = self
            .find_first_at_or_after(boundary.timestamp, boundary.number)
            .await?;
        let resolved = self.block_at(first_number).await?;

        debug!(
            target = %target,
            number = resolved.number,
            timestamp = %resolved.timestamp,
            "Resolved timestamp to block"
        );

        Ok(resolved)
    }
}
