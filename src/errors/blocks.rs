//! Error types for timestamp-to-block resolution.

use super::LedgerError;
use crate::ledger::UnixTimestamp;

/// Errors that can occur while resolving a timestamp to a block.
///
/// Resolution fails either because the requested timestamp falls outside the
/// ledger's known history (on either side) or because the ledger accessor
/// itself failed mid-search.
///
/// # Examples
///
/// ```rust,ignore
/// use oraclefeed::{BlockFinder, BlockFinderError};
///
/// match finder.resolve(target).await {
///     Ok(block) => println!("resolved to block {}", block.number),
///     Err(e) if e.is_out_of_range() => eprintln!("no block at {target}: {e}"),
///     Err(BlockFinderError::Ledger(e)) => eprintln!("ledger failure, will retry: {e}"),
///     Err(e) => eprintln!("unexpected: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BlockFinderError {
    /// The target timestamp is later than the chain head's timestamp.
    ///
    /// Resolving a future timestamp is undefined; callers should wait for
    /// the chain to catch up and retry.
    #[error("Timestamp {target} is after the latest ledger block at {head}")]
    AfterHead {
        /// The requested timestamp
        target: UnixTimestamp,
        /// Timestamp of the current chain head
        head: UnixTimestamp,
    },

    /// The target timestamp predates the first block of the ledger.
    #[error("Timestamp {target} is before the first ledger block at {genesis}")]
    BeforeHistory {
        /// The requested timestamp
        target: UnixTimestamp,
        /// Timestamp of the earliest known block
        genesis: UnixTimestamp,
    },

    /// The ledger accessor failed during the search.
    ///
    /// This wraps [`LedgerError`]; the search is abandoned, never retried
    /// internally.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl BlockFinderError {
    /// True when the requested timestamp falls outside the ledger's history
    /// (either in the future or before the first block).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            BlockFinderError::AfterHead { .. } | BlockFinderError::BeforeHistory { .. }
        )
    }
}
