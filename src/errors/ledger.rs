//! Shared error types for ledger accessor operations.
//!
//! This module provides error types for failures that can occur when reading
//! block data from a chain, whatever the concrete accessor (RPC provider,
//! mock, replayed fixture).

use crate::ledger::BlockRef;

/// Errors that can occur when reading from the ledger.
///
/// These are transient accessor failures: the block finder and the price
/// feed propagate them untouched so that callers (or their schedulers) can
/// apply whatever retry policy they want.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The accessor call itself failed.
    ///
    /// This covers network errors, timeouts, rate limiting and provider
    /// downtime. The referenced block may well exist; the read just did not
    /// complete.
    #[error("Failed to fetch block {at}")]
    GetBlockFailed {
        /// The block we tried to fetch
        at: BlockRef,
        /// The underlying accessor error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The accessor answered but the referenced block does not exist.
    ///
    /// This can occur when the reference is beyond the chain tip or the
    /// accessor has not synced that far yet.
    #[error("Block not found: {at}")]
    BlockNotFound {
        /// The block reference that resolved to nothing
        at: BlockRef,
    },
}

impl LedgerError {
    /// Create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        at: BlockRef,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        LedgerError::GetBlockFailed {
            at,
            source: Box::new(source),
        }
    }
}
