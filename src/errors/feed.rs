//! Error types for price feed queries.
//!
//! These errors are only ever surfaced by explicit query operations
//! ([`PriceFeed::historical_price`](crate::PriceFeed::historical_price));
//! the scheduled `refresh` path reports failures through tracing and never
//! propagates them.

use super::BlockFinderError;
use crate::feed::sampler::SamplerError;

/// Errors that can occur when answering a price query.
#[derive(Debug, thiserror::Error)]
pub enum PriceFeedError {
    /// Timestamp-to-block resolution failed.
    ///
    /// This wraps [`BlockFinderError`], covering both out-of-range
    /// timestamps and ledger accessor failures during the search.
    #[error("Block resolution failed: {0}")]
    Resolve(#[from] BlockFinderError),

    /// Sampling the oracle at the resolved block failed.
    ///
    /// This wraps [`SamplerError`]: either the oracle call did not complete,
    /// or it returned a value the feed's transform could not turn into a
    /// price.
    #[error("Oracle sampling failed: {0}")]
    Sampling(#[from] SamplerError),
}

impl PriceFeedError {
    /// True when the failure was an out-of-range timestamp rather than a
    /// transient accessor problem.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, PriceFeedError::Resolve(e) if e.is_out_of_range())
    }
}
