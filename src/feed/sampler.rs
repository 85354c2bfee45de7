// SPDX-License-Identifier: Apache-2.0

//! Oracle sampling seam
//!
//! A [`Sampler`] reads the raw oracle value as it stood at a given block.
//! The provided [`OracleRelaySampler`] calls an on-chain `OracleRelay`
//! contract's `getRedemptionRate()` view pinned to the requested block;
//! tests substitute an in-memory sampler.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockId, BlockNumberOrTag};
use alloy_sol_types::sol;
use async_trait::async_trait;

use crate::feed::transform::PriceTransformError;
use crate::ledger::BlockRef;

sol! {
    #[sol(rpc)]
    interface IOracleRelay {
        function getRedemptionRate() external view returns (uint256);
    }
}

/// Errors that can occur when sampling the oracle
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// The oracle call did not complete.
    ///
    /// This covers node connectivity problems, rate limiting, and calls
    /// against blocks the node has pruned.
    #[error("Oracle call failed during {operation}")]
    Unavailable {
        /// Description of the call that failed (e.g. "getRedemptionRate at block 100")
        operation: String,
        /// The underlying call error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The oracle answered, but the value is unusable as a price.
    ///
    /// Examples: a value the configured transform rejects, or one that maps
    /// to a non-finite price.
    #[error("Malformed oracle value: {details}")]
    Malformed {
        /// What made the value unusable
        details: String,
    },
}

impl SamplerError {
    /// Helper to create an `Unavailable` error from any error type.
    pub fn unavailable(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SamplerError::Unavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}

impl From<PriceTransformError> for SamplerError {
    fn from(e: PriceTransformError) -> Self {
        SamplerError::Malformed { details: e.details }
    }
}

/// Reads the raw oracle value at a specific block
///
/// Implementations must not cache or retry; the feed decides when to sample
/// and the caller decides whether to retry a failed query.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Returns the raw oracle value as of the given block
    async fn sample_at(&self, at: BlockRef) -> Result<U256, SamplerError>;
}

/// [`Sampler`] reading a redemption rate from an `OracleRelay` contract
///
/// # Examples
///
/// ```rust,ignore
/// use oraclefeed::OracleRelaySampler;
/// use alloy_provider::ProviderBuilder;
///
/// let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
/// let sampler = OracleRelaySampler::new(relay_address, provider);
/// ```
pub struct OracleRelaySampler<P: Provider> {
    contract: IOracleRelay::IOracleRelayInstance<P>,
}

impl<P: Provider> OracleRelaySampler<P> {
    /// Creates a sampler for the `OracleRelay` deployed at `address`
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: IOracleRelay::new(address, provider),
        }
    }

    /// Address of the oracle contract being sampled
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl<P: Provider> Sampler for OracleRelaySampler<P> {
    async fn sample_at(&self, at: BlockRef) -> Result<U256, SamplerError> {
        let block_id = BlockId::from(BlockNumberOrTag::from(at));
        self.contract
            .getRedemptionRate()
            .block(block_id)
            .call()
            .await
            .map_err(|e| SamplerError::unavailable(format!("getRedemptionRate at block {at}"), e))
    }
}
