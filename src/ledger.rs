//! Ledger access for block resolution
//!
//! This module defines the [`Ledger`] trait, the single seam through which
//! the rest of the crate reads block data, along with the core value types
//! ([`Block`], [`UnixTimestamp`], [`BlockRef`]) and an alloy-backed
//! implementation, [`AlloyLedger`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use oraclefeed::{AlloyLedger, BlockRef, Ledger};
//! use alloy_provider::ProviderBuilder;
//!
//! let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
//! let ledger = AlloyLedger::new(provider);
//!
//! let head = ledger.block(BlockRef::Latest).await?;
//! println!("head block {} at {}", head.number, head.timestamp);
//! ```

use alloy_primitives::BlockNumber;
use alloy_provider::Provider;
use alloy_rpc_types::BlockNumberOrTag;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::LedgerError;
use crate::tracing::spans;

/// Unix timestamp in seconds (always UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnixTimestamp(pub u64);

impl UnixTimestamp {
    /// Creates a UnixTimestamp from a u64 value
    pub fn from_u64(ts: u64) -> Self {
        Self(ts)
    }

    /// Converts to u64 for arithmetic with block timestamps
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Adds whole seconds, saturating at the numeric bound
    pub fn saturating_add(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ledger block: a number paired with the timestamp it was produced at
///
/// Ordering invariant: for blocks A and B on the same ledger,
/// `A.number < B.number` implies `A.timestamp <= B.timestamp`. Timestamps may
/// stall across consecutive blocks but never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block number (height)
    pub number: BlockNumber,

    /// Timestamp the block was sealed at
    pub timestamp: UnixTimestamp,
}

impl Block {
    /// Creates a new block record
    pub fn new(number: BlockNumber, timestamp: UnixTimestamp) -> Self {
        Self { number, timestamp }
    }
}

/// Reference to a ledger block: a literal number or the chain head
///
/// The `Latest` sentinel mirrors the `"latest"` tag accepted by
/// `eth_getBlockByNumber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockRef {
    /// A specific block number
    Number(BlockNumber),
    /// The current chain head
    Latest,
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Number(n) => write!(f, "{n}"),
            BlockRef::Latest => write!(f, "latest"),
        }
    }
}

impl From<BlockNumber> for BlockRef {
    fn from(number: BlockNumber) -> Self {
        BlockRef::Number(number)
    }
}

impl From<BlockRef> for BlockNumberOrTag {
    fn from(at: BlockRef) -> Self {
        match at {
            BlockRef::Number(n) => BlockNumberOrTag::Number(n),
            BlockRef::Latest => BlockNumberOrTag::Latest,
        }
    }
}

/// Read access to ledger blocks
///
/// This is the only interface the block finder uses to talk to a chain.
/// Implementations must support both a literal block number and the
/// [`BlockRef::Latest`] sentinel.
///
/// # Error Handling
///
/// Implementations surface failures as [`LedgerError`] and never retry
/// internally. Retry and cancellation policy belongs to the caller.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetches the block at the given reference
    ///
    /// Returns [`LedgerError::BlockNotFound`] when the referenced block does
    /// not exist on the chain, and [`LedgerError::GetBlockFailed`] when the
    /// underlying accessor failed.
    async fn block(&self, at: BlockRef) -> Result<Block, LedgerError>;
}

/// [`Ledger`] implementation backed by an alloy [`Provider`]
///
/// # Examples
///
/// ```rust,ignore
/// use oraclefeed::AlloyLedger;
/// use alloy_provider::ProviderBuilder;
///
/// let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
/// let ledger = AlloyLedger::new(provider);
/// ```
#[derive(Debug, Clone)]
pub struct AlloyLedger<P> {
    provider: P,
}

impl<P: Provider> AlloyLedger<P> {
    /// Creates a ledger accessor over the given provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> Ledger for AlloyLedger<P> {
    async fn block(&self, at: BlockRef) -> Result<Block, LedgerError> {
        let span = spans::get_block(at);
        let _guard = span.enter();

        let block = self
            .provider
            .get_block_by_number(at.into())
            .await
            .map_err(|e| LedgerError::get_block_failed(at, e))?
            .ok_or(LedgerError::BlockNotFound { at })?;

        Ok(Block::new(
            block.header.number,
            UnixTimestamp::from_u64(block.header.timestamp),
        ))
    }
}
