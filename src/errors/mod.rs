//! Error types for the oraclefeed library.
//!
//! Each major module has its own error type:
//!
//! - [`LedgerError`] - Failures reading block data from the chain
//! - [`BlockFinderError`] - Failures resolving a timestamp to a block
//! - [`PriceFeedError`] - Failures answering a historical price query
//!
//! [`SamplerError`](crate::feed::sampler::SamplerError) lives beside the
//! [`Sampler`](crate::feed::sampler::Sampler) trait in the `feed` module and
//! is wrapped here by [`PriceFeedError::Sampling`].
//!
//! # Propagation policy
//!
//! Query operations (`BlockFinder::resolve`, `PriceFeed::historical_price`)
//! surface every error kind to the caller. The scheduled
//! `PriceFeed::refresh` path, by contrast, catches everything, reports it
//! via tracing, and leaves the last-known-good price in place: a background
//! refresh must never take down a long-running monitoring loop.

mod blocks;
mod feed;
mod ledger;

pub use blocks::BlockFinderError;
pub use feed::PriceFeedError;
pub use ledger::LedgerError;
