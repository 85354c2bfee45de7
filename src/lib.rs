//! Timestamp-to-block resolution and throttled oracle price sampling for
//! EVM chains.
//!
//! Two components, composed bottom-up:
//!
//! - [`BlockFinder`]: resolves "which block corresponds to timestamp T"
//!   against any [`Ledger`] accessor, caching every fetched block.
//! - [`PriceFeed`]: a polling price feed over an on-chain oracle, with a
//!   throttled current price and unbounded historical queries.

mod blocks;
mod clock;
mod errors;
mod feed;
mod ledger;
mod tracing;

pub use blocks::*;
pub use clock::*;
pub use errors::*;
pub use feed::*;
pub use ledger::*;
