//! Span creation helpers for oraclefeed operations.
//!
//! Span helpers keep telemetry concerns out of the business logic: instead
//! of `#[instrument]` attributes, each instrumented operation has a
//! corresponding span constructor in this module.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     let _guard = span.enter();
//!     // Business logic here
//! }
//! ```

use tracing::Span;

use crate::ledger::{BlockRef, UnixTimestamp};

/// Create span for fetching one block from the ledger accessor.
///
/// Parent: resolve_block span (during binary search) or refresh span
/// Children: the underlying RPC call
#[inline]
pub(crate) fn get_block(at: BlockRef) -> Span {
    tracing::trace_span!("oraclefeed.get_block", at = %at)
}

/// Create span for resolving a timestamp to a block.
///
/// This is the main public API for block resolution.
///
/// Parent: None, or historical_price span
/// Children: get_block spans (one per cache miss during the search)
#[inline]
pub(crate) fn resolve_block(target: UnixTimestamp) -> Span {
    tracing::debug_span!("oraclefeed.resolve_block", target = %target)
}

/// Create span for a scheduled price refresh.
///
/// Parent: None (root span for this operation)
/// Children: oracle sampling call
#[inline]
pub(crate) fn refresh(now: UnixTimestamp) -> Span {
    tracing::debug_span!("oraclefeed.refresh", now = %now)
}

/// Create span for answering a historical price query.
///
/// Parent: None (root span for this operation)
/// Children: resolve_block span, oracle sampling call
#[inline]
pub(crate) fn historical_price(at: UnixTimestamp) -> Span {
    tracing::info_span!("oraclefeed.historical_price", at = %at)
}
