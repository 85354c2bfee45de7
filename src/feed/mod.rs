//! Throttled, cached oracle price feed
//!
//! [`PriceFeed`] maintains one current price sampled at the chain head,
//! refreshed no more often than a configured minimum interval, and answers
//! historical price queries by resolving a timestamp to a block through a
//! shared [`BlockFinder`] and sampling the oracle at that block.
//!
//! # Refresh failure policy
//!
//! [`PriceFeed::refresh`] is meant to run on a schedule inside a
//! long-running monitoring loop, so it never propagates errors. Failures
//! are reported through tracing and the last known good price stays in
//! place. Explicit queries ([`PriceFeed::historical_price`]) surface their
//! failures to the caller instead.
//!
//! # Examples
//!
//! ```rust,ignore
//! use oraclefeed::{
//!     AlloyLedger, BlockFinder, OracleRelaySampler, PriceFeed,
//!     RedemptionRateTransform, SystemClock, UnixTimestamp,
//! };
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(AlloyLedger::new(provider.clone()));
//! let finder = Arc::new(BlockFinder::new(ledger));
//!
//! let feed = PriceFeed::new(
//!     Arc::clone(&finder),
//!     Box::new(OracleRelaySampler::new(relay_address, provider)),
//!     Box::new(RedemptionRateTransform),
//!     Box::new(SystemClock),
//! );
//!
//! feed.refresh().await;
//! if let Some(price) = feed.current_price() {
//!     println!("current price: {price}");
//! }
//!
//! let yesterday = feed.historical_price(UnixTimestamp(1_700_000_000)).await?;
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info};

pub mod sampler;
pub mod transform;

pub use sampler::{OracleRelaySampler, Sampler, SamplerError};
pub use transform::{PriceTransform, PriceTransformError, RedemptionRateTransform};

use crate::blocks::BlockFinder;
use crate::clock::Clock;
use crate::errors::PriceFeedError;
use crate::ledger::{BlockRef, UnixTimestamp};
use crate::tracing::spans;

/// Default minimum time between two successful refreshes.
const DEFAULT_MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(60);

/// Default fixed-point precision prices are quoted in.
const DEFAULT_DECIMALS: u8 = 9;

/// Default feed identifier, used until [`PriceFeed::with_id`] overrides it.
const DEFAULT_ID: &str = "oracle-feed";

/// The refreshable part of the feed: price and last-update time move
/// together under one lock so readers never observe a torn pair.
#[derive(Debug, Clone, Copy, Default)]
struct FeedState {
    price: Option<f64>,
    last_update: Option<UnixTimestamp>,
}

/// Polling price feed over an on-chain oracle
///
/// Construction follows the builder idiom: [`PriceFeed::new`] wires the
/// collaborators, `with_*` methods override the defaults (60 s throttle,
/// 9 decimals).
pub struct PriceFeed {
    finder: Arc<BlockFinder>,
    sampler: Box<dyn Sampler>,
    transform: Box<dyn PriceTransform>,
    clock: Box<dyn Clock>,
    id: String,
    min_time_between_updates: Duration,
    decimals: u8,
    state: Mutex<FeedState>,
}

impl PriceFeed {
    /// Creates a feed over the given collaborators
    ///
    /// The [`BlockFinder`] is taken as a shared handle so several feeds
    /// reading the same chain can amortize ledger queries through one
    /// block cache.
    pub fn new(
        finder: Arc<BlockFinder>,
        sampler: Box<dyn Sampler>,
        transform: Box<dyn PriceTransform>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            finder,
            sampler,
            transform,
            clock,
            id: DEFAULT_ID.to_owned(),
            min_time_between_updates: DEFAULT_MIN_TIME_BETWEEN_UPDATES,
            decimals: DEFAULT_DECIMALS,
            state: Mutex::new(FeedState::default()),
        }
    }

    /// Sets the identifier this feed reports in its log events
    ///
    /// Deployments running several feeds side by side give each one a
    /// distinct id, typically derived from the oracle address.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the minimum time that must pass between two successful refreshes
    pub fn with_min_time_between_updates(mut self, interval: Duration) -> Self {
        self.min_time_between_updates = interval;
        self
    }

    /// Sets the fixed-point precision prices are reported in
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Returns the most recently sampled price, or `None` before the first
    /// successful refresh
    ///
    /// Non-blocking; never touches the ledger.
    pub fn current_price(&self) -> Option<f64> {
        self.lock_state().price
    }

    /// Returns the time of the last successful refresh, or `None` before
    /// the first one
    pub fn last_update_time(&self) -> Option<UnixTimestamp> {
        self.lock_state().last_update
    }

    /// Returns the identifier this feed reports in its log events
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the fixed-point precision prices are reported in
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns how far back historical queries can reach; `None` means
    /// unbounded
    ///
    /// This feed samples the oracle at arbitrary past blocks, so lookback
    /// is limited only by what the ledger node still serves.
    pub fn lookback(&self) -> Option<Duration> {
        None
    }

    /// Samples the oracle value at the chain head and updates the current
    /// price, unless the minimum interval since the last refresh has not
    /// elapsed yet
    ///
    /// Never returns an error: any failure is reported through tracing and
    /// leaves both the price and the last-update time untouched, so a
    /// scheduled refresh can never corrupt or clear the last known good
    /// price.
    pub async fn refresh(&self) {
        let now = self.clock.now();
        let span = spans::refresh(now);
        let _guard = span.enter();

        if let Some(last) = self.lock_state().last_update {
            let due = last.saturating_add(self.min_time_between_updates.as_secs());
            if now < due {
                debug!(now = %now, due = %due, "Refresh throttled");
                return;
            }
        }

        match self.sample_price(BlockRef::Latest).await {
            Ok(price) => {
                let mut state = self.lock_state();
                // An overlapping refresh that finished late must not move
                // the pair backwards.
                if state.last_update.is_some_and(|last| now < last) {
                    debug!(now = %now, "Discarding stale refresh result");
                    return;
                }
                *state = FeedState {
                    price: Some(price),
                    last_update: Some(now),
                };
                info!(feed = %self.id, price, now = %now, "Refreshed current price");
            }
            Err(e) => {
                error!(feed = %self.id, error = %e, "Refresh failed; keeping last known price");
            }
        }
    }

    /// Returns the price as of the block resolved for `at`
    ///
    /// Resolution goes through the shared [`BlockFinder`]; the oracle is
    /// then sampled at the resolved block number. The feed's own state is
    /// not touched.
    ///
    /// # Errors
    ///
    /// Propagates [`BlockFinderError`](crate::errors::BlockFinderError) from
    /// resolution and [`SamplerError`] from the oracle call or the price
    /// transform.
    pub async fn historical_price(&self, at: UnixTimestamp) -> Result<f64, PriceFeedError> {
        let span = spans::historical_price(at);
        let _guard = span.enter();

        let block = self.finder.resolve(at).await?;
        let price = self.sample_price(BlockRef::Number(block.number)).await?;

        debug!(at = %at, block = block.number, price, "Answered historical price query");
        Ok(price)
    }

    /// Fetches the raw oracle value at `at` and runs it through the transform
    async fn sample_price(&self, at: BlockRef) -> Result<f64, SamplerError> {
        let raw = self.sampler.sample_at(at).await?;
        let price = self.transform.to_price(raw)?;
        debug!(raw = %raw, price, at = %at, "Sampled oracle value");
        Ok(price)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        // A panic while holding the lock cannot leave a torn pair; recover
        // the guard instead of propagating the poison.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
