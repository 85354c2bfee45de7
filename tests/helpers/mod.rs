// SPDX-License-Identifier: Apache-2.0

//! Test helpers for oraclefeed integration tests
//!
//! Provides mock implementations of the collaborator traits to enable
//! testing without real blockchain connections.

#![allow(dead_code)]

use alloy_primitives::U256;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use oraclefeed::{
    Block, BlockRef, Clock, Ledger, LedgerError, Sampler, SamplerError, UnixTimestamp,
};

/// Mock ledger over a synthetic chain of blocks numbered from 0
///
/// Records every fetch so tests can assert that the block finder never
/// queries the same block number twice.
pub struct MockLedger {
    blocks: Vec<Block>,
    fetches: Mutex<Vec<BlockRef>>,
    failing: AtomicBool,
}

impl MockLedger {
    /// Creates a chain where block `i` carries `timestamps[i]`
    ///
    /// Timestamps must be non-decreasing, matching the ledger ordering
    /// invariant.
    pub fn new(timestamps: &[u64]) -> Arc<Self> {
        assert!(!timestamps.is_empty(), "chain needs at least one block");
        assert!(
            timestamps.windows(2).all(|w| w[0] <= w[1]),
            "block timestamps must be non-decreasing"
        );
        let blocks = timestamps
            .iter()
            .enumerate()
            .map(|(number, &ts)| Block::new(number as u64, UnixTimestamp(ts)))
            .collect();
        Arc::new(Self {
            blocks,
            fetches: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        })
    }

    /// Creates a chain of `count` blocks starting at `genesis_ts` with a
    /// fixed seconds-per-block step
    pub fn linear(count: u64, genesis_ts: u64, step: u64) -> Arc<Self> {
        let timestamps: Vec<u64> = (0..count).map(|i| genesis_ts + i * step).collect();
        Self::new(&timestamps)
    }

    /// The chain head
    pub fn head(&self) -> Block {
        *self.blocks.last().unwrap()
    }

    /// Makes every subsequent fetch fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every block number fetched so far (`Latest` fetches excluded)
    pub fn fetched_numbers(&self) -> Vec<u64> {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter_map(|at| match at {
                BlockRef::Number(n) => Some(*n),
                BlockRef::Latest => None,
            })
            .collect()
    }

    /// How many times each block number was fetched from this ledger
    pub fn fetch_counts(&self) -> HashMap<u64, usize> {
        let mut counts = HashMap::new();
        for n in self.fetched_numbers() {
            *counts.entry(n).or_insert(0) += 1;
        }
        counts
    }

    /// Asserts that no block number was ever fetched twice
    pub fn assert_no_duplicate_fetches(&self) {
        for (number, count) in self.fetch_counts() {
            assert_eq!(count, 1, "block {number} was fetched {count} times");
        }
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn block(&self, at: BlockRef) -> Result<Block, LedgerError> {
        self.fetches.lock().unwrap().push(at);

        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::get_block_failed(
                at,
                std::io::Error::other("mock ledger down"),
            ));
        }

        match at {
            BlockRef::Latest => Ok(self.head()),
            BlockRef::Number(n) => self
                .blocks
                .get(n as usize)
                .copied()
                .ok_or(LedgerError::BlockNotFound { at }),
        }
    }
}

#[derive(Default)]
struct MockSamplerInner {
    latest: Mutex<Option<U256>>,
    by_block: Mutex<HashMap<u64, U256>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

/// Mock oracle sampler with per-block raw values and a failure switch
///
/// Cloning shares state, so a test can keep a handle to the sampler it
/// boxed into a feed.
#[derive(Clone, Default)]
pub struct MockSampler {
    inner: Arc<MockSamplerInner>,
}

impl MockSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rate the chain head currently reports; overwrites any
    /// previous value, as an on-chain setter would
    pub fn set_rate(&self, raw: &str) {
        *self.inner.latest.lock().unwrap() = Some(rate(raw));
    }

    /// Pins the rate observed at a specific historical block
    pub fn set_rate_at(&self, block: u64, raw: &str) {
        self.inner.by_block.lock().unwrap().insert(block, rate(raw));
    }

    /// Makes every subsequent sample fail at the call level
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// How many times the oracle was sampled
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sampler for MockSampler {
    async fn sample_at(&self, at: BlockRef) -> Result<U256, SamplerError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(SamplerError::unavailable(
                format!("mock sample at {at}"),
                std::io::Error::other("mock oracle down"),
            ));
        }

        match at {
            BlockRef::Latest => self.inner.latest.lock().unwrap().ok_or_else(|| {
                SamplerError::unavailable(
                    "mock sample at latest",
                    std::io::Error::other("no rate set"),
                )
            }),
            BlockRef::Number(n) => self
                .inner
                .by_block
                .lock()
                .unwrap()
                .get(&n)
                .copied()
                .ok_or_else(|| {
                    SamplerError::unavailable(
                        format!("mock sample at {n}"),
                        std::io::Error::other("no rate recorded for block"),
                    )
                }),
        }
    }
}

/// Manually driven clock for deterministic throttle testing
///
/// Cloning shares the underlying time, so a test can advance the clock a
/// feed holds.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp(self.now.load(Ordering::SeqCst))
    }
}

/// Parses a decimal raw oracle value
pub fn rate(s: &str) -> U256 {
    s.parse().expect("valid decimal rate")
}
