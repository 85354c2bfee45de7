// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for timestamp-to-block resolution
//!
//! These tests use proptest to validate resolution invariants across a wide
//! range of synthetic chains, including stalled (plateau) timestamps.

mod helpers;

use std::sync::Arc;

use helpers::MockLedger;
use oraclefeed::{BlockFinder, Ledger, UnixTimestamp};
use proptest::prelude::*;

/// Arbitrary monotone chain: a genesis timestamp plus per-block increments,
/// where an increment of 0 produces a timestamp plateau.
fn arb_chain() -> impl Strategy<Value = Vec<u64>> {
    (
        0u64..=1_000_000,
        prop::collection::vec(0u64..=30, 0..=120),
    )
        .prop_map(|(genesis, increments)| {
            let mut timestamps = vec![genesis];
            let mut ts = genesis;
            for inc in increments {
                ts += inc;
                timestamps.push(ts);
            }
            timestamps
        })
}

/// Reference resolution by linear scan: the first block carrying the
/// greatest timestamp that does not exceed the target.
fn reference_resolve(timestamps: &[u64], target: u64) -> Option<u64> {
    let boundary = timestamps.iter().filter(|&&ts| ts <= target).max()?;
    timestamps.iter().position(|ts| ts == boundary).map(|i| i as u64)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: resolve agrees with the linear-scan reference for any
    /// in-range target, including plateau boundaries.
    #[test]
    fn prop_resolve_matches_reference(
        timestamps in arb_chain(),
        offset in 0u64..=4_000,
    ) {
        let genesis = timestamps[0];
        let head = *timestamps.last().unwrap();
        let target = genesis + offset % (head - genesis + 1);

        let expected = reference_resolve(&timestamps, target)
            .expect("in-range target must resolve");

        let ledger = MockLedger::new(&timestamps);
        let finder = BlockFinder::new(Arc::clone(&ledger) as Arc<dyn Ledger>);

        let block = runtime()
            .block_on(finder.resolve(UnixTimestamp(target)))
            .expect("in-range target must resolve");

        prop_assert_eq!(block.number, expected);
        prop_assert!(block.timestamp.as_u64() <= target);
    }

    /// Property: out-of-range targets fail with an out-of-range error on
    /// either side of the chain's history.
    #[test]
    fn prop_out_of_range_targets_fail(timestamps in arb_chain()) {
        let genesis = timestamps[0];
        let head = *timestamps.last().unwrap();

        let ledger = MockLedger::new(&timestamps);
        let finder = BlockFinder::new(Arc::clone(&ledger) as Arc<dyn Ledger>);
        let rt = runtime();

        let err = rt
            .block_on(finder.resolve(UnixTimestamp(head + 1)))
            .unwrap_err();
        prop_assert!(err.is_out_of_range());

        if genesis > 0 {
            let err = rt
                .block_on(finder.resolve(UnixTimestamp(genesis - 1)))
                .unwrap_err();
            prop_assert!(err.is_out_of_range());
        }
    }

    /// Property: however many in-range targets are resolved against one
    /// finder, no block number is ever fetched from the ledger twice.
    #[test]
    fn prop_cache_prevents_duplicate_fetches(
        timestamps in arb_chain(),
        offsets in prop::collection::vec(0u64..=4_000, 1..=8),
    ) {
        let genesis = timestamps[0];
        let head = *timestamps.last().unwrap();

        let ledger = MockLedger::new(&timestamps);
        let finder = BlockFinder::new(Arc::clone(&ledger) as Arc<dyn Ledger>);
        let rt = runtime();

        for offset in offsets {
            let target = genesis + offset % (head - genesis + 1);
            rt.block_on(finder.resolve(UnixTimestamp(target)))
                .expect("in-range target must resolve");
        }

        for (number, count) in ledger.fetch_counts() {
            prop_assert_eq!(count, 1, "block {} fetched {} times", number, count);
        }
    }
}
