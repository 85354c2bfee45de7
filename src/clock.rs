// SPDX-License-Identifier: Apache-2.0

//! Logical time source for refresh throttling
//!
//! The price feed never reads the wall clock directly; it asks a [`Clock`]
//! collaborator for "now". Tests substitute a manual clock to drive the
//! throttle deterministically.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ledger::UnixTimestamp;

/// Supplies the current logical time
pub trait Clock: Send + Sync {
    /// Returns the current time as a unix timestamp in seconds
    fn now(&self) -> UnixTimestamp;
}

/// [`Clock`] backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        UnixTimestamp::from_u64(secs)
    }
}
