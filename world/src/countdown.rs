//! Whole-second countdown fed with coins.

use std::time::Duration;

use tidepool_core::CoinKind;

/// Seconds on a full countdown.
pub const COUNTDOWN_LIMIT: u32 = 60;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Countdown {
    remaining: u32,
    carry: Duration,
}

impl Countdown {
    pub(crate) const fn full() -> Self {
        Self {
            remaining: COUNTDOWN_LIMIT,
            carry: Duration::ZERO,
        }
    }

    pub(crate) const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Consumes `dt`; returns `true` when the whole-second value changed.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.carry = self.carry.saturating_add(dt);
        let before = self.remaining;
        while self.carry >= SECOND && self.remaining > 0 {
            self.carry -= SECOND;
            self.remaining -= 1;
        }
        before != self.remaining
    }

    /// Picks the coin to spend next: gold while it fits, then silver.
    pub(crate) fn coin_that_fits(&self, silver: u32, gold: u32) -> Option<CoinKind> {
        let headroom = COUNTDOWN_LIMIT.saturating_sub(self.remaining);
        if gold > 0 && headroom >= CoinKind::Gold.seconds() {
            Some(CoinKind::Gold)
        } else if silver > 0 && headroom >= CoinKind::Silver.seconds() {
            Some(CoinKind::Silver)
        } else {
            None
        }
    }

    pub(crate) fn add(&mut self, seconds: u32) {
        self.remaining = self.remaining.saturating_add(seconds).min(COUNTDOWN_LIMIT);
    }
}
