//! A periodic, cancellable scheduled task driven by simulated time.
//!
//! The session owns each ticker as an `Option<Ticker>`: dropping it is the
//! cancellation, so a stopped timer can never fire again.

use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct Ticker {
    period: Duration,
    /// Time left until the next firing.
    remaining: Duration,
}

impl Ticker {
    /// First firing happens one full `period` after arming.  A zero period is
    /// bumped to one millisecond so a ticker always makes progress.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Ticker {
            period,
            remaining: period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn until_next(&self) -> Duration {
        self.remaining
    }

    /// Let `elapsed` pass without crossing a deadline.  Returns `true` when the
    /// deadline is reached exactly, re-arming for the next period.
    ///
    /// Callers must never pass more than `until_next()`.
    pub fn consume(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }
}
