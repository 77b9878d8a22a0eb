//! Converts elapsed wall-clock time into discrete simulation ticks.
//!
//! The engine itself never reads a clock. A host loop measures elapsed time
//! however it likes and hands it to [`Scheduler::advance`], which runs every
//! tick that came due, in order, for each agent class.

use std::time::Duration;

use rand::Rng;

use crate::config::SimConfig;
use crate::fleet::FleetController;
use crate::session::RideSession;
use crate::traits::{RouteClient, UpdateSink};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fixed-interval tick counter that carries leftover time between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    interval: Duration,
    carried: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            carried: Duration::ZERO,
        }
    }

    /// Adds `elapsed` and returns how many whole intervals are now due.
    ///
    /// A zero interval never fires. At most `u32::MAX` ticks are reported per
    /// call; the leftover is always less than one interval.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        let carried = self.carried.saturating_add(elapsed).as_nanos();
        let interval = self.interval.as_nanos();
        let rest = carried % interval;
        self.carried = Duration::new((rest / NANOS_PER_SEC) as u64, (rest % NANOS_PER_SEC) as u32);
        (carried / interval).min(u128::from(u32::MAX)) as u32
    }

    pub fn reset(&mut self) {
        self.carried = Duration::ZERO;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// One ticker per agent class: primary route, driver, and the whole fleet.
#[derive(Debug, Clone)]
pub struct Scheduler {
    primary: Ticker,
    driver: Ticker,
    fleet: Ticker,
    /// Primary agent generation the session tickers were counting for.
    session_generation: u64,
}

impl Scheduler {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            primary: Ticker::new(config.primary_interval()),
            driver: Ticker::new(config.driver_interval()),
            fleet: Ticker::new(config.fleet_interval()),
            session_generation: 0,
        }
    }

    /// Drops partial progress toward the next primary and driver ticks, so a
    /// fresh search starts counting from zero.
    pub fn restart_session(&mut self) {
        self.primary.reset();
        self.driver.reset();
    }

    /// Runs all ticks due after `elapsed` and publishes their updates.
    ///
    /// When the session has started a new search since the last call, time
    /// carried over from the previous search is dropped first. Fleet refresh
    /// requests raised by a tick are resolved against `client` before the next
    /// fleet tick runs.
    pub fn advance<C, R, S>(
        &mut self,
        elapsed: Duration,
        session: &mut RideSession,
        fleet: &mut FleetController,
        client: &C,
        rng: &mut R,
        sink: &mut S,
    ) where
        C: RouteClient,
        R: Rng + ?Sized,
        S: UpdateSink + ?Sized,
    {
        let generation = session.primary().generation();
        if generation != self.session_generation {
            self.session_generation = generation;
            self.restart_session();
        }

        for _ in 0..self.primary.advance(elapsed) {
            if let Some(update) = session.tick_primary() {
                sink.publish(update);
            }
        }
        for _ in 0..self.driver.advance(elapsed) {
            if let Some(update) = session.tick_driver() {
                sink.publish(update);
            }
        }
        for _ in 0..self.fleet.advance(elapsed) {
            for update in fleet.tick_and_refresh(rng, client) {
                sink.publish(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_carries_remainder() {
        let mut ticker = Ticker::new(Duration::from_millis(300));
        assert_eq!(ticker.advance(Duration::from_millis(200)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(200)), 1);
        assert_eq!(ticker.advance(Duration::from_millis(500)), 2);
        assert_eq!(ticker.advance(Duration::from_millis(0)), 0);
    }

    #[test]
    fn test_ticker_reset() {
        let mut ticker = Ticker::new(Duration::from_millis(700));
        ticker.advance(Duration::from_millis(600));
        ticker.reset();
        assert_eq!(ticker.advance(Duration::from_millis(600)), 0);
    }

    #[test]
    fn test_ticker_huge_elapsed_saturates() {
        let mut ticker = Ticker::new(Duration::from_millis(300));
        assert_eq!(ticker.advance(Duration::MAX), u32::MAX);
        assert_eq!(ticker.advance(Duration::MAX), u32::MAX);
        // Leftover stays below one interval.
        assert_eq!(ticker.advance(Duration::ZERO), 0);
    }

    #[test]
    fn test_ticker_counts_long_gap_directly() {
        let mut ticker = Ticker::new(Duration::from_millis(300));
        assert_eq!(ticker.advance(Duration::from_millis(3_600_100)), 12_000);
        assert_eq!(ticker.advance(Duration::from_millis(199)), 0);
        assert_eq!(ticker.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn test_zero_interval_never_fires() {
        let mut ticker = Ticker::new(Duration::ZERO);
        assert_eq!(ticker.advance(Duration::from_secs(5)), 0);
    }
}
