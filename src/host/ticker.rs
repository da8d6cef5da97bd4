//! Periodic tick source
//!
//! Stands in for the host's recurring UI callback. Ticks run on the calling
//! thread one after another, so a cycle always finishes before the next one
//! starts.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    max_ticks: Option<u64>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_ticks: None,
        }
    }

    /// Stop after `max_ticks` callbacks
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Invoke `on_tick` every period until it breaks or the tick limit is hit
    ///
    /// The first tick fires immediately. Returns the number of ticks run.
    pub fn run<F>(&self, mut on_tick: F) -> u64
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let mut ticks = 0;
        loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }

            ticks += 1;
            debug!(tick = ticks, "tick");
            if on_tick().is_break() {
                break;
            }

            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            thread::sleep(self.period);
        }
        ticks
    }
}
