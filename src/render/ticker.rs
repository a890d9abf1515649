use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Fixed-rate pacer for the render loop.
///
/// Each call to [`FrameTicker::wait`] sleeps until the next tick deadline. When the loop falls
/// more than one period behind, the schedule is re-anchored to now instead of bursting to catch up.
#[derive(Debug)]
pub struct FrameTicker {
    period: Duration,
    next: Instant,
    tick: u64,
}

impl FrameTicker {
    /// Ticker whose first tick is due now.
    pub fn new(fps: Fps) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    /// Ticker whose first tick is due at `start`.
    pub fn starting_at(fps: Fps, start: Instant) -> Self {
        Self {
            period: fps.tick_duration(),
            next: start,
            tick: 0,
        }
    }

    /// Time between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// How long to sleep at `now` before the next tick is due, advancing the schedule.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let sleep = self.next.saturating_duration_since(now);
        if now > self.next + self.period {
            self.next = now + self.period;
        } else {
            self.next += self.period;
        }
        sleep
    }

    /// Block until the next tick and return its index.
    pub fn wait(&mut self) -> u64 {
        let sleep = self.advance(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
        let tick = self.tick;
        self.tick += 1;
        tick
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/ticker.rs"]
mod tests;
