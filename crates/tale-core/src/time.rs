//! Time utilities for the Tale client
//!
//! The front end runs a single frame loop; everything time-based (fades, polling)
//! is advanced from it rather than from background timers.

use std::time::Duration;

/// Largest delta a single frame may report, so a stalled terminal does not
/// fast-forward every running fade at once.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Frame time tracking for the front end loop
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Time since the loop started (sum of clamped deltas)
    pub total: Duration,
    /// Delta for the current frame (clamped)
    pub delta: Duration,
    /// Frame counter
    pub frame_count: u64,
}

impl FrameClock {
    /// Update the clock with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: Duration) -> Duration {
        self.delta = raw_delta.min(MAX_FRAME_DELTA);
        self.total += self.delta;
        self.frame_count += 1;
        self.delta
    }
}

/// A repeating timer advanced by the frame loop.
///
/// The timer never fires on its own: it only produces ticks from [`advance`],
/// so dropping its owner is enough to cancel it.
///
/// [`advance`]: RepeatingTimer::advance
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: Duration,
    accumulator: Duration,
}

impl RepeatingTimer {
    /// Create a timer firing every `period`. A zero period is bumped to 1ms.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Add elapsed time and return how many ticks are now due
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            ticks += 1;
        }
        ticks
    }
}
