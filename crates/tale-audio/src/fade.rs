use std::time::Duration;

use tale_core::RepeatingTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeDirection {
    Out,
    In,
}

/// Result of a single fade tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// Level moved but the bound is not reached yet.
    Continue(f64),
    /// A fade-out reached zero.
    Silent,
    /// A fade-in reached its target; the level is clamped exactly to it.
    Done(f64),
}

/// A linear, stepped volume ramp advanced by a repeating timer.
#[derive(Debug, Clone)]
pub struct Fade {
    direction: FadeDirection,
    level: f64,
    step: f64,
    timer: RepeatingTimer,
}

impl Fade {
    /// Ramp down from `from` to zero.
    pub fn fade_out(from: f64, step: f64, tick: Duration) -> Self {
        Self {
            direction: FadeDirection::Out,
            level: from.max(0.0),
            step,
            timer: RepeatingTimer::new(tick),
        }
    }

    /// Ramp up from zero to whatever target is passed to each tick.
    pub fn fade_in(step: f64, tick: Duration) -> Self {
        Self {
            direction: FadeDirection::In,
            level: 0.0,
            step,
            timer: RepeatingTimer::new(tick),
        }
    }

    /// Current unmuted level of the ramp.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Feed elapsed frame time; returns the number of ticks now due.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.timer.advance(delta)
    }

    /// Apply one step. `target` only matters for fade-ins.
    pub fn tick(&mut self, target: f64) -> FadeStep {
        match self.direction {
            FadeDirection::Out => {
                self.level -= self.step;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    FadeStep::Silent
                } else {
                    FadeStep::Continue(self.level)
                }
            }
            FadeDirection::In => {
                self.level += self.step;
                if self.level >= target {
                    self.level = target;
                    FadeStep::Done(target)
                } else {
                    FadeStep::Continue(self.level)
                }
            }
        }
    }
}
