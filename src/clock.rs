//! Fixed-timestep clock decoupling simulated time from the frame rate.

use bevy::log::warn;

use crate::math::Real;

/// Simulated time, the fixed step and the time owed to the simulation.
///
/// The accumulator never goes negative. The driver runs at most `max_steps_per_frame` steps
/// per frame and then calls [`SimulationClock::drop_backlog`], so a long stall discards owed
/// time instead of turning into an unbounded catch-up.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationClock {
    t: Real,
    dt: Real,
    accumulator: Real,
    max_steps_per_frame: u32,
}

impl SimulationClock {
    /// `dt` must be positive and finite; `SimConfig::validate` guarantees it for simulations.
    pub fn new(dt: Real, max_steps_per_frame: u32) -> Self {
        debug_assert!(dt > 0.0 && dt.is_finite());
        Self {
            t: 0.0,
            dt,
            accumulator: 0.0,
            max_steps_per_frame: max_steps_per_frame.max(1),
        }
    }

    /// Adds `elapsed` wall seconds scaled by `time_scale` to the accumulator.
    /// Negative or non-finite inputs add nothing.
    pub fn accumulate(&mut self, elapsed: Real, time_scale: Real) {
        let owed = elapsed * time_scale;
        if !owed.is_finite() || owed < 0.0 {
            warn!("ignoring invalid frame delta {} (time scale {})", elapsed, time_scale);
            return;
        }
        self.accumulator += owed;
    }

    /// Discards every whole step still owed, keeping the fractional remainder.
    ///
    /// Returns the simulated time dropped.
    pub fn drop_backlog(&mut self) -> Real {
        if self.accumulator < self.dt {
            return 0.0;
        }
        let kept = self.accumulator % self.dt;
        let dropped = self.accumulator - kept;
        self.accumulator = kept;
        warn!(
            "simulation fell behind, dropping {:.4} time units of catch-up",
            dropped
        );
        dropped
    }

    /// Consumes one step of owed time if available, advancing `t`.
    pub fn try_consume_step(&mut self) -> bool {
        if self.accumulator < self.dt {
            return false;
        }
        self.accumulator -= self.dt;
        self.t += self.dt;
        true
    }

    /// Advances `t` by one step without touching the accumulator.
    pub fn force_step(&mut self) {
        self.t += self.dt;
    }

    pub fn reset(&mut self) {
        self.t = 0.0;
        self.accumulator = 0.0;
    }

    pub fn t(&self) -> Real {
        self.t
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    pub fn accumulator(&self) -> Real {
        self.accumulator
    }

    pub fn max_steps_per_frame(&self) -> u32 {
        self.max_steps_per_frame
    }

    /// Fraction of a step currently owed, in `[0, 1)` after stepping.
    pub fn alpha(&self) -> Real {
        self.accumulator / self.dt
    }
}
