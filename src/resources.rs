use bevy::prelude::Resource;

use crate::error::SimError;
use crate::math::Real;

// --- Simulation Defaults ---
/// Default gravitational constant.
pub const DEFAULT_G: Real = 100.0;
/// Default fixed timestep, in simulated time units.
pub const DEFAULT_DT: Real = 0.01;
/// Default simulated time per wall-clock second.
pub const DEFAULT_TIME_SCALE: Real = 10.0;
/// Upper bound on catch-up steps executed in one frame.
pub const MAX_STEPS_PER_FRAME: u32 = 256;
/// Default body store capacity.
pub const DEFAULT_CAPACITY: usize = 1024;
/// Largest capacity a store accepts; body handles index with a `u32`.
pub const MAX_CAPACITY: usize = u32::MAX as usize;
/// Separation clamp that keeps close encounters finite.
pub const MIN_SEPARATION: Real = 0.5;
/// Default Barnes-Hut opening threshold.
pub const DEFAULT_THETA: Real = 0.5;

/// How the net force on each body is evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ForceModel {
    /// Exact pairwise sum, O(n^2).
    Direct,
    /// Quadtree approximation; `theta = 0` degenerates to the exact sum.
    BarnesHut { theta: Real },
}

/// Tunable simulation parameters.
///
/// `dt`, `capacity` and `max_steps_per_frame` are fixed once a `Simulation` is built;
/// `g` and `time_scale` may be changed through the simulation's setters.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub g: Real,
    pub dt: Real,
    pub time_scale: Real,
    pub max_steps_per_frame: u32,
    pub capacity: usize,
    pub min_separation: Real,
    pub force_model: ForceModel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            dt: DEFAULT_DT,
            time_scale: DEFAULT_TIME_SCALE,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
            capacity: DEFAULT_CAPACITY,
            min_separation: MIN_SEPARATION,
            force_model: ForceModel::Direct,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.g.is_finite() {
            return Err(SimError::InvalidConfig("g must be finite"));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidConfig("dt must be positive and finite"));
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(SimError::InvalidConfig(
                "time_scale must be non-negative and finite",
            ));
        }
        if self.max_steps_per_frame == 0 {
            return Err(SimError::InvalidConfig("max_steps_per_frame must be at least 1"));
        }
        if self.capacity == 0 {
            return Err(SimError::InvalidConfig("capacity must be at least 1"));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(SimError::InvalidConfig("capacity must not exceed u32::MAX"));
        }
        if !(self.min_separation.is_finite() && self.min_separation > 0.0) {
            return Err(SimError::InvalidConfig(
                "min_separation must be positive and finite",
            ));
        }
        if let ForceModel::BarnesHut { theta } = self.force_model
            && !(theta.is_finite() && theta >= 0.0)
        {
            return Err(SimError::InvalidConfig(
                "theta must be non-negative and finite",
            ));
        }
        Ok(())
    }
}

/// Marker resource to request a simulation reset from the UI.
#[derive(Resource, Default)]
pub struct ResetSimulation {
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::default;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_domain_values() {
        let cases = [
            SimConfig {
                dt: 0.0,
                ..default()
            },
            SimConfig {
                dt: Real::NAN,
                ..default()
            },
            SimConfig {
                time_scale: -1.0,
                ..default()
            },
            SimConfig {
                max_steps_per_frame: 0,
                ..default()
            },
            SimConfig {
                capacity: 0,
                ..default()
            },
            SimConfig {
                capacity: usize::MAX,
                ..default()
            },
            SimConfig {
                capacity: MAX_CAPACITY + 1,
                ..default()
            },
            SimConfig {
                min_separation: 0.0,
                ..default()
            },
            SimConfig {
                g: Real::INFINITY,
                ..default()
            },
            SimConfig {
                force_model: ForceModel::BarnesHut { theta: -0.1 },
                ..default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(SimError::InvalidConfig(_))),
                "expected {:?} to be rejected",
                config
            );
        }
    }
}
