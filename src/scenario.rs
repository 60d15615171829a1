//! Scenario seeding: the initial bodies placed on startup and on every reset.

use std::f64::consts::{PI, TAU};

use bevy::color::Color;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::body::Body;
use crate::error::SimError;
use crate::math::{Real, Vec2};
use crate::resources::SimConfig;
use crate::store::BodyStore;

/// Populates an empty store and optionally reacts to every fixed step.
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;

    /// Inserts the initial bodies. Called with an empty store.
    fn populate(&self, store: &mut BodyStore, config: &SimConfig) -> Result<(), SimError>;

    /// Runs once per fixed step, after the clock advances and before forces are computed.
    fn on_step(&mut self, _t: Real, _dt: Real, _store: &mut BodyStore) {}
}

/// A light body in a circular orbit around a heavy one, in the zero-momentum frame.
///
/// The heavy body starts at the origin and the light body at `(separation, 0)`.
#[derive(Clone, Debug)]
pub struct BinaryOrbit {
    pub light_mass: Real,
    pub heavy_mass: Real,
    pub separation: Real,
}

impl Default for BinaryOrbit {
    fn default() -> Self {
        Self {
            light_mass: 10.0,
            heavy_mass: 1000.0,
            separation: 100.0,
        }
    }
}

impl BinaryOrbit {
    /// Relative speed of a circular orbit at `separation`.
    pub fn relative_speed(&self, g: Real) -> Real {
        (g * (self.light_mass + self.heavy_mass) / self.separation).sqrt()
    }

    /// Orbital period from Kepler's third law.
    pub fn period(&self, g: Real) -> Real {
        2.0 * PI * (self.separation.powi(3) / (g * (self.light_mass + self.heavy_mass))).sqrt()
    }
}

impl Scenario for BinaryOrbit {
    fn name(&self) -> &str {
        "binary orbit"
    }

    fn populate(&self, store: &mut BodyStore, config: &SimConfig) -> Result<(), SimError> {
        let total = self.light_mass + self.heavy_mass;
        let v_rel = self.relative_speed(config.g);

        store.insert(
            Body::new(
                Vec2::new(self.separation, 0.0),
                Vec2::new(0.0, v_rel * self.heavy_mass / total),
                self.light_mass,
            )?
            .with_color(Color::srgb(0.4, 0.7, 1.0))
            .with_radius(3.0),
        )?;
        store.insert(
            Body::new(
                Vec2::ZERO,
                Vec2::new(0.0, -v_rel * self.light_mass / total),
                self.heavy_mass,
            )?
            .with_color(Color::srgb(1.0, 0.8, 0.2))
            .with_radius(8.0),
        )?;
        Ok(())
    }
}

/// A central massive body with `count` light bodies on loose spiral arms.
///
/// Positions and masses come from a `StdRng` seeded with `seed`, so a reset reproduces the
/// same initial state.
#[derive(Clone, Debug)]
pub struct Galaxy {
    pub count: usize,
    pub seed: u64,
    pub center_mass: Real,
}

impl Default for Galaxy {
    fn default() -> Self {
        Self {
            count: 64,
            seed: 7,
            center_mass: 10_000.0,
        }
    }
}

impl Scenario for Galaxy {
    fn name(&self) -> &str {
        "galaxy"
    }

    fn populate(&self, store: &mut BodyStore, config: &SimConfig) -> Result<(), SimError> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        store.insert(
            Body::new(Vec2::ZERO, Vec2::ZERO, self.center_mass)?
                .with_color(Color::srgb(1.0, 0.0, 0.5))
                .with_radius(6.0),
        )?;

        for _ in 0..self.count {
            let angle = rng.random_range(0.0..TAU);
            let dist: Real = rng.random_range(50.0..400.0);
            let arm_offset = (dist / 100.0) * 2.0;
            let final_angle = angle + arm_offset;
            let position = Vec2::new(final_angle.cos() * dist, final_angle.sin() * dist);

            let velocity_mag = (config.g * self.center_mass / dist).sqrt();
            let velocity_dir = Vec2::new(-final_angle.sin(), final_angle.cos());

            let mass: Real = rng.random_range(1.0..5.0);
            let color = Color::hsl(200.0 + mass as f32 * 20.0, 0.8, 0.6);

            store.insert(
                Body::new(position, velocity_dir * velocity_mag, mass)?
                    .with_color(color)
                    .with_radius(2.0),
            )?;
        }
        Ok(())
    }
}

/// Inserts a fixed list of bodies verbatim.
#[derive(Clone, Debug, Default)]
pub struct FixedBodies(pub Vec<Body>);

impl Scenario for FixedBodies {
    fn name(&self) -> &str {
        "fixed bodies"
    }

    fn populate(&self, store: &mut BodyStore, _config: &SimConfig) -> Result<(), SimError> {
        for body in &self.0 {
            store.insert(body.clone())?;
        }
        Ok(())
    }
}
