//! Point masses and their kinematic state.

use bevy::color::Color;

use crate::error::SimError;
use crate::math::{Real, Vec2};

/// Default display radius in world units.
pub const DEFAULT_RADIUS: f32 = 3.0;

/// Kinematic state advanced by the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Net force from the most recent force pass.
    pub force: Vec2,
}

/// One simulated point mass.
///
/// `color` and `radius` are display attributes only; the dynamics never read them.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub state: BodyState,
    mass: Real,
    pub color: Color,
    pub radius: f32,
}

impl Body {
    /// Builds a body, rejecting a non-positive or non-finite mass and non-finite kinematics.
    pub fn new(position: Vec2, velocity: Vec2, mass: Real) -> Result<Self, SimError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidMass(mass));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SimError::InvalidState);
        }
        Ok(Self {
            state: BodyState {
                position,
                velocity,
                force: Vec2::ZERO,
            },
            mass,
            color: Color::WHITE,
            radius: DEFAULT_RADIUS,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Mass, always positive. Read-only so the invariant checked in `new` holds.
    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.state.force / self.mass
    }

    pub fn momentum(&self) -> Vec2 {
        self.state.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> Real {
        0.5 * self.mass * self.state.velocity.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        assert_eq!(
            Body::new(Vec2::ZERO, Vec2::ZERO, 0.0),
            Err(SimError::InvalidMass(0.0))
        );
        assert_eq!(
            Body::new(Vec2::ZERO, Vec2::ZERO, -3.0),
            Err(SimError::InvalidMass(-3.0))
        );
        assert!(matches!(
            Body::new(Vec2::ZERO, Vec2::ZERO, Real::NAN),
            Err(SimError::InvalidMass(_))
        ));
    }

    #[test]
    fn rejects_non_finite_kinematics() {
        let bad = Vec2::new(Real::INFINITY, 0.0);
        assert_eq!(Body::new(bad, Vec2::ZERO, 1.0), Err(SimError::InvalidState));
        assert_eq!(Body::new(Vec2::ZERO, bad, 1.0), Err(SimError::InvalidState));
    }

    #[test]
    fn new_body_starts_with_zero_force() {
        let body = Body::new(Vec2::new(1.0, 2.0), Vec2::new(0.0, 3.0), 2.0).unwrap();
        assert_eq!(body.state.force, Vec2::ZERO);
        assert_eq!(body.momentum(), Vec2::new(0.0, 6.0));
        assert!((body.kinetic_energy() - 9.0).abs() < 1e-12);
    }
}
