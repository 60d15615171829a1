//! Error types for the simulation core.

use std::fmt;

use crate::math::Real;

/// Errors raised when building bodies, filling the store, or validating configuration.
///
/// Close encounters and empty picking queries are not errors: the force law clamps the
/// separation and `BodyStore::nearest_to` returns `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The store already holds `capacity` bodies.
    CapacityExceeded { capacity: usize },
    /// A body was built with a non-positive or non-finite mass.
    InvalidMass(Real),
    /// A body was built with a non-finite position or velocity.
    InvalidState,
    /// A configuration value is outside its domain.
    InvalidConfig(&'static str),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::CapacityExceeded { capacity } => {
                write!(f, "body store is full (capacity {})", capacity)
            }
            SimError::InvalidMass(mass) => {
                write!(f, "body mass must be positive and finite, got {}", mass)
            }
            SimError::InvalidState => write!(f, "body position and velocity must be finite"),
            SimError::InvalidConfig(what) => write!(f, "invalid simulation config: {}", what),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let err = SimError::CapacityExceeded { capacity: 4 };
        assert_eq!(err.to_string(), "body store is full (capacity 4)");
        assert!(SimError::InvalidMass(-1.0).to_string().contains("-1"));
        assert!(
            SimError::InvalidConfig("dt must be positive")
                .to_string()
                .contains("dt must be positive")
        );
    }
}
