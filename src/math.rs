//! Scalar and vector types shared by the simulation core.
//!
//! The core runs in double precision. `Vec2` is glam's `DVec2` as re-exported by Bevy, so
//! addition, difference, scaling, `length` and `distance` are the glam operations.

pub use bevy::math::DVec2 as Vec2;

/// Real scalar used throughout the core.
pub type Real = f64;

/// Displacement from `from` to `to` together with its length, clamped below by `min`.
///
/// Callers divide by the returned distance, never by `delta.length()`, so coincident points
/// cannot produce an infinite magnitude. For coincident points `delta` is zero and any
/// quantity of the form `delta / d^k` stays zero.
pub fn clamped_separation(from: Vec2, to: Vec2, min: Real) -> (Vec2, Real) {
    let delta = to - from;
    (delta, delta.length().max(min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separation_is_clamped_for_coincident_points() {
        let p = Vec2::new(3.0, -2.0);
        let (delta, dist) = clamped_separation(p, p, 0.5);
        assert_eq!(delta, Vec2::ZERO);
        assert_eq!(dist, 0.5);
    }

    #[test]
    fn separation_matches_euclidean_distance_when_far() {
        let (delta, dist) = clamped_separation(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.5);
        assert_eq!(delta, Vec2::new(3.0, 4.0));
        assert!((dist - 5.0).abs() < 1e-12);
    }
}
