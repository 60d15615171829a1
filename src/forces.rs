//! Gravitational force pass.
//!
//! Every force for a step is computed from the positions at the start of that step into a
//! separate buffer before anything is written back, so no body ever sees a partially updated
//! neighbour.

use crate::body::Body;
use crate::math::{Real, Vec2, clamped_separation};
use crate::quadtree::QuadTree;
use crate::resources::{ForceModel, SimConfig};

/// Force exerted on a body of mass `mi` at `xi` by a body of mass `mj` at `xj`.
///
/// Magnitude `g * mi * mj / d^2` along the line towards `xj`, with `d` clamped below by
/// `min_separation`. Coincident bodies exert no force on each other.
pub fn pair_force(xi: Vec2, mi: Real, xj: Vec2, mj: Real, g: Real, min_separation: Real) -> Vec2 {
    let (delta, dist) = clamped_separation(xi, xj, min_separation);
    delta * (g * mi * mj / (dist * dist * dist))
}

/// Exact net force on every body, visiting each unordered pair once.
pub fn net_forces(bodies: &[Body], g: Real, min_separation: Real) -> Vec<Vec2> {
    let n = bodies.len();
    let mut out = vec![Vec2::ZERO; n];

    for i in 0..n {
        let bi = &bodies[i];
        for j in (i + 1)..n {
            let bj = &bodies[j];
            let f = pair_force(
                bi.position(),
                bi.mass(),
                bj.position(),
                bj.mass(),
                g,
                min_separation,
            );
            // Equal and opposite.
            out[i] += f;
            out[j] -= f;
        }
    }
    out
}

/// Net forces under the configured force model.
pub fn compute_forces(bodies: &[Body], config: &SimConfig) -> Vec<Vec2> {
    match config.force_model {
        ForceModel::Direct => net_forces(bodies, config.g, config.min_separation),
        ForceModel::BarnesHut { theta } => {
            let tree = QuadTree::build(bodies);
            (0..bodies.len())
                .map(|i| tree.force_on(i, bodies, config.g, config.min_separation, theta))
                .collect()
        }
    }
}

/// Writes the net force into each body's `state.force`. Positions and velocities are untouched.
pub fn apply_forces(bodies: &mut [Body], config: &SimConfig) {
    let forces = compute_forces(bodies, config);
    for (body, force) in bodies.iter_mut().zip(forces) {
        body.state.force = force;
    }
}
