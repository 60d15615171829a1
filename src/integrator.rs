//! Semi-implicit (symplectic) Euler integration.
//!
//! Velocity is kicked first and the position is drifted with the new velocity. Explicit
//! Euler, which drifts with the old velocity, gains energy on every orbit at the step sizes
//! used here.

use crate::body::Body;
use crate::math::Real;

/// Advances one body by `dt` using the force stored by the last force pass.
pub fn integrate(body: &mut Body, dt: Real) {
    let acceleration = body.acceleration();
    let state = &mut body.state;
    state.velocity += acceleration * dt;
    state.position += state.velocity * dt;
}

/// Advances every body, in store order. Forces must already be computed for this step.
pub fn integrate_all(bodies: &mut [Body], dt: Real) {
    for body in bodies.iter_mut() {
        integrate(body, dt);
    }
}
