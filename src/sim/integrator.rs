use thiserror::Error;

use crate::dynamics::state::StateVector;

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, fixed step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("integration step produced a non-finite state")]
pub struct NonFiniteStep;

/// Advance `y` by exactly one step of size `h`.
///
/// NaN or infinity anywhere in the derivative ends up in the result, which is rejected
/// so a bad evaluation cannot leak into the rest of the trajectory.
pub fn rk4_step<F, const N: usize>(
    f: F,
    y: &StateVector<N>,
    h: f64,
) -> Result<StateVector<N>, NonFiniteStep>
where
    F: Fn(&StateVector<N>) -> StateVector<N>,
{
    let k1 = f(y) * h;
    let k2 = f(&(y + k1 * 0.5)) * h;
    let k3 = f(&(y + k2 * 0.5)) * h;
    let k4 = f(&(y + k3)) * h;

    let next = y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0;
    if next.iter().all(|v| v.is_finite()) {
        Ok(next)
    } else {
        Err(NonFiniteStep)
    }
}
