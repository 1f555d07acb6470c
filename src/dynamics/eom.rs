use crate::dynamics::state::{StateLayout, StateVector, Vertical, WindCoupled};
use crate::error::SimError;
use crate::physics::{DragBody, Environment, LogWindProfile};

// ---------------------------------------------------------------------------
// Equations of motion
// ---------------------------------------------------------------------------

/// Closed-form time derivative of a descent state.
///
/// Coefficients are fixed when the equation is built, so evaluation is pure arithmetic.
pub trait EquationOfMotion<const N: usize> {
    fn derivative(&self, state: &StateVector<N>) -> StateVector<N>;
}

fn check_mass(mass: f64) -> Result<(), SimError> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(SimError::config(format!("mass must be finite and positive, got {}", mass)))
    }
}

// ---------------------------------------------------------------------------
// 1-D vertical descent
// ---------------------------------------------------------------------------

/// Quadratic drag along the vertical axis plus uniform gravity.
///
///   dy/dt = v
///   dv/dt = -k v |v| - g,   k = cd * 0.5 * rho * S / m
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalDescent {
    drag_factor: f64,
    gravity: f64,
}

impl VerticalDescent {
    pub fn new(mass: f64, drag: &DragBody, env: &Environment) -> Result<Self, SimError> {
        check_mass(mass)?;
        env.validate()?;
        Ok(Self {
            drag_factor: drag.drag_factor(mass, env.air_density),
            gravity: env.gravity,
        })
    }
}

impl EquationOfMotion<2> for VerticalDescent {
    fn derivative(&self, state: &StateVector<2>) -> StateVector<2> {
        let v = state[Vertical::VERTICAL_VELOCITY];
        // Drag always opposes the direction of travel.
        let accel = -self.drag_factor * v * v.abs() - self.gravity;

        let mut d = StateVector::<2>::zeros();
        d[Vertical::ALTITUDE] = v;
        d[Vertical::VERTICAL_VELOCITY] = accel;
        d
    }
}

// ---------------------------------------------------------------------------
// Wind-coupled descent
// ---------------------------------------------------------------------------

/// Planar descent with drag acting on the velocity relative to a logarithmic wind.
///
/// The air-relative velocity is (u + w(y), v) with direction theta; drag of magnitude
/// k |v_rel|^2 acts along -theta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindDriftDescent {
    drag_factor: f64,
    gravity: f64,
    wind: LogWindProfile,
}

impl WindDriftDescent {
    pub fn new(mass: f64, drag: &DragBody, env: &Environment) -> Result<Self, SimError> {
        check_mass(mass)?;
        env.validate()?;
        Ok(Self {
            drag_factor: drag.drag_factor(mass, env.air_density),
            gravity: env.gravity,
            wind: LogWindProfile::new(env.wind_speed),
        })
    }

    pub fn wind(&self) -> &LogWindProfile {
        &self.wind
    }
}

impl EquationOfMotion<4> for WindDriftDescent {
    fn derivative(&self, state: &StateVector<4>) -> StateVector<4> {
        let y = state[WindCoupled::ALTITUDE];
        let u = state[WindCoupled::HORIZONTAL_VELOCITY];
        let v = state[WindCoupled::VERTICAL_VELOCITY];

        let rel_u = u + self.wind.speed_at(y);
        let theta = v.atan2(rel_u);
        let drag = self.drag_factor * (rel_u * rel_u + v * v);

        let mut d = StateVector::<4>::zeros();
        d[0] = -u;
        d[WindCoupled::ALTITUDE] = v;
        d[WindCoupled::HORIZONTAL_VELOCITY] = -drag * theta.cos();
        d[WindCoupled::VERTICAL_VELOCITY] = -drag * theta.sin() - self.gravity;
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::environment::GRAVITY;
    use approx::assert_relative_eq;

    fn drogue() -> DragBody {
        DragBody::new(0.75, 3.14).unwrap()
    }

    #[test]
    fn zero_velocity_is_pure_gravity() {
        for &(mass, cd, area) in &[(1.0, 0.75, 3.14), (0.2, 2.59, 6.0), (40.0, 0.01, 1e-6)] {
            let body = DragBody::new(cd, area).unwrap();
            let eom = VerticalDescent::new(mass, &body, &Environment::default()).unwrap();
            let d = eom.derivative(&Vertical::state(1200.0, 0.0));
            assert_eq!(d[1], -GRAVITY);
            assert_eq!(d[0], 0.0);
        }
    }

    #[test]
    fn drag_opposes_motion_in_both_directions() {
        let eom = VerticalDescent::new(1.0, &drogue(), &Environment::default()).unwrap();
        let falling = eom.derivative(&Vertical::state(1000.0, -80.0));
        let rising = eom.derivative(&Vertical::state(1000.0, 80.0));
        assert!(falling[1] > -GRAVITY, "drag should slow a falling body");
        assert!(rising[1] < -GRAVITY, "drag should slow a rising body");
        assert_relative_eq!(falling[1] + GRAVITY, -(rising[1] + GRAVITY), epsilon = 1e-12);
    }

    #[test]
    fn drag_balances_gravity_at_terminal_velocity() {
        let env = Environment::default();
        let body = drogue();
        let vt = body.terminal_velocity(1.0, &env);
        let eom = VerticalDescent::new(1.0, &body, &env).unwrap();
        let d = eom.derivative(&Vertical::state(1000.0, -vt));
        assert_relative_eq!(d[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_mass_rejected_at_construction() {
        let env = Environment::default();
        assert!(matches!(
            VerticalDescent::new(0.0, &drogue(), &env),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            WindDriftDescent::new(-1.0, &drogue(), &env),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn wind_coupled_matches_vertical_in_calm_air() {
        let env = Environment::default();
        let vertical = VerticalDescent::new(1.0, &drogue(), &env).unwrap();
        let planar = WindDriftDescent::new(1.0, &drogue(), &env).unwrap();
        let dv = vertical.derivative(&Vertical::state(900.0, -50.0));
        let dp = planar.derivative(&WindCoupled::state(0.0, 900.0, 0.0, -50.0));
        assert_relative_eq!(dp[1], dv[0], epsilon = 1e-12);
        assert_relative_eq!(dp[3], dv[1], epsilon = 1e-9);
        assert_relative_eq!(dp[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn wind_pushes_body_downwind() {
        let env = Environment::with_wind(15.0);
        let eom = WindDriftDescent::new(1.0, &drogue(), &env).unwrap();
        let d = eom.derivative(&WindCoupled::state(0.0, 500.0, 0.0, -40.0));
        // Horizontal velocity becomes negative (away from the wind), drift rate positive
        // once that velocity builds.
        assert!(d[2] < 0.0);
        assert_eq!(d[0], 0.0);
    }

    #[test]
    fn wind_coupled_at_rest_is_pure_gravity() {
        let eom = WindDriftDescent::new(1.0, &drogue(), &Environment::default()).unwrap();
        let d = eom.derivative(&WindCoupled::state(0.0, 300.0, 0.0, 0.0));
        assert_eq!(d[3], -GRAVITY);
    }
}
