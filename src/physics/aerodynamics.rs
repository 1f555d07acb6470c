use std::f64::consts::PI;

use crate::error::SimError;
use crate::physics::environment::Environment;

// ---------------------------------------------------------------------------
// Drag body: one falling object's drag characteristics
// ---------------------------------------------------------------------------

/// Drag coefficient and reference area of a falling object (parachute, nose cone, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBody {
    cd: f64,
    area: f64, // ft^2
}

impl DragBody {
    pub fn new(cd: f64, area: f64) -> Result<Self, SimError> {
        if !(cd >= 0.0 && cd.is_finite()) {
            return Err(SimError::config(format!(
                "drag coefficient must be finite and non-negative, got {}",
                cd
            )));
        }
        if !(area > 0.0 && area.is_finite()) {
            return Err(SimError::config(format!(
                "reference area must be finite and positive, got {}",
                area
            )));
        }
        Ok(Self { cd, area })
    }

    /// Round canopy: area = pi * (d / 2)^2.
    pub fn circular(cd: f64, diameter: f64) -> Result<Self, SimError> {
        Self::new(cd, PI * (diameter / 2.0).powi(2))
    }

    /// Effective area backed out of a test drop that settled at `velocity` carrying `mass`.
    ///
    /// At terminal velocity drag balances weight, so S = m g / (0.5 cd rho v^2).
    pub fn from_test_descent(
        cd: f64,
        velocity: f64,
        mass: f64,
        env: &Environment,
    ) -> Result<Self, SimError> {
        let q = 0.5 * cd * env.air_density * velocity * velocity;
        if !(q > 0.0 && q.is_finite()) {
            return Err(SimError::config(format!(
                "test descent needs positive cd, density and velocity (cd={}, v={})",
                cd, velocity
            )));
        }
        Self::new(cd, mass * env.gravity / q)
    }

    pub fn cd(&self) -> f64 {
        self.cd
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Drag per unit squared speed per unit mass: cd * 0.5 * rho * S / m.
    pub fn drag_factor(&self, mass: f64, air_density: f64) -> f64 {
        self.cd * 0.5 * air_density * self.area / mass
    }

    /// Steady-state fall speed where drag equals weight (infinite for zero drag).
    pub fn terminal_velocity(&self, mass: f64, env: &Environment) -> f64 {
        let k = self.drag_factor(mass, env.air_density);
        if k > 0.0 {
            (env.gravity / k).sqrt()
        } else {
            f64::INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circular_area_from_diameter() {
        let body = DragBody::circular(0.75, 2.0).unwrap();
        assert_relative_eq!(body.area(), PI, epsilon = 1e-12);
        assert_eq!(body.cd(), 0.75);
    }

    #[test]
    fn test_descent_area_reproduces_test_velocity() {
        let env = Environment::default();
        let mass = 1.8;
        let body = DragBody::from_test_descent(2.59, 17.0, mass, &env).unwrap();
        assert_relative_eq!(body.terminal_velocity(mass, &env), 17.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_non_positive_area() {
        assert!(DragBody::new(0.75, 0.0).is_err());
        assert!(DragBody::new(0.75, -1.0).is_err());
    }

    #[test]
    fn rejects_negative_cd() {
        assert!(DragBody::new(-0.1, 1.0).is_err());
    }

    #[test]
    fn zero_cd_is_free_fall() {
        let body = DragBody::new(0.0, 1.0).unwrap();
        assert_eq!(body.drag_factor(1.0, 0.0023769), 0.0);
        assert!(body.terminal_velocity(1.0, &Environment::default()).is_infinite());
    }
}
