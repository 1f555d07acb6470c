use std::fmt::Debug;

use nalgebra::{SVector, Vector2, Vector4};

use crate::dynamics::eom::{EquationOfMotion, VerticalDescent, WindDriftDescent};
use crate::error::SimError;
use crate::physics::{DragBody, Environment};

// ---------------------------------------------------------------------------
// State vector
// ---------------------------------------------------------------------------

/// Fixed-size descent state. Units: ft, ft/s.
pub type StateVector<const N: usize> = SVector<f64, N>;

/// Compile-time description of a state vector shape.
///
/// A layout fixes where altitude and vertical velocity live, whether horizontal drift is
/// integrated, and which equation of motion drives the state. Every phase of a mission
/// shares one layout.
pub trait StateLayout<const N: usize>: Debug + Clone + Copy + PartialEq + Default {
    const NAME: &'static str;
    const ALTITUDE: usize;
    const VERTICAL_VELOCITY: usize;
    /// Index of the integrated horizontal position, if the layout carries one.
    const DRIFT: Option<usize>;

    type Equation: EquationOfMotion<N> + Debug + Clone;

    fn equation(mass: f64, drag: &DragBody, env: &Environment) -> Result<Self::Equation, SimError>;

    fn column_names() -> [&'static str; N];

    fn altitude(state: &StateVector<N>) -> f64 {
        state[Self::ALTITUDE]
    }

    fn vertical_velocity(state: &StateVector<N>) -> f64 {
        state[Self::VERTICAL_VELOCITY]
    }

    fn drift(state: &StateVector<N>) -> Option<f64> {
        Self::DRIFT.map(|i| state[i])
    }

    /// Build a state from loosely-typed input (e.g. a config file), checking its shape.
    fn state_from_slice(values: &[f64]) -> Result<StateVector<N>, SimError> {
        if values.len() != N {
            return Err(SimError::config(format!(
                "{} state needs {} components, got {}",
                Self::NAME,
                N,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SimError::config(format!("initial state component {} is not finite", bad)));
        }
        Ok(StateVector::<N>::from_column_slice(values))
    }
}

// ---------------------------------------------------------------------------
// 1-D vertical layout: (altitude, vertical_velocity)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertical;

impl Vertical {
    pub fn state(altitude: f64, vertical_velocity: f64) -> StateVector<2> {
        Vector2::new(altitude, vertical_velocity)
    }
}

impl StateLayout<2> for Vertical {
    const NAME: &'static str = "vertical";
    const ALTITUDE: usize = 0;
    const VERTICAL_VELOCITY: usize = 1;
    const DRIFT: Option<usize> = None;

    type Equation = VerticalDescent;

    fn equation(mass: f64, drag: &DragBody, env: &Environment) -> Result<VerticalDescent, SimError> {
        VerticalDescent::new(mass, drag, env)
    }

    fn column_names() -> [&'static str; 2] {
        ["altitude", "vertical_velocity"]
    }
}

// ---------------------------------------------------------------------------
// Wind-coupled layout: (drift, altitude, horizontal_velocity, vertical_velocity)
// ---------------------------------------------------------------------------

/// Horizontal velocity is signed positive into the wind, so drift (positive downwind)
/// integrates its negation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindCoupled;

impl WindCoupled {
    pub const HORIZONTAL_VELOCITY: usize = 2;

    pub fn state(
        drift: f64,
        altitude: f64,
        horizontal_velocity: f64,
        vertical_velocity: f64,
    ) -> StateVector<4> {
        Vector4::new(drift, altitude, horizontal_velocity, vertical_velocity)
    }
}

impl StateLayout<4> for WindCoupled {
    const NAME: &'static str = "wind_coupled";
    const ALTITUDE: usize = 1;
    const VERTICAL_VELOCITY: usize = 3;
    const DRIFT: Option<usize> = Some(0);

    type Equation = WindDriftDescent;

    fn equation(mass: f64, drag: &DragBody, env: &Environment) -> Result<WindDriftDescent, SimError> {
        WindDriftDescent::new(mass, drag, env)
    }

    fn column_names() -> [&'static str; 4] {
        ["drift", "altitude", "horizontal_velocity", "vertical_velocity"]
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Integration steps allowed in a single phase before the run is declared divergent.
    pub max_steps_per_phase: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_steps_per_phase: 10_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_accessors() {
        let s = Vertical::state(4000.0, -12.0);
        assert_eq!(Vertical::altitude(&s), 4000.0);
        assert_eq!(Vertical::vertical_velocity(&s), -12.0);
        assert_eq!(Vertical::drift(&s), None);
    }

    #[test]
    fn wind_coupled_accessors() {
        let s = WindCoupled::state(35.0, 800.0, -4.0, -20.0);
        assert_eq!(WindCoupled::altitude(&s), 800.0);
        assert_eq!(WindCoupled::vertical_velocity(&s), -20.0);
        assert_eq!(WindCoupled::drift(&s), Some(35.0));
        assert_eq!(s[WindCoupled::HORIZONTAL_VELOCITY], -4.0);
    }

    #[test]
    fn slice_shape_is_checked() {
        assert!(Vertical::state_from_slice(&[4000.0, 0.0]).is_ok());
        assert!(matches!(
            Vertical::state_from_slice(&[0.0, 4000.0, 0.0, 0.0]),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(WindCoupled::state_from_slice(&[4000.0, 0.0]).is_err());
    }

    #[test]
    fn non_finite_initial_state_rejected() {
        assert!(Vertical::state_from_slice(&[f64::NAN, 0.0]).is_err());
    }
}
