pub mod eom;
pub mod state;

pub use eom::{EquationOfMotion, VerticalDescent, WindDriftDescent};
pub use state::{SimConfig, StateLayout, StateVector, Vertical, WindCoupled};
