pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use error::{DivergenceReason, SimError};

pub mod prelude {
    pub use crate::dynamics::{SimConfig, StateLayout, StateVector, Vertical, WindCoupled};
    pub use crate::error::SimError;
    pub use crate::physics::{DragBody, Environment};
    pub use crate::sim::{simulate, simulate_with_masses, MissionEngine, RunResult};
    pub use crate::vehicle::{
        presets, DriftMission, Limits, Mission, ParachuteCatalog, PhaseBuilder, VerticalMission,
    };
}
