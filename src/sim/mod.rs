pub mod event;
pub mod integrator;
pub mod phase;
pub mod result;
pub mod runner;

pub use event::{check_energy, check_time_limit, EventKind, SimEvent};
pub use integrator::rk4_step;
pub use phase::{run_phase, PhaseTrace};
pub use result::{
    estimated_drift, kinetic_energy, section_energies, velocity_for_energy, DescentSummary,
    DriftSource, PhaseResult, RunResult,
};
pub use runner::{check_sections, simulate, simulate_with_masses, MissionEngine, RunStatus};
