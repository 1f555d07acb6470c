pub mod mission;
pub mod parachute;
pub mod phase;

pub use mission::{presets, DriftMission, Limits, Mission, MissionBuilder, VerticalMission};
pub use parachute::ParachuteCatalog;
pub use phase::{Phase, PhaseBuilder};
