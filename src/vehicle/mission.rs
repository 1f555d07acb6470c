use std::marker::PhantomData;

use log::warn;

use crate::dynamics::state::{StateLayout, StateVector, Vertical, WindCoupled};
use crate::error::SimError;
use crate::physics::Environment;

use super::phase::Phase;

// ---------------------------------------------------------------------------
// Mission: ordered sequence of descent phases
// ---------------------------------------------------------------------------

/// Landing constraints. They only flag results after a run; integration ignores them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub max_time: f64,           // s
    pub max_kinetic_energy: f64, // ft·lbf
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_time: 90.0,
            max_kinetic_energy: 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mission<L, const N: usize> {
    name: String,
    phases: Vec<Phase>,
    initial_state: StateVector<N>,
    limits: Limits,
    environment: Environment,
    layout: PhantomData<L>,
}

pub type VerticalMission = Mission<Vertical, 2>;
pub type DriftMission = Mission<WindCoupled, 4>;

impl<L: StateLayout<N>, const N: usize> Mission<L, N> {
    pub fn builder(name: impl Into<String>) -> MissionBuilder<L, N> {
        MissionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn initial_state(&self) -> &StateVector<N> {
        &self.initial_state
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mass baked into each phase's dynamics.
    pub fn masses(&self) -> Vec<f64> {
        self.phases.iter().map(Phase::mass).collect()
    }
}

// ---------------------------------------------------------------------------
// Mission builder
// ---------------------------------------------------------------------------

pub struct MissionBuilder<L, const N: usize> {
    name: String,
    phases: Vec<Phase>,
    initial_state: Option<StateVector<N>>,
    limits: Limits,
    environment: Environment,
    layout: PhantomData<L>,
}

impl<L: StateLayout<N>, const N: usize> MissionBuilder<L, N> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: vec![],
            initial_state: None,
            limits: Limits::default(),
            environment: Environment::default(),
            layout: PhantomData,
        }
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn initial_state(mut self, state: StateVector<N>) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = env;
        self
    }

    pub fn wind_speed(mut self, v: f64) -> Self {
        self.environment.wind_speed = v;
        self
    }

    pub fn build(self) -> Result<Mission<L, N>, SimError> {
        if self.phases.is_empty() {
            return Err(SimError::config(format!("mission '{}' has no phases", self.name)));
        }
        let initial_state = self.initial_state.ok_or_else(|| {
            SimError::config(format!("mission '{}' has no initial state", self.name))
        })?;
        if initial_state.iter().any(|v| !v.is_finite()) {
            return Err(SimError::config(format!(
                "mission '{}' initial state is not finite",
                self.name
            )));
        }
        for (label, v) in [
            ("max time", self.limits.max_time),
            ("max kinetic energy", self.limits.max_kinetic_energy),
        ] {
            if !(v > 0.0 && v.is_finite()) {
                return Err(SimError::config(format!(
                    "mission '{}': {} must be finite and positive, got {}",
                    self.name, label, v
                )));
            }
        }
        self.environment.validate()?;
        // Every phase's dynamics must be buildable before anything integrates.
        for phase in &self.phases {
            L::equation(phase.mass(), phase.drag(), &self.environment)?;
        }

        warn_on_unreachable_phases::<L, N>(&self.name, &initial_state, &self.phases);

        Ok(Mission {
            name: self.name,
            phases: self.phases,
            initial_state,
            limits: self.limits,
            environment: self.environment,
            layout: PhantomData,
        })
    }
}

/// A phase whose breaking altitude is not below the altitude it starts from never runs.
fn warn_on_unreachable_phases<L: StateLayout<N>, const N: usize>(
    name: &str,
    initial: &StateVector<N>,
    phases: &[Phase],
) {
    let mut entry_altitude = L::altitude(initial);
    for (i, phase) in phases.iter().enumerate() {
        if entry_altitude <= phase.breaking_altitude() {
            warn!(
                "mission '{}': phase {} ('{}') breaks at {:.1} ft but starts at or below it ({:.1} ft); it will not execute",
                name,
                i,
                phase.name(),
                phase.breaking_altitude(),
                entry_altitude
            );
        }
        entry_altitude = entry_altitude.min(phase.breaking_altitude());
    }
}

// ---------------------------------------------------------------------------
// Preset missions
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::physics::units::lb_to_slugs;
    use crate::vehicle::parachute::ParachuteCatalog;
    use crate::vehicle::phase::PhaseBuilder;

    pub const RELEASE_ALTITUDE: f64 = 4000.0; // ft
    pub const MAIN_DEPLOY_ALTITUDE: f64 = 600.0; // ft

    /// Separately-landing sections of the rocket body: (name, slug).
    pub fn rocket_sections() -> Vec<(String, f64)> {
        vec![
            ("Mid".into(), lb_to_slugs(17.81)),
            ("Aft".into(), lb_to_slugs(14.67 + 4.06)),
        ]
    }

    /// Separately-landing sections of the payload: (name, slug).
    pub fn payload_sections() -> Vec<(String, f64)> {
        vec![
            ("Payload".into(), lb_to_slugs(9.34)),
            ("Nose".into(), lb_to_slugs(2.4)),
        ]
    }

    fn total(sections: &[(String, f64)]) -> f64 {
        sections.iter().map(|(_, m)| m).sum()
    }

    /// Rocket body: 24 in drogue to main deploy, certXXL main to the ground.
    pub fn rocket(catalog: &ParachuteCatalog) -> Result<VerticalMission, SimError> {
        let mass = total(&rocket_sections());
        Mission::builder("Rocket")
            .initial_state(Vertical::state(RELEASE_ALTITUDE, 0.0))
            .phase(
                PhaseBuilder::new("Drogue")
                    .mass(mass)
                    .drag(catalog.require("24")?)
                    .time_step(0.01)
                    .breaking_altitude(MAIN_DEPLOY_ALTITUDE)
                    .build()?,
            )
            .phase(
                PhaseBuilder::new("Main")
                    .mass(mass)
                    .drag(catalog.require("certXXL")?)
                    .time_step(0.01)
                    .breaking_altitude(0.0)
                    .build()?,
            )
            .build()
    }

    /// Payload: tumbles free to main deploy, then certL to the ground.
    pub fn payload(catalog: &ParachuteCatalog) -> Result<VerticalMission, SimError> {
        let mass = total(&payload_sections());
        Mission::builder("Payload")
            .initial_state(Vertical::state(RELEASE_ALTITUDE, 0.0))
            .phase(
                PhaseBuilder::new("Freefall")
                    .mass(mass)
                    .drag(catalog.require("freefall")?)
                    .time_step(0.01)
                    .breaking_altitude(MAIN_DEPLOY_ALTITUDE)
                    .build()?,
            )
            .phase(
                PhaseBuilder::new("Main")
                    .mass(mass)
                    .drag(catalog.require("certL")?)
                    .time_step(0.01)
                    .breaking_altitude(0.0)
                    .build()?,
            )
            .build()
    }

    /// Rocket body drifting in a log-profile wind of `wind_speed` ft/s.
    pub fn rocket_in_wind(
        catalog: &ParachuteCatalog,
        wind_speed: f64,
    ) -> Result<DriftMission, SimError> {
        let mass = total(&rocket_sections());
        Mission::builder("Rocket (wind)")
            .initial_state(WindCoupled::state(0.0, RELEASE_ALTITUDE, 0.0, 0.0))
            .wind_speed(wind_speed)
            .phase(
                PhaseBuilder::new("Drogue")
                    .mass(mass)
                    .drag(catalog.require("24")?)
                    .breaking_altitude(MAIN_DEPLOY_ALTITUDE)
                    .build()?,
            )
            .phase(
                PhaseBuilder::new("Main")
                    .mass(mass)
                    .drag(catalog.require("certXXL")?)
                    .breaking_altitude(0.0)
                    .build()?,
            )
            .build()
    }
}
