use log::{debug, info, warn};

use crate::dynamics::state::{SimConfig, StateLayout};
use crate::error::SimError;
use crate::vehicle::{Limits, Mission};

use super::event::{check_energy, check_time_limit, EventKind, SimEvent};
use super::phase::run_phase;
use super::result::{
    estimated_drift, kinetic_energy, section_energies, DescentSummary, DriftSource, PhaseResult,
    RunResult,
};

// ---------------------------------------------------------------------------
// Mission engine: chains phases into one descent
// ---------------------------------------------------------------------------

/// Where the engine is in its current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Configured,
    Running(usize),
    Completed,
    Failed(usize),
}

/// Runs a mission's phases in order, each starting from the previous phase's final state.
///
/// Equations of motion are built once in [`MissionEngine::new`]. Every call to `run`
/// starts from scratch and returns a fresh [`RunResult`], so repeated runs never see
/// each other's samples.
pub struct MissionEngine<'m, L: StateLayout<N>, const N: usize> {
    mission: &'m Mission<L, N>,
    equations: Vec<L::Equation>,
    config: SimConfig,
    status: RunStatus,
}

impl<'m, L: StateLayout<N>, const N: usize> MissionEngine<'m, L, N> {
    pub fn new(mission: &'m Mission<L, N>, config: SimConfig) -> Result<Self, SimError> {
        if config.max_steps_per_phase == 0 {
            return Err(SimError::config("max steps per phase must be at least 1"));
        }
        let equations = mission
            .phases()
            .iter()
            .map(|p| L::equation(p.mass(), p.drag(), mission.environment()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            mission,
            equations,
            config,
            status: RunStatus::Configured,
        })
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn mission(&self) -> &Mission<L, N> {
        self.mission
    }

    /// Run with each phase's own mass for energy bookkeeping.
    pub fn run(&mut self) -> Result<RunResult<N>, SimError> {
        let masses = self.mission.masses();
        self.execute(&masses)
    }

    /// Run with per-phase masses replacing the phase masses in energy bookkeeping only.
    pub fn run_with_masses(&mut self, masses: &[f64]) -> Result<RunResult<N>, SimError> {
        let n = self.mission.phases().len();
        if masses.len() != n {
            return Err(SimError::config(format!(
                "mass override has {} entries but mission '{}' has {} phases",
                masses.len(),
                self.mission.name(),
                n
            )));
        }
        if let Some(bad) = masses.iter().find(|m| !(**m > 0.0 && m.is_finite())) {
            return Err(SimError::config(format!(
                "override masses must be finite and positive, got {}",
                bad
            )));
        }
        self.execute(masses)
    }

    fn execute(&mut self, masses: &[f64]) -> Result<RunResult<N>, SimError> {
        self.status = RunStatus::Configured;
        let mission = self.mission;

        let mut state = *mission.initial_state();
        let mut global_states = vec![state];
        let mut global_times = vec![0.0];
        let mut phases = Vec::with_capacity(self.equations.len());
        let mut events = Vec::new();

        for (i, (phase, eom)) in mission.phases().iter().zip(&self.equations).enumerate() {
            self.status = RunStatus::Running(i);
            let entry_time = global_times.last().copied().unwrap_or(0.0);
            debug!(
                "{}: phase {} ('{}') from {:.1} ft, breaks at {:.1} ft",
                mission.name(),
                i,
                phase.name(),
                L::altitude(&state),
                phase.breaking_altitude()
            );

            let trace = match run_phase(
                eom,
                state,
                phase.time_step(),
                phase.breaking_altitude(),
                L::ALTITUDE,
                self.config.max_steps_per_phase,
            ) {
                Ok(trace) => trace,
                Err(d) => {
                    self.status = RunStatus::Failed(i);
                    return Err(SimError::NumericDivergence {
                        phase: i,
                        reason: d.reason,
                        last_state: d.last_state.iter().copied().collect(),
                    });
                }
            };

            if trace.is_empty() {
                warn!(
                    "{}: phase {} ('{}') never executed: entry altitude {:.1} ft is not above breaking altitude {:.1} ft",
                    mission.name(),
                    i,
                    phase.name(),
                    L::altitude(&state),
                    phase.breaking_altitude()
                );
                events.push(SimEvent::new(entry_time, EventKind::PhaseSkipped { phase: i }));
            }

            let final_state = trace.final_state().copied().unwrap_or(state);
            let final_velocity = L::vertical_velocity(&final_state);
            let elapsed = trace.elapsed();

            global_times.extend(trace.times.iter().map(|t| t + entry_time));
            global_states.extend_from_slice(&trace.states);
            events.push(SimEvent::new(entry_time + elapsed, EventKind::PhaseComplete { phase: i }));

            debug!(
                "{}: phase {} done, {} samples, {:.2} s, v = {:.2} ft/s",
                mission.name(),
                i,
                trace.len(),
                elapsed,
                final_velocity
            );

            phases.push(PhaseResult {
                name: phase.name().to_string(),
                elapsed,
                final_altitude: L::altitude(&final_state),
                final_velocity,
                mass: masses[i],
                kinetic_energy: kinetic_energy(masses[i], final_velocity),
                final_state,
                states: trace.states,
                times: trace.times,
            });
            state = final_state;
        }

        let total_time = global_times.last().copied().unwrap_or(0.0);
        let final_state = state;

        let (drift, drift_source) = match L::drift(&final_state) {
            Some(x) => (x, DriftSource::Integrated),
            None => (
                estimated_drift(mission.environment().wind_speed, total_time),
                DriftSource::Estimated,
            ),
        };
        let impact_velocity = L::vertical_velocity(&final_state);
        let impact_kinetic_energy = phases.last().map_or(0.0, |p| p.kinetic_energy);

        events.push(SimEvent::new(total_time, EventKind::Landing));
        let limits = mission.limits();
        events.extend(check_time_limit(&global_times, &global_states, L::ALTITUDE, limits));
        events.extend(check_energy(total_time, None, impact_kinetic_energy, limits));

        self.status = RunStatus::Completed;
        info!(
            "{}: landed after {:.2} s at {:.2} ft/s ({:.2} ft·lbf)",
            mission.name(),
            total_time,
            impact_velocity.abs(),
            impact_kinetic_energy
        );

        Ok(RunResult {
            mission: mission.name().to_string(),
            phases,
            global_states,
            global_times,
            final_state,
            total_time,
            summary: DescentSummary {
                total_time,
                impact_velocity,
                impact_kinetic_energy,
                drift,
                drift_source,
            },
            events,
        })
    }
}

/// Run a mission once with the default config.
pub fn simulate<L: StateLayout<N>, const N: usize>(
    mission: &Mission<L, N>,
) -> Result<RunResult<N>, SimError> {
    MissionEngine::new(mission, SimConfig::default())?.run()
}

/// Run a mission once with per-phase bookkeeping masses.
pub fn simulate_with_masses<L: StateLayout<N>, const N: usize>(
    mission: &Mission<L, N>,
    masses: &[f64],
) -> Result<RunResult<N>, SimError> {
    MissionEngine::new(mission, SimConfig::default())?.run_with_masses(masses)
}

/// Touchdown energy events for sections that land separately, one per section over the limit.
pub fn check_sections<const N: usize>(
    result: &RunResult<N>,
    sections: &[f64],
    limits: &Limits,
) -> Vec<SimEvent> {
    section_energies(result, sections)
        .iter()
        .enumerate()
        .filter_map(|(s, row)| {
            row.last()
                .and_then(|&energy| check_energy(result.total_time, Some(s), energy, limits))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::{Vertical, WindCoupled};
    use crate::error::DivergenceReason;
    use crate::physics::Environment;
    use crate::vehicle::{DriftMission, PhaseBuilder, VerticalMission};

    fn two_phase() -> VerticalMission {
        VerticalMission::builder("Two-phase")
            .initial_state(Vertical::state(4000.0, 0.0))
            .phase(
                PhaseBuilder::new("Drogue")
                    .mass(1.0)
                    .cd(0.75)
                    .area(3.14)
                    .breaking_altitude(500.0)
                    .build()
                    .unwrap(),
            )
            .phase(
                PhaseBuilder::new("Main")
                    .mass(1.0)
                    .cd(2.59)
                    .area(6.0)
                    .breaking_altitude(0.0)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn phases_chain_final_to_initial() {
        let m = two_phase();
        let r = simulate(&m).unwrap();
        assert_eq!(r.phases.len(), 2);
        assert!(r.phases[0].final_altitude <= 500.0);
        assert!(r.phases[1].final_altitude <= 0.0);
        // First sample of phase 2 is one step from phase 1's last.
        let p1_last = r.phases[0].final_state;
        let p2_first = r.phases[1].states[0];
        assert!((p2_first[0] - p1_last[0]).abs() < 2.0);
        assert_eq!(r.final_state, *r.global_states.last().unwrap());
        assert_eq!(r.total_time, *r.global_times.last().unwrap());
    }

    #[test]
    fn global_series_is_offset_concatenation() {
        let r = simulate(&two_phase()).unwrap();
        assert_eq!(r.global_states.len(), r.global_times.len());
        assert_eq!(r.global_times[0], 0.0);
        for w in r.global_times.windows(2) {
            assert!(w[1] > w[0]);
        }
        let mut expected = vec![0.0];
        let mut offset = 0.0;
        for p in &r.phases {
            expected.extend(p.times.iter().map(|t| t + offset));
            offset = *expected.last().unwrap();
        }
        assert_eq!(r.global_times, expected);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let m = two_phase();
        let mut engine = MissionEngine::new(&m, SimConfig::default()).unwrap();
        let a = engine.run().unwrap();
        let b = engine.run().unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.status(), RunStatus::Completed);
    }

    #[test]
    fn mass_override_length_must_match_phases() {
        let m = two_phase();
        let mut engine = MissionEngine::new(&m, SimConfig::default()).unwrap();
        let err = engine.run_with_masses(&[1.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
        assert_eq!(engine.status(), RunStatus::Configured);
    }

    #[test]
    fn mass_override_changes_energy_not_trajectory() {
        let m = two_phase();
        let base = simulate(&m).unwrap();
        let split = simulate_with_masses(&m, &[0.5, 0.5]).unwrap();
        assert_eq!(base.global_states, split.global_states);
        for (a, b) in base.phases.iter().zip(&split.phases) {
            assert!((b.kinetic_energy - 0.5 * a.kinetic_energy).abs() < 1e-9);
        }
    }

    #[test]
    fn skipped_phase_passes_state_through() {
        let m = VerticalMission::builder("Misordered")
            .initial_state(Vertical::state(2000.0, 0.0))
            .phase(PhaseBuilder::new("A").cd(0.75).area(3.14).breaking_altitude(800.0).build().unwrap())
            .phase(PhaseBuilder::new("B").cd(0.75).area(3.14).breaking_altitude(900.0).build().unwrap())
            .phase(PhaseBuilder::new("C").cd(2.59).area(6.0).breaking_altitude(0.0).build().unwrap())
            .build()
            .unwrap();
        let r = simulate(&m).unwrap();
        assert_eq!(r.skipped_phases(), vec![1]);
        assert_eq!(r.phases[1].elapsed, 0.0);
        assert_eq!(r.phases[1].final_state, r.phases[0].final_state);
        assert!(r
            .events
            .iter()
            .any(|e| e.kind == EventKind::PhaseSkipped { phase: 1 }));
        assert!(r.phases[2].final_altitude <= 0.0);
    }

    #[test]
    fn step_limit_surfaces_as_divergence() {
        let m = two_phase();
        let mut engine =
            MissionEngine::new(&m, SimConfig { max_steps_per_phase: 100 }).unwrap();
        match engine.run() {
            Err(SimError::NumericDivergence { phase, reason, last_state }) => {
                assert_eq!(phase, 0);
                assert_eq!(reason, DivergenceReason::StepLimit(100));
                assert_eq!(last_state.len(), 2);
                assert!(last_state[0] > 500.0);
            }
            other => panic!("expected divergence, got {:?}", other),
        }
        assert_eq!(engine.status(), RunStatus::Failed(0));
    }

    #[test]
    fn limits_flag_without_altering_trajectory() {
        let strict = VerticalMission::builder("Strict")
            .initial_state(Vertical::state(4000.0, 0.0))
            .limits(Limits { max_time: 1.0, max_kinetic_energy: 1.0 })
            .phase(PhaseBuilder::new("Main").mass(1.0).cd(2.59).area(6.0).build().unwrap())
            .build()
            .unwrap();
        let r = simulate(&strict).unwrap();
        let kinds: Vec<_> = r.violations().map(|e| &e.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], EventKind::TimeLimitExceeded { .. }));
        assert!(matches!(kinds[1], EventKind::KineticEnergyExceeded { section: None, .. }));
    }

    #[test]
    fn heavy_section_flagged_light_section_not() {
        let r = simulate(&two_phase()).unwrap();
        let v = r.summary.impact_velocity;
        // One section just above the limit, one well under.
        let heavy = 2.0 * 80.0 / (v * v);
        let light = 2.0 * 10.0 / (v * v);
        let events = check_sections(&r, &[heavy, light], &Limits::default());
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].kind,
            EventKind::KineticEnergyExceeded { section: Some(0), .. }
        ));
    }

    #[test]
    fn vertical_drift_is_estimated_from_wind() {
        let m = VerticalMission::builder("Breezy")
            .initial_state(Vertical::state(1000.0, 0.0))
            .wind_speed(10.0)
            .phase(PhaseBuilder::new("Main").mass(1.0).cd(2.59).area(6.0).build().unwrap())
            .build()
            .unwrap();
        let r = simulate(&m).unwrap();
        assert_eq!(r.summary.drift_source, DriftSource::Estimated);
        assert!((r.summary.drift - 10.0 * r.total_time).abs() < 1e-9);
    }

    #[test]
    fn wind_coupled_drift_is_integrated_downwind() {
        let m = DriftMission::builder("Windy")
            .initial_state(WindCoupled::state(0.0, 1000.0, 0.0, 0.0))
            .environment(Environment::with_wind(15.0))
            .phase(PhaseBuilder::new("Main").mass(1.0).cd(2.59).area(6.0).build().unwrap())
            .build()
            .unwrap();
        let r = simulate(&m).unwrap();
        assert_eq!(r.summary.drift_source, DriftSource::Integrated);
        assert!(r.summary.drift > 0.0);
        assert!(r.final_state.iter().all(|v| v.is_finite()));
        assert!(r.phases[0].final_altitude <= 0.0);
    }
}
