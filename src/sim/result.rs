use serde::Serialize;

use crate::dynamics::state::StateVector;

use super::event::SimEvent;

// ---------------------------------------------------------------------------
// Energy helpers
// ---------------------------------------------------------------------------

/// 0.5 m v^2 (slug, ft/s -> ft·lbf).
pub fn kinetic_energy(mass: f64, velocity: f64) -> f64 {
    0.5 * mass * velocity * velocity
}

/// Speed at which `mass` carries `energy`.
pub fn velocity_for_energy(energy: f64, mass: f64) -> f64 {
    (2.0 * energy / mass).sqrt()
}

/// Constant-wind drift approximation for layouts without a horizontal state.
pub fn estimated_drift(wind_speed: f64, descent_time: f64) -> f64 {
    wind_speed * descent_time
}

// ---------------------------------------------------------------------------
// Run results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseResult<const N: usize> {
    pub name: String,
    /// Post-step samples, in order. Empty if the phase never ran.
    pub states: Vec<StateVector<N>>,
    /// Local sample times, `(i + 1) * h`.
    pub times: Vec<f64>,
    pub elapsed: f64,
    /// Last sample, or the entry state for a phase that never ran.
    pub final_state: StateVector<N>,
    pub final_altitude: f64,
    pub final_velocity: f64,
    /// Mass used for energy bookkeeping (the phase mass unless overridden).
    pub mass: f64,
    pub kinetic_energy: f64,
}

impl<const N: usize> PhaseResult<N> {
    pub fn is_skipped(&self) -> bool {
        self.states.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftSource {
    /// Horizontal position carried in the integrated state.
    Integrated,
    /// Reference wind speed times total descent time.
    Estimated,
}

/// Headline numbers of a completed descent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentSummary {
    pub total_time: f64,            // s
    pub impact_velocity: f64,       // ft/s, signed (negative = down)
    pub impact_kinetic_energy: f64, // ft·lbf
    pub drift: f64,                 // ft
    pub drift_source: DriftSource,
}

/// Everything a completed run produced. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult<const N: usize> {
    pub mission: String,
    pub phases: Vec<PhaseResult<N>>,
    /// Initial state at t = 0 followed by every phase's samples.
    pub global_states: Vec<StateVector<N>>,
    pub global_times: Vec<f64>,
    pub final_state: StateVector<N>,
    pub total_time: f64,
    pub summary: DescentSummary,
    pub events: Vec<SimEvent>,
}

impl<const N: usize> RunResult<N> {
    pub fn per_phase_states(&self) -> Vec<&[StateVector<N>]> {
        self.phases.iter().map(|p| p.states.as_slice()).collect()
    }

    pub fn per_phase_times(&self) -> Vec<&[f64]> {
        self.phases.iter().map(|p| p.times.as_slice()).collect()
    }

    pub fn per_phase_kinetic_energy(&self) -> Vec<f64> {
        self.phases.iter().map(|p| p.kinetic_energy).collect()
    }

    pub fn per_phase_elapsed(&self) -> Vec<f64> {
        self.phases.iter().map(|p| p.elapsed).collect()
    }

    /// Phase index of each global sample; the initial state counts as phase 0.
    pub fn sample_phases(&self) -> Vec<usize> {
        let mut idx = Vec::with_capacity(self.global_states.len());
        idx.push(0);
        for (i, phase) in self.phases.iter().enumerate() {
            idx.extend(std::iter::repeat(i).take(phase.states.len()));
        }
        idx
    }

    pub fn violations(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(|e| e.is_violation())
    }

    pub fn skipped_phases(&self) -> Vec<usize> {
        self.phases
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_skipped())
            .map(|(i, _)| i)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Section split post-processing
// ---------------------------------------------------------------------------

/// Kinetic energy of separately-landing sections at the end of each phase.
///
/// Row `s` holds section `s`'s energy for every phase, using that phase's final vertical
/// velocity. The dynamics are not re-derived; only the energy bookkeeping changes.
pub fn section_energies<const N: usize>(result: &RunResult<N>, sections: &[f64]) -> Vec<Vec<f64>> {
    sections
        .iter()
        .map(|&m| {
            result
                .phases
                .iter()
                .map(|p| kinetic_energy(m, p.final_velocity))
                .collect()
        })
        .collect()
}
