use serde::Serialize;

use crate::dynamics::state::StateVector;
use crate::vehicle::Limits;

// ---------------------------------------------------------------------------
// Descent events
// ---------------------------------------------------------------------------

/// Kinds of events recorded during or after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    PhaseComplete { phase: usize },
    /// The phase started at or below its breaking altitude and produced no samples.
    PhaseSkipped { phase: usize },
    Landing,
    /// Descent was still under way when the time limit passed.
    TimeLimitExceeded { altitude: f64 },
    /// Touchdown energy of the whole body (`section: None`) or one split section.
    KineticEnergyExceeded { section: Option<usize>, energy: f64, excess: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimEvent {
    pub time: f64,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl SimEvent {
    pub fn new(time: f64, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn is_violation(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TimeLimitExceeded { .. } | EventKind::KineticEnergyExceeded { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Post-hoc limit checks
// ---------------------------------------------------------------------------

/// First sample past `limits.max_time`, reported with the altitude the body had then.
pub fn check_time_limit<const N: usize>(
    times: &[f64],
    states: &[StateVector<N>],
    altitude_index: usize,
    limits: &Limits,
) -> Option<SimEvent> {
    times
        .iter()
        .zip(states)
        .find(|(t, _)| **t > limits.max_time)
        .map(|(t, s)| {
            SimEvent::new(*t, EventKind::TimeLimitExceeded { altitude: s[altitude_index] })
        })
}

/// Flag a touchdown energy above `limits.max_kinetic_energy`.
pub fn check_energy(
    time: f64,
    section: Option<usize>,
    energy: f64,
    limits: &Limits,
) -> Option<SimEvent> {
    (energy > limits.max_kinetic_energy).then(|| {
        SimEvent::new(
            time,
            EventKind::KineticEnergyExceeded {
                section,
                energy,
                excess: energy - limits.max_kinetic_energy,
            },
        )
    })
}
