use crate::dynamics::eom::EquationOfMotion;
use crate::dynamics::state::StateVector;
use crate::error::DivergenceReason;

use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Single-phase integration
// ---------------------------------------------------------------------------

/// Post-step samples of one phase. The phase's initial state is not included.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTrace<const N: usize> {
    pub states: Vec<StateVector<N>>,
    /// `times[i] = (i + 1) * h`, local to the phase.
    pub times: Vec<f64>,
}

impl<const N: usize> PhaseTrace<N> {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn elapsed(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub fn final_state(&self) -> Option<&StateVector<N>> {
        self.states.last()
    }
}

/// Integration stopped without reaching the breaking altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDivergence<const N: usize> {
    pub reason: DivergenceReason,
    /// Last finite state reached.
    pub last_state: StateVector<N>,
    pub steps: usize,
}

/// Step `eom` from `initial` while altitude stays above `breaking_altitude`.
///
/// The first sample at or below the breaking altitude is kept (up to one step of
/// overshoot). Starting at or below it yields an empty trace.
pub fn run_phase<E, const N: usize>(
    eom: &E,
    initial: StateVector<N>,
    time_step: f64,
    breaking_altitude: f64,
    altitude_index: usize,
    max_steps: usize,
) -> Result<PhaseTrace<N>, PhaseDivergence<N>>
where
    E: EquationOfMotion<N>,
{
    let mut y = initial;
    let mut states = Vec::new();
    let mut times = Vec::new();
    let mut steps = 0usize;

    while y[altitude_index] > breaking_altitude {
        if steps == max_steps {
            return Err(PhaseDivergence {
                reason: DivergenceReason::StepLimit(max_steps),
                last_state: y,
                steps,
            });
        }

        y = match rk4_step(|s| eom.derivative(s), &y, time_step) {
            Ok(next) => next,
            Err(_) => {
                return Err(PhaseDivergence {
                    reason: DivergenceReason::NonFinite,
                    last_state: y,
                    steps,
                })
            }
        };
        steps += 1;

        states.push(y);
        times.push(steps as f64 * time_step);
    }

    Ok(PhaseTrace { states, times })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::eom::VerticalDescent;
    use crate::dynamics::state::Vertical;
    use crate::physics::{DragBody, Environment};
    use nalgebra::Vector2;

    fn drogue() -> VerticalDescent {
        let body = DragBody::new(0.75, 3.14).unwrap();
        VerticalDescent::new(1.0, &body, &Environment::default()).unwrap()
    }

    /// Constant upward push stronger than gravity.
    struct Thruster;

    impl EquationOfMotion<2> for Thruster {
        fn derivative(&self, s: &StateVector<2>) -> StateVector<2> {
            Vector2::new(s[1], 5.0)
        }
    }

    /// Blows up below 1000 ft.
    struct Singular;

    impl EquationOfMotion<2> for Singular {
        fn derivative(&self, s: &StateVector<2>) -> StateVector<2> {
            Vector2::new(s[1], -1.0 / (s[0] - 1000.0).max(0.0))
        }
    }

    #[test]
    fn stops_on_first_sample_at_or_below_breaking_altitude() {
        let trace = run_phase(&drogue(), Vertical::state(4000.0, 0.0), 0.01, 500.0, 0, 1_000_000)
            .unwrap();
        let n = trace.len();
        assert!(n > 1);
        assert!(trace.states[n - 1][0] <= 500.0);
        assert!(trace.states[n - 2][0] > 500.0);
    }

    #[test]
    fn altitude_never_increases() {
        let trace = run_phase(&drogue(), Vertical::state(4000.0, 0.0), 0.01, 0.0, 0, 1_000_000)
            .unwrap();
        for w in trace.states.windows(2) {
            assert!(w[1][0] <= w[0][0]);
        }
    }

    #[test]
    fn local_times_start_after_first_step() {
        let trace = run_phase(&drogue(), Vertical::state(100.0, 0.0), 0.05, 0.0, 0, 1_000_000)
            .unwrap();
        assert_eq!(trace.times.len(), trace.states.len());
        assert_eq!(trace.times[0], 0.05);
        for (i, t) in trace.times.iter().enumerate() {
            assert_eq!(*t, (i + 1) as f64 * 0.05);
        }
        assert_eq!(trace.elapsed(), *trace.times.last().unwrap());
    }

    #[test]
    fn starting_below_breaking_altitude_yields_empty_trace() {
        let trace = run_phase(&drogue(), Vertical::state(400.0, -20.0), 0.01, 500.0, 0, 10)
            .unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.elapsed(), 0.0);
        assert!(trace.final_state().is_none());
    }

    #[test]
    fn upward_forcing_hits_step_limit() {
        let err = run_phase(&Thruster, Vertical::state(100.0, 0.0), 0.01, 0.0, 0, 250)
            .unwrap_err();
        assert_eq!(err.reason, DivergenceReason::StepLimit(250));
        assert_eq!(err.steps, 250);
        assert!(err.last_state[0] > 100.0);
    }

    #[test]
    fn non_finite_derivative_aborts_with_last_good_state() {
        let err = run_phase(&Singular, Vertical::state(1000.5, -10.0), 0.01, 0.0, 0, 1_000_000)
            .unwrap_err();
        assert_eq!(err.reason, DivergenceReason::NonFinite);
        assert!(err.last_state.iter().all(|v| v.is_finite()));
    }
}
