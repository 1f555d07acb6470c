use std::fmt;

use thiserror::Error;

/// Why a phase stopped integrating before reaching its breaking altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DivergenceReason {
    /// A derivative evaluation produced NaN or infinity.
    NonFinite,
    /// The per-phase step bound was hit with the body still above the breaking altitude.
    StepLimit(usize),
}

impl fmt::Display for DivergenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceReason::NonFinite => write!(f, "non-finite state"),
            DivergenceReason::StepLimit(n) => write!(f, "step limit of {} exceeded", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Numeric divergence in phase {phase}: {reason} (last state {last_state:?})")]
    NumericDivergence {
        phase: usize,
        reason: DivergenceReason,
        last_state: Vec<f64>,
    },
}

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }
}
