use crate::error::SimError;
use crate::physics::DragBody;

// ---------------------------------------------------------------------------
// Phase: one segment of descent under a single drag configuration
// ---------------------------------------------------------------------------

/// A descent phase ends once altitude drops to or below `breaking_altitude`.
///
/// Phases are validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    name: String,
    mass: f64,              // slug
    drag: DragBody,
    time_step: f64,         // s
    breaking_altitude: f64, // ft
}

impl Phase {
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        drag: DragBody,
        time_step: f64,
        breaking_altitude: f64,
    ) -> Result<Self, SimError> {
        let name = name.into();
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SimError::config(format!(
                "phase '{}': mass must be finite and positive, got {}",
                name, mass
            )));
        }
        if !(time_step > 0.0 && time_step.is_finite()) {
            return Err(SimError::config(format!(
                "phase '{}': time step must be finite and positive, got {}",
                name, time_step
            )));
        }
        if !breaking_altitude.is_finite() {
            return Err(SimError::config(format!(
                "phase '{}': breaking altitude must be finite, got {}",
                name, breaking_altitude
            )));
        }
        Ok(Self { name, mass, drag, time_step, breaking_altitude })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn drag(&self) -> &DragBody {
        &self.drag
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn breaking_altitude(&self) -> f64 {
        self.breaking_altitude
    }
}

// ---------------------------------------------------------------------------
// Phase builder
// ---------------------------------------------------------------------------

pub struct PhaseBuilder {
    name: String,
    mass: f64,
    cd: f64,
    area: f64,
    drag: Option<DragBody>,
    time_step: f64,
    breaking_altitude: f64,
}

impl PhaseBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1.0,
            cd: 0.75,
            area: 1.0,
            drag: None,
            time_step: 0.01,
            breaking_altitude: 0.0,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn cd(mut self, v: f64) -> Self { self.cd = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }
    pub fn time_step(mut self, v: f64) -> Self { self.time_step = v; self }
    pub fn breaking_altitude(mut self, v: f64) -> Self { self.breaking_altitude = v; self }

    /// Use an already-validated drag body (e.g. from a parachute catalog) instead of cd/area.
    pub fn drag(mut self, body: DragBody) -> Self {
        self.drag = Some(body);
        self
    }

    pub fn build(self) -> Result<Phase, SimError> {
        let drag = match self.drag {
            Some(body) => body,
            None => DragBody::new(self.cd, self.area)?,
        };
        Phase::new(self.name, self.mass, drag, self.time_step, self.breaking_altitude)
    }
}
