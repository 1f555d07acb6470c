use crate::error::SimError;

// ---------------------------------------------------------------------------
// Physical constants (imperial: ft, slug, s)
// ---------------------------------------------------------------------------

/// Standard gravity, ft/s^2.
pub const GRAVITY: f64 = 32.174_05;
/// Sea-level air density, slug/ft^3.
pub const AIR_DENSITY: f64 = 0.002_376_9;

// ---------------------------------------------------------------------------
// Descent environment
// ---------------------------------------------------------------------------

/// Uniform environment shared by every phase of a mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub gravity: f64,     // ft/s^2
    pub air_density: f64, // slug/ft^3
    pub wind_speed: f64,  // ft/s, measured at the wind profile's reference height
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_density: AIR_DENSITY,
            wind_speed: 0.0,
        }
    }
}

impl Environment {
    pub fn with_wind(wind_speed: f64) -> Self {
        Self { wind_speed, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.gravity.is_finite() {
            return Err(SimError::config(format!("gravity must be finite, got {}", self.gravity)));
        }
        if !(self.air_density >= 0.0 && self.air_density.is_finite()) {
            return Err(SimError::config(format!(
                "air density must be finite and non-negative, got {}",
                self.air_density
            )));
        }
        if !self.wind_speed.is_finite() {
            return Err(SimError::config(format!(
                "wind speed must be finite, got {}",
                self.wind_speed
            )));
        }
        Ok(())
    }
}
