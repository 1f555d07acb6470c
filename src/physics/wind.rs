//! Logarithmic boundary-layer wind profile.
//!
//! Wind speed grows with the log of height above the surface roughness length:
//!
//! ```text
//! w(y) = w_ref * ln(y / z0) / ln(z_ref / z0)
//! ```
//!
//! At or below `z0` the log term is non-positive and the profile is not physical, so the
//! speed is clamped to zero there.

/// Default surface roughness length, ft.
pub const ROUGHNESS_LENGTH: f64 = 0.3;
/// Default height of the reference wind measurement, ft.
pub const REFERENCE_HEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogWindProfile {
    pub reference_speed: f64,  // ft/s at reference_height
    pub roughness_length: f64, // ft
    pub reference_height: f64, // ft
}

impl LogWindProfile {
    pub fn new(reference_speed: f64) -> Self {
        Self {
            reference_speed,
            roughness_length: ROUGHNESS_LENGTH,
            reference_height: REFERENCE_HEIGHT,
        }
    }

    /// Horizontal wind speed at `altitude` (ft).
    pub fn speed_at(&self, altitude: f64) -> f64 {
        if altitude <= self.roughness_length || self.reference_speed == 0.0 {
            return 0.0;
        }
        let ratio = (altitude / self.roughness_length).ln()
            / (self.reference_height / self.roughness_length).ln();
        self.reference_speed * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_height_returns_reference_speed() {
        let w = LogWindProfile::new(14.7);
        assert_relative_eq!(w.speed_at(REFERENCE_HEIGHT), 14.7, epsilon = 1e-12);
    }

    #[test]
    fn speed_grows_with_altitude() {
        let w = LogWindProfile::new(10.0);
        assert!(w.speed_at(100.0) > w.speed_at(10.0));
        assert!(w.speed_at(1000.0) > w.speed_at(100.0));
    }

    #[test]
    fn calm_at_and_below_roughness_length() {
        let w = LogWindProfile::new(10.0);
        assert_eq!(w.speed_at(ROUGHNESS_LENGTH), 0.0);
        assert_eq!(w.speed_at(0.0), 0.0);
        assert_eq!(w.speed_at(-3.0), 0.0);
    }
}
