use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::dynamics::state::{StateLayout, Vertical, WindCoupled};
use crate::error::SimError;
use crate::physics::units::{inches_to_feet, lb_to_slugs};
use crate::physics::{DragBody, Environment};
use crate::vehicle::{DriftMission, Limits, Mission, ParachuteCatalog, PhaseBuilder, VerticalMission};

// ---------------------------------------------------------------------------
// YAML scenario files
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Vertical,
    WindCoupled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default)]
    pub model: ModelKind,
    /// Components in the model's state order.
    pub initial_state: Vec<f64>,
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Reference wind speed at 10 ft, ft/s.
    #[serde(default)]
    pub wind_speed: f64,
    /// Extra parachutes layered over the standard catalog.
    #[serde(default)]
    pub parachutes: Vec<ParachuteConfig>,
    pub phases: Vec<PhaseConfig>,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LimitsConfig {
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    #[serde(default = "default_max_kinetic_energy")]
    pub max_kinetic_energy: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_time: default_max_time(),
            max_kinetic_energy: default_max_kinetic_energy(),
        }
    }
}

fn default_max_time() -> f64 {
    Limits::default().max_time
}

fn default_max_kinetic_energy() -> f64 {
    Limits::default().max_kinetic_energy
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParachuteConfig {
    Circular {
        name: String,
        cd: f64,
        diameter_in: f64,
    },
    Area {
        name: String,
        cd: f64,
        area_ft2: f64,
    },
    /// Effective area from a test drop that settled at `velocity` ft/s under `mass_lb`.
    TestDescent {
        name: String,
        cd: f64,
        velocity: f64,
        mass_lb: f64,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhaseConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub parachute: String,
    #[serde(default)]
    pub mass_lb: Option<f64>,
    #[serde(default)]
    pub mass_slug: Option<f64>,
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    pub breaking_altitude: f64,
}

fn default_time_step() -> f64 {
    0.01
}

#[derive(Debug, Deserialize, Clone)]
pub struct SectionConfig {
    pub name: String,
    pub mass_lb: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read YAML: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown parachute '{name}' (known: {known})")]
    UnknownParachute { name: String, known: String },
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// A mission built from a scenario file, in whichever state layout it asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedMission {
    Vertical(VerticalMission),
    WindCoupled(DriftMission),
}

impl LoadedMission {
    pub fn name(&self) -> &str {
        match self {
            LoadedMission::Vertical(m) => m.name(),
            LoadedMission::WindCoupled(m) => m.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub mission: LoadedMission,
    /// Separately-landing sections: (name, slug).
    pub sections: Vec<(String, f64)>,
}

pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ConfigError> {
    let reader = File::open(path)?;
    let config: ScenarioConfig = serde_yaml::from_reader(reader)?;
    config.into_scenario()
}

pub fn parse_scenario(yaml: &str) -> Result<Scenario, ConfigError> {
    let config: ScenarioConfig = serde_yaml::from_str(yaml)?;
    config.into_scenario()
}

impl ScenarioConfig {
    pub fn into_scenario(self) -> Result<Scenario, ConfigError> {
        let env = Environment::with_wind(self.wind_speed);
        let catalog = self.catalog(&env)?;

        let mission = match self.model {
            ModelKind::Vertical => LoadedMission::Vertical(self.mission::<Vertical, 2>(&catalog, env)?),
            ModelKind::WindCoupled => {
                LoadedMission::WindCoupled(self.mission::<WindCoupled, 4>(&catalog, env)?)
            }
        };

        let sections = self
            .sections
            .iter()
            .map(|s| {
                let slug = lb_to_slugs(s.mass_lb);
                if slug > 0.0 && slug.is_finite() {
                    Ok((s.name.clone(), slug))
                } else {
                    Err(SimError::config(format!(
                        "section '{}': mass must be finite and positive, got {} lb",
                        s.name, s.mass_lb
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scenario { mission, sections })
    }

    fn catalog(&self, env: &Environment) -> Result<ParachuteCatalog, ConfigError> {
        let extra = self
            .parachutes
            .iter()
            .map(|p| {
                let entry = match p {
                    ParachuteConfig::Circular { name, cd, diameter_in } => {
                        (name.clone(), DragBody::circular(*cd, inches_to_feet(*diameter_in))?)
                    }
                    ParachuteConfig::Area { name, cd, area_ft2 } => {
                        (name.clone(), DragBody::new(*cd, *area_ft2)?)
                    }
                    ParachuteConfig::TestDescent { name, cd, velocity, mass_lb } => (
                        name.clone(),
                        DragBody::from_test_descent(*cd, *velocity, lb_to_slugs(*mass_lb), env)?,
                    ),
                };
                Ok(entry)
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        Ok(ParachuteCatalog::standard(env)?.extended(extra))
    }

    fn mission<L: StateLayout<N>, const N: usize>(
        &self,
        catalog: &ParachuteCatalog,
        env: Environment,
    ) -> Result<Mission<L, N>, ConfigError> {
        let mut builder = Mission::<L, N>::builder(self.name.clone())
            .initial_state(L::state_from_slice(&self.initial_state)?)
            .limits(Limits {
                max_time: self.limits.max_time,
                max_kinetic_energy: self.limits.max_kinetic_energy,
            })
            .environment(env);

        for (i, p) in self.phases.iter().enumerate() {
            let drag = catalog.get(&p.parachute).copied().ok_or_else(|| {
                ConfigError::UnknownParachute {
                    name: p.parachute.clone(),
                    known: catalog.names().collect::<Vec<_>>().join(", "),
                }
            })?;
            let mass = match (p.mass_lb, p.mass_slug) {
                (Some(lb), None) => lb_to_slugs(lb),
                (None, Some(slug)) => slug,
                _ => {
                    return Err(SimError::config(format!(
                        "phase {} of '{}': give exactly one of mass_lb or mass_slug",
                        i, self.name
                    ))
                    .into())
                }
            };
            let name = p.name.clone().unwrap_or_else(|| p.parachute.clone());
            builder = builder.phase(
                PhaseBuilder::new(name)
                    .mass(mass)
                    .drag(drag)
                    .time_step(p.time_step)
                    .breaking_altitude(p.breaking_altitude)
                    .build()?,
            );
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROCKET: &str = r#"
name: Rocket
initial_state: [4000.0, 0.0]
phases:
  - parachute: "24"
    mass_lb: 36.54
    breaking_altitude: 600
  - name: Main
    parachute: certXXL
    mass_lb: 36.54
    breaking_altitude: 0
sections:
  - name: Mid
    mass_lb: 17.81
  - name: Aft
    mass_lb: 18.73
"#;

    #[test]
    fn vertical_scenario_parses_with_defaults() {
        let s = parse_scenario(ROCKET).unwrap();
        let LoadedMission::Vertical(m) = &s.mission else {
            panic!("expected vertical mission");
        };
        assert_eq!(m.name(), "Rocket");
        assert_eq!(m.phases().len(), 2);
        assert_eq!(m.phases()[0].name(), "24");
        assert_eq!(m.phases()[1].name(), "Main");
        assert_eq!(m.phases()[0].time_step(), 0.01);
        assert_eq!(*m.limits(), Limits::default());
        assert_relative_eq!(m.phases()[0].mass(), lb_to_slugs(36.54));
        assert_eq!(s.sections.len(), 2);
        assert_eq!(s.sections[1].0, "Aft");
    }

    #[test]
    fn wind_coupled_scenario_with_custom_parachute() {
        let yaml = r#"
name: Windy
model: wind_coupled
initial_state: [0.0, 3000.0, 0.0, 0.0]
wind_speed: 14.7
limits:
  max_time: 120
parachutes:
  - kind: circular
    name: club48
    cd: 1.5
    diameter_in: 48
  - kind: test_descent
    name: rated
    cd: 2.2
    velocity: 17
    mass_lb: 20
phases:
  - parachute: club48
    mass_slug: 1.0
    breaking_altitude: 0
"#;
        let s = parse_scenario(yaml).unwrap();
        let LoadedMission::WindCoupled(m) = s.mission else {
            panic!("expected wind-coupled mission");
        };
        assert_eq!(m.environment().wind_speed, 14.7);
        assert_eq!(m.limits().max_time, 120.0);
        assert_eq!(m.limits().max_kinetic_energy, 75.0);
        let area = m.phases()[0].drag().area();
        assert_relative_eq!(area, std::f64::consts::PI * 4.0, epsilon = 1e-12);
    }

    #[test]
    fn unknown_parachute_is_reported_by_name() {
        let yaml = ROCKET.replace("certXXL", "bedsheet");
        match parse_scenario(&yaml) {
            Err(ConfigError::UnknownParachute { name, known }) => {
                assert_eq!(name, "bedsheet");
                assert!(known.contains("certXXL"));
            }
            other => panic!("expected unknown parachute, got {:?}", other),
        }
    }

    #[test]
    fn state_shape_must_match_model() {
        let yaml = ROCKET.replace("[4000.0, 0.0]", "[0.0, 4000.0, 0.0, 0.0]");
        assert!(matches!(
            parse_scenario(&yaml),
            Err(ConfigError::Sim(SimError::InvalidConfiguration(_)))
        ));
    }

    #[test]
    fn phase_mass_must_be_given_once() {
        let yaml = ROCKET.replacen("    mass_lb: 36.54\n", "", 1);
        assert!(matches!(parse_scenario(&yaml), Err(ConfigError::Sim(_))));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            parse_scenario("name: [unterminated"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_scenario("/nonexistent/scenario.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
