use std::collections::BTreeMap;

use crate::error::SimError;
use crate::physics::units::{inches_to_feet, lb_to_slugs};
use crate::physics::{DragBody, Environment};

/// Settled descent rate of the vendor drop tests the main canopies are rated at, ft/s.
const RATED_DESCENT_RATE: f64 = 17.0;

/// Immutable lookup table of named drag bodies.
///
/// Build one with [`ParachuteCatalog::builder`] (or start from [`ParachuteCatalog::standard`])
/// and hand it to whatever assembles missions; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParachuteCatalog {
    entries: BTreeMap<String, DragBody>,
}

impl ParachuteCatalog {
    pub fn builder() -> ParachuteCatalogBuilder {
        ParachuteCatalogBuilder { entries: BTreeMap::new() }
    }

    /// Drogues, mains, and the payload free-fall body used by the club's recovery setups.
    pub fn standard(env: &Environment) -> Result<Self, SimError> {
        let rated = |cd: f64, lb: f64| {
            DragBody::from_test_descent(cd, RATED_DESCENT_RATE, lb_to_slugs(lb), env)
        };

        Ok(Self::builder()
            .insert("24", DragBody::circular(0.75, inches_to_feet(24.0))?)
            .insert("36", DragBody::circular(0.75, inches_to_feet(36.0))?)
            .insert("freefall", DragBody::circular(4.0, inches_to_feet(7.5))?)
            .insert("classicII 44", rated(1.87, 4.4)?)
            .insert("certL", rated(1.26, 16.2)?)
            .insert("certXL", rated(2.59, 32.6)?)
            .insert("certXXL", rated(2.92, 60.0)?)
            .insert("58", DragBody::circular(1.75, inches_to_feet(58.0))?)
            .build())
    }

    pub fn get(&self, name: &str) -> Option<&DragBody> {
        self.entries.get(name)
    }

    pub fn require(&self, name: &str) -> Result<DragBody, SimError> {
        self.get(name).copied().ok_or_else(|| {
            SimError::config(format!(
                "unknown parachute '{}' (known: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New catalog with extra entries layered over this one (same names are replaced).
    pub fn extended(&self, extra: impl IntoIterator<Item = (String, DragBody)>) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(extra);
        Self { entries }
    }
}

pub struct ParachuteCatalogBuilder {
    entries: BTreeMap<String, DragBody>,
}

impl ParachuteCatalogBuilder {
    pub fn insert(mut self, name: impl Into<String>, body: DragBody) -> Self {
        self.entries.insert(name.into(), body);
        self
    }

    pub fn build(self) -> ParachuteCatalog {
        ParachuteCatalog { entries: self.entries }
    }
}
