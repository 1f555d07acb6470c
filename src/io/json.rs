use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::{section_energies, DescentSummary, RunResult, SimEvent};

/// Per-phase figures of a run.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport<'a> {
    pub name: &'a str,
    pub samples: usize,
    pub skipped: bool,
    pub elapsed_s: f64,
    pub final_altitude_ft: f64,
    pub final_velocity_fps: f64,
    pub mass_slug: f64,
    pub kinetic_energy_ftlb: f64,
}

/// Touchdown energy of one separately-landing section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport<'a> {
    pub name: &'a str,
    pub mass_slug: f64,
    /// Energy at the end of each phase.
    pub kinetic_energy_ftlb: Vec<f64>,
}

/// Serializable view over a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub mission: &'a str,
    pub summary: &'a DescentSummary,
    pub phases: Vec<PhaseReport<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionReport<'a>>,
    pub events: &'a [SimEvent],
}

impl<'a> RunReport<'a> {
    pub fn new<const N: usize>(result: &'a RunResult<N>, sections: &'a [(String, f64)]) -> Self {
        let masses: Vec<f64> = sections.iter().map(|(_, m)| *m).collect();
        let energies = section_energies(result, &masses);

        RunReport {
            mission: &result.mission,
            summary: &result.summary,
            phases: result
                .phases
                .iter()
                .map(|p| PhaseReport {
                    name: &p.name,
                    samples: p.states.len(),
                    skipped: p.is_skipped(),
                    elapsed_s: p.elapsed,
                    final_altitude_ft: p.final_altitude,
                    final_velocity_fps: p.final_velocity,
                    mass_slug: p.mass,
                    kinetic_energy_ftlb: p.kinetic_energy,
                })
                .collect(),
            sections: sections
                .iter()
                .zip(energies)
                .map(|((name, mass), ke)| SectionReport {
                    name,
                    mass_slug: *mass,
                    kinetic_energy_ftlb: ke,
                })
                .collect(),
            events: &result.events,
        }
    }
}

/// Write a run summary as pretty-printed JSON.
pub fn write_summary<W: Write, const N: usize>(
    writer: &mut W,
    result: &RunResult<N>,
    sections: &[(String, f64)],
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &RunReport::new(result, sections))?;
    writeln!(writer)
}

/// Write a run summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>, const N: usize>(
    path: P,
    result: &RunResult<N>,
    sections: &[(String, f64)],
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, result, sections)
}
