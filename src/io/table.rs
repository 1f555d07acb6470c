use std::io::{self, Write};

use crate::physics::units::mph_to_fps;
use crate::sim::{estimated_drift, section_energies, RunResult};

/// Wind speeds the drift table is tabulated for, mph.
pub const DRIFT_WIND_SPEEDS_MPH: [f64; 5] = [0.0, 5.0, 10.0, 15.0, 20.0];

const WIDTH: usize = 10;

/// One table row's worth of figures from a run, independent of state layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DescentRow {
    pub title: String,
    pub total_time: f64,
    pub phase_elapsed: Vec<f64>,
    pub phase_velocity: Vec<f64>,
}

impl DescentRow {
    pub fn from_result<const N: usize>(title: impl Into<String>, result: &RunResult<N>) -> Self {
        Self {
            title: title.into(),
            total_time: result.total_time,
            phase_elapsed: result.per_phase_elapsed(),
            phase_velocity: result.phases.iter().map(|p| p.final_velocity.abs()).collect(),
        }
    }
}

fn write_row<W, I>(w: &mut W, label: &str, cells: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    write!(w, "{:>width$}", label, width = WIDTH)?;
    for cell in cells {
        write!(w, "{:>width$}", cell, width = WIDTH)?;
    }
    writeln!(w)
}

fn phase_headers(n: usize) -> impl Iterator<Item = String> {
    (1..=n).map(|i| format!("Phase {}", i))
}

fn max_phases(rows: &[DescentRow]) -> usize {
    rows.iter().map(|r| r.phase_elapsed.len()).max().unwrap_or(0)
}

fn fixed(values: &[f64]) -> impl Iterator<Item = String> + '_ {
    values.iter().map(|v| format!("{:.2}", v))
}

/// Drift (ft) at each of [`DRIFT_WIND_SPEEDS_MPH`], from total descent time.
pub fn write_drift_table<W: Write>(w: &mut W, rows: &[DescentRow]) -> io::Result<()> {
    writeln!(w, "Drift Due to Wind (ft)")?;
    write_row(w, "", DRIFT_WIND_SPEEDS_MPH.iter().map(|s| format!("{}", s)))?;
    for row in rows {
        let drift = DRIFT_WIND_SPEEDS_MPH
            .iter()
            .map(|&mph| estimated_drift(mph_to_fps(mph), row.total_time));
        write_row(w, &row.title, drift.map(|d| format!("{:.2}", d)))?;
    }
    Ok(())
}

/// Final descent speed of each phase, ft/s.
pub fn write_velocity_table<W: Write>(w: &mut W, rows: &[DescentRow]) -> io::Result<()> {
    writeln!(w, "Max Descent Velocity (ft/s)")?;
    write_row(w, "", phase_headers(max_phases(rows)))?;
    for row in rows {
        write_row(w, &row.title, fixed(&row.phase_velocity))?;
    }
    Ok(())
}

/// Total descent time followed by each phase's duration, s.
pub fn write_time_table<W: Write>(w: &mut W, rows: &[DescentRow]) -> io::Result<()> {
    writeln!(w, "Time for Descent (s)")?;
    write_row(
        w,
        "",
        std::iter::once("Total".to_string()).chain(phase_headers(max_phases(rows))),
    )?;
    for row in rows {
        let cells = std::iter::once(format!("{:.2}", row.total_time)).chain(fixed(&row.phase_elapsed));
        write_row(w, &row.title, cells)?;
    }
    Ok(())
}

/// Kinetic energy at the end of each phase, ft·lb: one row per section, or a single
/// whole-body row titled `title` when `sections` is empty.
pub fn write_energy_table<W: Write, const N: usize>(
    w: &mut W,
    title: &str,
    result: &RunResult<N>,
    sections: &[(String, f64)],
) -> io::Result<()> {
    writeln!(w, "Kinetic Energy (ft lbs)")?;
    write_row(w, "", phase_headers(result.phases.len()))?;
    if sections.is_empty() {
        return write_row(w, title, fixed(&result.per_phase_kinetic_energy()));
    }
    let masses: Vec<f64> = sections.iter().map(|(_, m)| *m).collect();
    for ((name, _), energies) in sections.iter().zip(section_energies(result, &masses)) {
        write_row(w, name, fixed(&energies))?;
    }
    Ok(())
}
