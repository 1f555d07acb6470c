use std::io::{self, Write};
use std::path::Path;

use crate::sim::RunResult;

/// Write a run's global trajectory as CSV.
///
/// Columns: time, one per state component (named by `columns`), phase.
/// The initial state at t = 0 is tagged with phase 0.
pub fn write_trajectory<W: Write, const N: usize>(
    writer: &mut W,
    columns: &[&str; N],
    result: &RunResult<N>,
) -> io::Result<()> {
    writeln!(writer, "time,{},phase", columns.join(","))?;

    let phases = result.sample_phases();
    for ((t, s), phase) in result.global_times.iter().zip(&result.global_states).zip(phases) {
        write!(writer, "{:.4}", t)?;
        for v in s.iter() {
            write!(writer, ",{:.4}", v)?;
        }
        writeln!(writer, ",{}", phase)?;
    }

    Ok(())
}

/// Write a run's trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>, const N: usize>(
    path: P,
    columns: &[&str; N],
    result: &RunResult<N>,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, columns, result)?;
    file.flush()
}
