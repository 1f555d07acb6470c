use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use descent_sim::config::{load_scenario, LoadedMission, Scenario};
use descent_sim::dynamics::StateLayout;
use descent_sim::io::{csv, json, table};
use descent_sim::physics::units::mph_to_fps;
use descent_sim::physics::Environment;
use descent_sim::sim::{check_sections, simulate, velocity_for_energy, EventKind, RunResult};
use descent_sim::vehicle::{presets, Mission, ParachuteCatalog};

#[derive(Parser)]
#[command(name = "descent-sim")]
#[command(version)]
#[command(about = "Multi-phase parachute descent simulator", long_about = None)]
struct Cli {
    /// YAML scenario files (the rocket and payload presets run when none are given)
    scenarios: Vec<PathBuf>,

    /// Directory for per-mission trajectory CSV files
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Directory for per-mission JSON summaries
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also run the rocket preset in a log-profile wind of this speed (mph)
    #[arg(long)]
    wind_mph: Option<f64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let scenarios = if cli.scenarios.is_empty() {
        preset_scenarios(cli.wind_mph)?
    } else {
        cli.scenarios
            .iter()
            .map(load_scenario)
            .collect::<Result<Vec<_>, _>>()?
    };

    for dir in [&cli.csv, &cli.json].into_iter().flatten() {
        std::fs::create_dir_all(dir)?;
    }

    println!();
    println!("====================================================================");
    println!("  PARACHUTE DESCENT SIMULATION");
    println!("====================================================================");

    let mut rows = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        let row = match &scenario.mission {
            LoadedMission::Vertical(m) => run_mission(m, &scenario.sections, &cli)?,
            LoadedMission::WindCoupled(m) => run_mission(m, &scenario.sections, &cli)?,
        };
        rows.push(row);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out)?;
    table::write_drift_table(&mut out, &rows)?;
    writeln!(out)?;
    table::write_velocity_table(&mut out, &rows)?;
    writeln!(out)?;
    table::write_time_table(&mut out, &rows)?;
    writeln!(out, "====================================================================")?;
    writeln!(out)?;

    Ok(())
}

fn preset_scenarios(wind_mph: Option<f64>) -> Result<Vec<Scenario>, Box<dyn Error>> {
    let catalog = ParachuteCatalog::standard(&Environment::default())?;
    let mut scenarios = vec![
        Scenario {
            mission: LoadedMission::Vertical(presets::rocket(&catalog)?),
            sections: presets::rocket_sections(),
        },
        Scenario {
            mission: LoadedMission::Vertical(presets::payload(&catalog)?),
            sections: presets::payload_sections(),
        },
    ];
    if let Some(mph) = wind_mph {
        scenarios.push(Scenario {
            mission: LoadedMission::WindCoupled(presets::rocket_in_wind(&catalog, mph_to_fps(mph))?),
            sections: presets::rocket_sections(),
        });
    }
    Ok(scenarios)
}

fn run_mission<L: StateLayout<N>, const N: usize>(
    mission: &Mission<L, N>,
    sections: &[(String, f64)],
    cli: &Cli,
) -> Result<table::DescentRow, Box<dyn Error>> {
    let result = simulate(mission)?;
    let limits = mission.limits();

    println!();
    println!("  {} ({} model)", mission.name(), L::NAME);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Time of descent:            {:>8.2} s", result.total_time);
    println!("  Velocity of final descent:  {:>8.2} ft/s", result.summary.impact_velocity.abs());
    println!(
        "  Kinetic energy on touchdown:{:>8.2} ft lbs",
        result.summary.impact_kinetic_energy
    );
    println!("  Drift ({:?}):{:>17.2} ft", result.summary.drift_source, result.summary.drift);
    for (name, mass) in sections {
        println!(
            "  Velocity limit for {:<8} {:>8.2} ft/s",
            name,
            velocity_for_energy(limits.max_kinetic_energy, *mass)
        );
    }

    let mut events = result.events.clone();
    let masses: Vec<f64> = sections.iter().map(|(_, m)| *m).collect();
    events.extend(check_sections(&result, &masses, limits));
    for event in &events {
        match &event.kind {
            EventKind::PhaseSkipped { phase } => println!(
                "  SKIPPED   phase {} ('{}') never ran",
                phase + 1,
                result.phases[*phase].name
            ),
            EventKind::TimeLimitExceeded { altitude } => println!(
                "  *** Altitude where max time is exceeded: {:.2} ft (t={:.2} s) ***",
                altitude, event.time
            ),
            EventKind::KineticEnergyExceeded { section, excess, .. } => {
                let label = section
                    .and_then(|s| sections.get(s))
                    .map_or("Kinetic energy", |(name, _)| name.as_str());
                println!("  *** {} exceeded by: {:.2} ft lbs ***", label, excess);
            }
            EventKind::PhaseComplete { .. } | EventKind::Landing => {}
        }
    }

    println!();
    table::write_energy_table(&mut io::stdout().lock(), mission.name(), &result, sections)?;

    export(mission.name(), &L::column_names(), &result, sections, cli)?;
    Ok(table::DescentRow::from_result(mission.name(), &result))
}

fn export<const N: usize>(
    name: &str,
    columns: &[&str; N],
    result: &RunResult<N>,
    sections: &[(String, f64)],
    cli: &Cli,
) -> io::Result<()> {
    let stem = file_stem(name);
    if let Some(dir) = &cli.csv {
        let path = dir.join(format!("{}.csv", stem));
        csv::write_trajectory_file(&path, columns, result)?;
        println!("  Trajectory written to {}", path.display());
    }
    if let Some(dir) = &cli.json {
        let path = dir.join(format!("{}.json", stem));
        json::write_summary_file(&path, result, sections)?;
        println!("  Summary written to {}", path.display());
    }
    Ok(())
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() {
        "mission".into()
    } else {
        stem
    }
}
