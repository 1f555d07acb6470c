//! Touchdown energy of each separately-landing rocket section, against the energy limit.

use descent_sim::physics::Environment;
use descent_sim::sim::{check_sections, section_energies, simulate, velocity_for_energy};
use descent_sim::vehicle::{presets, ParachuteCatalog};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ParachuteCatalog::standard(&Environment::default())?;
    let mission = presets::rocket(&catalog)?;
    let result = simulate(&mission)?;

    let sections = presets::rocket_sections();
    let masses: Vec<f64> = sections.iter().map(|(_, m)| *m).collect();
    let energies = section_energies(&result, &masses);
    let limit = mission.limits().max_kinetic_energy;

    println!(
        "{} lands at {:.2} ft/s after {:.1} s",
        mission.name(),
        result.summary.impact_velocity.abs(),
        result.total_time
    );
    println!();
    println!("  {:<8} {:>10} {:>12} {:>14}", "Section", "Mass (sl)", "KE (ft lbs)", "V limit (ft/s)");
    for ((name, mass), row) in sections.iter().zip(&energies) {
        let touchdown = row.last().copied().unwrap_or(0.0);
        println!(
            "  {:<8} {:>10.3} {:>12.2} {:>14.2}",
            name,
            mass,
            touchdown,
            velocity_for_energy(limit, *mass)
        );
    }

    let flagged = check_sections(&result, &masses, mission.limits());
    println!();
    if flagged.is_empty() {
        println!("All sections land under {:.0} ft lbs", limit);
    }
    for event in flagged {
        println!("  {:?}", event.kind);
    }
    Ok(())
}
