//! Integrated drift of the rocket body under a log-profile wind, compared with the
//! constant-wind estimate from the vertical model.

use descent_sim::physics::units::mph_to_fps;
use descent_sim::physics::Environment;
use descent_sim::sim::{estimated_drift, simulate};
use descent_sim::vehicle::{presets, ParachuteCatalog};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ParachuteCatalog::standard(&Environment::default())?;
    let vertical = simulate(&presets::rocket(&catalog)?)?;

    println!("  {:>9} {:>14} {:>14}", "Wind (mph)", "Estimated (ft)", "Integrated (ft)");
    for mph in [5.0, 10.0, 15.0, 20.0] {
        let wind = mph_to_fps(mph);
        let coupled = simulate(&presets::rocket_in_wind(&catalog, wind)?)?;
        println!(
            "  {:>9.0} {:>14.1} {:>14.1}",
            mph,
            estimated_drift(wind, vertical.total_time),
            coupled.summary.drift
        );
    }
    Ok(())
}
