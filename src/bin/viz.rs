use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use descent_sim::dynamics::{StateLayout, StateVector, Vertical, WindCoupled};
use descent_sim::physics::units::mph_to_fps;
use descent_sim::physics::Environment;
use descent_sim::sim::{simulate, RunResult};
use descent_sim::vehicle::{presets, ParachuteCatalog};

const WIND_MPH: f64 = 10.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ParachuteCatalog::standard(&Environment::default())?;
    let rocket = simulate(&presets::rocket(&catalog)?)?;
    let payload = simulate(&presets::payload(&catalog)?)?;
    let drifting = simulate(&presets::rocket_in_wind(&catalog, mph_to_fps(WIND_MPH))?)?;

    let app = DescentViz {
        vertical: vec![("Rocket", rocket), ("Payload", payload)],
        drifting,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Parachute Descent Simulator", options, Box::new(|_| Ok(Box::new(app))))?;
    Ok(())
}

struct DescentViz {
    vertical: Vec<(&'static str, RunResult<2>)>,
    drifting: RunResult<4>,
}

/// Thin a series to at most ~2000 points.
fn sampled<T>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().step_by((items.len() / 2000).max(1))
}

fn series<const N: usize>(
    result: &RunResult<N>,
    f: impl Fn(f64, &StateVector<N>) -> [f64; 2],
) -> PlotPoints<'static> {
    sampled(&result.global_times)
        .zip(sampled(&result.global_states))
        .map(|(t, s)| f(*t, s))
        .collect()
}

impl eframe::App for DescentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Recovery descent");
            let mut parts: Vec<String> = self
                .vertical
                .iter()
                .map(|(name, r)| {
                    format!(
                        "{}: {:.1} s, {:.1} ft/s, {:.1} ft·lb",
                        name,
                        r.total_time,
                        r.summary.impact_velocity.abs(),
                        r.summary.impact_kinetic_energy
                    )
                })
                .collect();
            parts.push(format!(
                "Wind {} mph drift: {:.0} ft",
                WIND_MPH, self.drifting.summary.drift
            ));
            ui.label(parts.join("  |  "));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Altitude vs Time
                ui.vertical(|ui| {
                    ui.label("Altitude (ft)");
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, r) in &self.vertical {
                                plot_ui.line(Line::new(*name, series(r, |t, s| [t, Vertical::altitude(s)])));
                            }
                        });
                });

                // Fall velocity vs Time
                ui.vertical(|ui| {
                    ui.label("Fall velocity (ft/s)");
                    Plot::new("velocity")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (name, r) in &self.vertical {
                                plot_ui.line(Line::new(*name, series(r, |t, s| [t, Vertical::vertical_velocity(s).abs()])));
                            }
                        });
                });
            });

            // Altitude vs Drift
            ui.vertical(|ui| {
                ui.label(format!("Descent profile in {} mph wind (ft)", WIND_MPH));
                let points = series(&self.drifting, |_, s| {
                    [WindCoupled::drift(s).unwrap_or(0.0), WindCoupled::altitude(s)]
                });
                Plot::new("profile")
                    .width(available.x - 8.0)
                    .height(half_h)
                    .x_axis_label("Drift (ft)")
                    .data_aspect(1.0)
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("Rocket", points));
                    });
            });
        });
    }
}
