use chrono::Utc;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use stellarlab::config;
use stellarlab::export::{profile as export_profile, summary as export_summary};
use stellarlab::flight::{GravityModel, Simulator, build_stages};
use stellarlab::solver::{SolverOptions, Tolerances};

/// Simulate the powered ascent of a multi-stage rocket from a mission manifest.
#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-stage powered-ascent simulator")]
struct Cli {
    /// Mission manifest (YAML, TOML, or JSON)
    #[arg(long, default_value = "data/missions/two_stage_demo.yaml")]
    mission: PathBuf,

    /// Output trajectory CSV (use '-' for stdout)
    #[arg(long, default_value = "artifacts/flight.csv")]
    output: PathBuf,

    /// Optional JSON telemetry sidecar
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Largest integrator step in seconds
    #[arg(long, default_value_t = 1.0)]
    max_step: f64,

    /// Absolute integration tolerance
    #[arg(long, default_value_t = 1e-6)]
    atol: f64,

    /// Relative integration tolerance
    #[arg(long, default_value_t = 1e-3)]
    rtol: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mission = config::load_mission(&cli.mission)?;
    let engines = config::load_mission_engines(&mission)?;
    let stages = build_stages(&mission, &engines)?;

    println!("=== Mission: {} ===", mission.name);
    for (index, (stage, engine)) in stages.iter().zip(&engines).enumerate() {
        println!(
            "Stage {}: {} with {} x {} ({}), dry {:.1} kg, fuel {:.1} kg, burn {:.1} s",
            index + 1,
            stage.name,
            stage.num_engines,
            engine.name(),
            engine.type_name(),
            stage.dry_mass_kg,
            stage.fuel_mass_kg,
            stage.burn_duration_s(),
        );
    }

    let stage_records: Vec<export_summary::StageRecord> = stages
        .iter()
        .zip(&engines)
        .map(|(stage, engine)| export_summary::StageRecord {
            stage_name: stage.name.clone(),
            engine_name: engine.name().to_string(),
            engine_type: engine.type_name().to_string(),
            num_engines: stage.num_engines,
            dry_mass_kg: stage.dry_mass_kg,
            fuel_mass_kg: stage.fuel_mass_kg,
            burn_duration_s: stage.burn_duration_s(),
        })
        .collect();

    let options = SolverOptions {
        max_step: cli.max_step,
        tolerances: Tolerances::new(cli.atol, cli.rtol),
        ..SolverOptions::default()
    };
    let mut simulator = Simulator::with_environment(stages, GravityModel::default(), options)?;
    let launch_mass = simulator.total_initial_mass_kg();
    println!("Launch mass: {:.1} kg", launch_mass);

    let profile = simulator.run()?;
    let last = profile
        .last()
        .ok_or_else(|| anyhow::anyhow!("simulation produced no samples"))?;
    let max_altitude_km = profile.max_altitude_km().unwrap_or(last.altitude_km);
    let max_velocity_m_s = profile.max_velocity_m_s().unwrap_or(last.velocity_m_s);

    for separation in &profile.separations {
        println!(
            "Stage {} separation at t = {:.2} s: altitude {:.2} km, velocity {:.1} m/s",
            separation.stage, separation.time_s, separation.altitude_km, separation.velocity_m_s
        );
    }

    println!("=== Flight Summary ===");
    println!("Mission time: {:.2} s", last.time_s);
    println!("Max altitude: {:.2} km", max_altitude_km);
    println!("Max velocity: {:.1} m/s", max_velocity_m_s);
    println!(
        "Final state: altitude {:.2} km, velocity {:.1} m/s, mass {:.1} kg",
        last.altitude_km, last.velocity_m_s, last.mass_kg
    );

    let mut writer = export_profile::writer_for_path(&cli.output)?;
    export_profile::write_header(writer.as_mut())?;
    for sample in profile.samples() {
        let record = export_profile::Record {
            time_s: sample.time_s,
            altitude_km: sample.altitude_km,
            velocity_m_s: sample.velocity_m_s,
            mass_kg: sample.mass_kg,
            thrust_n: sample.thrust_n,
            stage: sample.stage,
        };
        record.write_to(writer.as_mut())?;
    }
    writer.flush()?;

    if let Some(summary_path) = &cli.summary {
        let samples: Vec<export_summary::Sample> = profile
            .samples()
            .map(|s| export_summary::Sample {
                time_s: s.time_s,
                altitude_km: s.altitude_km,
                velocity_m_s: s.velocity_m_s,
                mass_kg: s.mass_kg,
                thrust_n: s.thrust_n,
                stage: s.stage,
            })
            .collect();
        let separations: Vec<export_summary::SeparationRecord> = profile
            .separations
            .iter()
            .map(|s| export_summary::SeparationRecord {
                stage: s.stage,
                time_s: s.time_s,
                altitude_km: s.altitude_km,
                velocity_m_s: s.velocity_m_s,
            })
            .collect();
        let summary = export_summary::FlightSummary {
            flight_time_s: last.time_s,
            stage_count: stage_records.len(),
            max_altitude_km,
            max_velocity_m_s,
            final_altitude_km: last.altitude_km,
            final_velocity_m_s: last.velocity_m_s,
            final_mass_kg: last.mass_kg,
            stages: stage_records,
            separations,
            samples,
        };
        let generated_at = Utc::now().to_rfc3339();
        let meta = export_summary::Metadata {
            mission: &mission.name,
            generated_at: &generated_at,
        };
        export_summary::write_summary(summary_path, &meta, &summary)?;
    }

    Ok(())
}
