//! Export helpers for CSV and JSON artifacts.

pub mod profile {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    /// Column order matches the simulator's profile layout.
    const HEADER: &str = "time_s,altitude_km,velocity_m_s,mass_kg,thrust_n,stage";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the standard flight-profile CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted by the flight-profile exporter.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub time_s: f64,
        pub altitude_km: f64,
        pub velocity_m_s: f64,
        pub mass_kg: f64,
        pub thrust_n: f64,
        pub stage: usize,
    }

    impl Record {
        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{:.6},{:.6},{:.6},{:.3},{:.3},{}",
                self.time_s,
                self.altitude_km,
                self.velocity_m_s,
                self.mass_kg,
                self.thrust_n,
                self.stage,
            )
        }
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Telemetry sample used in exported JSON sidecars.
    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct Sample {
        pub time_s: f64,
        pub altitude_km: f64,
        pub velocity_m_s: f64,
        pub mass_kg: f64,
        pub thrust_n: f64,
        pub stage: usize,
    }

    /// Per-stage configuration echoed into the sidecar.
    #[derive(Debug, Clone, Serialize)]
    pub struct StageRecord {
        pub stage_name: String,
        pub engine_name: String,
        pub engine_type: String,
        pub num_engines: u32,
        pub dry_mass_kg: f64,
        pub fuel_mass_kg: f64,
        pub burn_duration_s: f64,
    }

    /// Separation event recorded at the end of each stage burn.
    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct SeparationRecord {
        pub stage: usize,
        pub time_s: f64,
        pub altitude_km: f64,
        pub velocity_m_s: f64,
    }

    /// Envelope of flight telemetry for one simulated mission.
    #[derive(Debug, Serialize)]
    pub struct FlightSummary {
        pub flight_time_s: f64,
        pub stage_count: usize,
        pub max_altitude_km: f64,
        pub max_velocity_m_s: f64,
        pub final_altitude_km: f64,
        pub final_velocity_m_s: f64,
        pub final_mass_kg: f64,
        pub stages: Vec<StageRecord>,
        pub separations: Vec<SeparationRecord>,
        pub samples: Vec<Sample>,
    }

    /// Metadata describing the simulation run.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub mission: &'a str,
        pub generated_at: &'a str,
    }

    #[derive(Serialize)]
    struct FlightSidecar<'a> {
        mission: &'a str,
        generated_at: &'a str,
        flight_time_s: f64,
        stage_count: usize,
        max_altitude_km: f64,
        max_velocity_m_s: f64,
        final_altitude_km: f64,
        final_velocity_m_s: f64,
        final_mass_kg: f64,
        stages: &'a [StageRecord],
        separations: &'a [SeparationRecord],
        samples: &'a [Sample],
    }

    /// Write the JSON telemetry sidecar for a simulated flight.
    pub fn write_summary(
        output: &Path,
        meta: &Metadata<'_>,
        summary: &FlightSummary,
    ) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let sidecar = FlightSidecar {
            mission: meta.mission,
            generated_at: meta.generated_at,
            flight_time_s: summary.flight_time_s,
            stage_count: summary.stage_count,
            max_altitude_km: summary.max_altitude_km,
            max_velocity_m_s: summary.max_velocity_m_s,
            final_altitude_km: summary.final_altitude_km,
            final_velocity_m_s: summary.final_velocity_m_s,
            final_mass_kg: summary.final_mass_kg,
            stages: &summary.stages,
            separations: &summary.separations,
            samples: &summary.samples,
        };

        to_writer_pretty(File::create(output)?, &sidecar)?;
        Ok(())
    }
}
