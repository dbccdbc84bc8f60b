use clap::Parser;
use csv::ReaderBuilder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

use stellarlab::units::n_to_kn;

/// Render altitude, velocity, mass, and thrust panels from a trajectory CSV.
#[derive(Parser, Debug)]
#[command(author, version, about = "Flight profile plotter (2x2 ascent panels)")]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/flight.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 900)]
    height: u32,
}

#[derive(Debug, Default)]
struct Trajectory {
    times_s: Vec<f64>,
    altitudes_km: Vec<f64>,
    velocities_m_s: Vec<f64>,
    masses_kg: Vec<f64>,
    thrusts_n: Vec<f64>,
    stages: Vec<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let trajectory = read_trajectory(&cli.input)?;
    if trajectory.times_s.is_empty() {
        return Err(anyhow::anyhow!("No samples in the provided CSV"));
    }

    // Stage column transitions mark separations; the boundary sample is the
    // last one flown by the lower stage.
    let mut separations = Vec::new();
    for k in 1..trajectory.stages.len() {
        if trajectory.stages[k] != trajectory.stages[k - 1] {
            separations.push(trajectory.times_s[k - 1]);
        }
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 20.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 14.0, FontStyle::Normal);

    let thrusts_kn: Vec<f64> = trajectory.thrusts_n.iter().map(|&v| n_to_kn(v)).collect();

    let panels = root.split_evenly((2, 2));
    draw_panel(
        &panels[0],
        "Altitude",
        "Altitude (km)",
        &trajectory.times_s,
        &trajectory.altitudes_km,
        BLUE,
        &separations,
        &caption_font,
        &label_font,
    )?;
    draw_panel(
        &panels[1],
        "Velocity",
        "Velocity (m/s)",
        &trajectory.times_s,
        &trajectory.velocities_m_s,
        RED,
        &separations,
        &caption_font,
        &label_font,
    )?;
    draw_panel(
        &panels[2],
        "Mass",
        "Mass (kg)",
        &trajectory.times_s,
        &trajectory.masses_kg,
        GREEN,
        &separations,
        &caption_font,
        &label_font,
    )?;
    draw_panel(
        &panels[3],
        "Thrust",
        "Thrust (kN)",
        &trajectory.times_s,
        &thrusts_kn,
        MAGENTA,
        &separations,
        &caption_font,
        &label_font,
    )?;

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_trajectory(path: &str) -> anyhow::Result<Trajectory> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> anyhow::Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow::anyhow!("CSV missing '{}' column", name))
    };
    let time_idx = column("time_s")?;
    let altitude_idx = column("altitude_km")?;
    let velocity_idx = column("velocity_m_s")?;
    let mass_idx = column("mass_kg")?;
    let thrust_idx = column("thrust_n")?;
    let stage_idx = column("stage")?;

    let mut trajectory = Trajectory::default();
    for rec in rdr.records() {
        let r = rec?;
        let field = |idx: usize| -> f64 { r.get(idx).unwrap_or("").parse().unwrap_or(f64::NAN) };
        let time_s = field(time_idx);
        if !time_s.is_finite() {
            continue;
        }
        trajectory.times_s.push(time_s);
        trajectory.altitudes_km.push(field(altitude_idx));
        trajectory.velocities_m_s.push(field(velocity_idx));
        trajectory.masses_kg.push(field(mass_idx));
        trajectory.thrusts_n.push(field(thrust_idx));
        trajectory
            .stages
            .push(r.get(stage_idx).unwrap_or("").parse().unwrap_or(0));
    }
    Ok(trajectory)
}

#[allow(clippy::too_many_arguments)]
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    times: &[f64],
    values: &[f64],
    color: RGBColor,
    separations: &[f64],
    caption_font: &FontDesc<'static>,
    label_font: &FontDesc<'static>,
) -> anyhow::Result<()> {
    let t_max = times.last().copied().unwrap_or(1.0).max(1.0);
    let (y_lo, y_hi) = value_bounds(values);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(caption, caption_font.clone())
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..t_max, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(y_desc)
        .label_style(label_font.clone())
        .x_labels(6)
        .y_labels(6)
        .draw()?;

    chart.draw_series(LineSeries::new(
        times.iter().zip(values).map(|(&t, &v)| (t, v)),
        ShapeStyle::from(&color).stroke_width(2),
    ))?;

    for &t_sep in separations {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(t_sep, y_lo), (t_sep, y_hi)],
            ShapeStyle::from(&BLACK.mix(0.5)).stroke_width(1),
        )))?;
    }

    Ok(())
}

fn value_bounds(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}
