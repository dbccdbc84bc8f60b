use stellarlab::constants::G0;
use stellarlab::engines::Engine;
use stellarlab::flight::{Simulator, Stage};

const THRUST_N: f64 = 200_000.0;
const ISP_S: f64 = 250.0;
const BURN_S: f64 = 60.0;
const DRY_KG: f64 = 1_000.0;
const FUEL_KG: f64 = 9_000.0;

fn booster() -> Stage {
    let engine = Engine::solid("SRB-200", THRUST_N, ISP_S, BURN_S, 0.0).expect("solid");
    Stage::new("Booster", DRY_KG, FUEL_KG, 1, engine).expect("stage")
}

#[test]
fn burn_duration_outlasts_rated_window() {
    let stage = booster();
    // Fuel divided by constant flow; the rated window closes at 60 s but the
    // casing keeps draining until ~110.3 s.
    let expected = FUEL_KG * ISP_S * G0 / THRUST_N;
    assert!(
        (stage.burn_duration_s() - expected).abs() < 1e-9,
        "duration = {}",
        stage.burn_duration_s()
    );
    assert!(stage.burn_duration_s() > BURN_S);
}

#[test]
fn trajectory_is_monotone_and_exhausts_fuel() {
    let mut simulator = Simulator::new(vec![booster()]).expect("simulator");
    assert!((simulator.total_initial_mass_kg() - (DRY_KG + FUEL_KG)).abs() < 1e-12);

    let profile = simulator.run().expect("run");
    assert!(profile.len() >= 2);
    assert!(profile.times_s[0] == 0.0);

    for k in 1..profile.len() {
        assert!(
            profile.times_s[k] > profile.times_s[k - 1],
            "time stalls at sample {k}"
        );
        assert!(
            profile.altitudes_km[k] > profile.altitudes_km[k - 1],
            "altitude dips at sample {k}"
        );
    }

    // Mass bookkeeping is the closed-form drain at every sample.
    let flow = THRUST_N / (ISP_S * G0);
    for k in 0..profile.len() {
        let expected = DRY_KG + FUEL_KG - flow * profile.times_s[k];
        assert!(
            (profile.masses_kg[k] - expected).abs() < 1e-6,
            "mass at sample {k} = {}",
            profile.masses_kg[k]
        );
    }

    let last = profile.last().expect("samples");
    let burn_duration = FUEL_KG * ISP_S * G0 / THRUST_N;
    assert!((last.time_s - burn_duration).abs() < 1e-9);
    assert!((last.mass_kg - DRY_KG).abs() < 1e-6, "final mass = {}", last.mass_kg);
}

#[test]
fn thrust_cuts_at_rated_window() {
    let mut simulator = Simulator::new(vec![booster()]).expect("simulator");
    let profile = simulator.run().expect("run");

    let mut saw_burn = false;
    let mut saw_coast = false;
    for sample in profile.samples() {
        if sample.time_s <= BURN_S {
            assert!(
                (sample.thrust_n - THRUST_N).abs() < 1e-9,
                "thrust during burn at t = {} was {}",
                sample.time_s,
                sample.thrust_n
            );
            saw_burn = true;
        } else {
            assert!(
                sample.thrust_n == 0.0,
                "thrust during coast at t = {} was {}",
                sample.time_s,
                sample.thrust_n
            );
            saw_coast = true;
        }
    }
    assert!(saw_burn && saw_coast, "profile should span burn and coast");
}

#[test]
fn coast_slows_but_keeps_climbing() {
    let mut simulator = Simulator::new(vec![booster()]).expect("simulator");
    let profile = simulator.run().expect("run");
    let last = profile.last().expect("samples");

    let max_velocity = profile.max_velocity_m_s().expect("samples");
    let max_altitude = profile.max_altitude_km().expect("samples");

    // Loose physical windows for this rocket: ~1.06 km/s at cutoff,
    // ~0.57 km/s and ~67 km at fuel exhaustion.
    assert!(
        (950.0..=1200.0).contains(&max_velocity),
        "max velocity = {max_velocity}"
    );
    assert!(
        (400.0..=750.0).contains(&last.velocity_m_s),
        "final velocity = {}",
        last.velocity_m_s
    );
    assert!(
        (45.0..=90.0).contains(&last.altitude_km),
        "final altitude = {}",
        last.altitude_km
    );
    // Still ascending at the end, so apogee is past the recorded span.
    assert!(max_velocity > last.velocity_m_s);
    assert!((max_altitude - last.altitude_km).abs() < 1e-12);
}

#[test]
fn separation_logged_at_burnout() {
    let mut simulator = Simulator::new(vec![booster()]).expect("simulator");
    let profile = simulator.run().expect("run");
    let last = profile.last().expect("samples");

    assert!(profile.separations.len() == 1);
    let separation = profile.separations[0];
    assert!(separation.stage == 1);
    assert!((separation.time_s - last.time_s).abs() < 1e-12);
    assert!((separation.velocity_m_s - last.velocity_m_s).abs() < 1e-12);
    assert!((separation.altitude_km - last.altitude_km).abs() < 1e-12);
}
