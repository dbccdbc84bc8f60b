use stellarlab::constants::{EARTH_RADIUS_M, G0, SEA_LEVEL_DENSITY_KG_M3};
use stellarlab::engines::Engine;
use stellarlab::flight::atmosphere;
use stellarlab::flight::{GravityModel, Simulator, Stage, state_derivative};
use stellarlab::solver::SolverOptions;

const THRUST_N: f64 = 200_000.0;
const ISP_S: f64 = 250.0;
const BURN_S: f64 = 60.0;
const DRY_KG: f64 = 1_000.0;
const FUEL_KG: f64 = 9_000.0;

fn solid_stage() -> Stage {
    let engine = Engine::solid("SRB", THRUST_N, ISP_S, BURN_S, 0.0).expect("solid");
    Stage::new("Booster", DRY_KG, FUEL_KG, 1, engine).expect("stage")
}

#[test]
fn exponential_atmosphere_matches_scale_height() {
    assert!((atmosphere::density(0.0) - SEA_LEVEL_DENSITY_KG_M3).abs() < 1e-12);
    let one_scale = atmosphere::density(8_500.0);
    assert!(
        (one_scale - SEA_LEVEL_DENSITY_KG_M3 / std::f64::consts::E).abs() < 1e-9,
        "density = {}",
        one_scale
    );
    // Ten scale heights thins the air by e^-10.
    let ratio = atmosphere::density(85_000.0) / SEA_LEVEL_DENSITY_KG_M3;
    assert!((ratio - (-10.0f64).exp()).abs() < 1e-12);
    assert!(atmosphere::density(100_000.0) < atmosphere::density(50_000.0));
}

#[test]
fn gravity_decays_with_inverse_square_altitude() {
    let earth = GravityModel::default();
    assert!((earth.acceleration_at(0.0) - G0).abs() < 1e-12);
    // One Earth radius up leaves a quarter of surface gravity.
    let high = earth.acceleration_at(EARTH_RADIUS_M);
    assert!((high - G0 / 4.0).abs() < 1e-12, "g = {}", high);
    assert!(earth.acceleration_at(100_000.0) < G0);

    let none = GravityModel::zero();
    assert!(none.acceleration_at(0.0) == 0.0);
    assert!(none.acceleration_at(1.0e6) == 0.0);
}

#[test]
fn ascent_derivative_balances_thrust_and_gravity() {
    let stage = solid_stage();
    let earth = GravityModel::default();
    let state = [0.0, 0.0];
    let deriv = state_derivative(0.0, &state, &stage, DRY_KG + FUEL_KG, &earth);
    let expected_accel = THRUST_N / (DRY_KG + FUEL_KG) - G0;
    assert!(
        (deriv[0] - expected_accel).abs() < 1e-9,
        "accel = {}",
        deriv[0]
    );
    assert!(deriv[1] == 0.0);

    // Altitude rate is just the velocity slot.
    let moving = [350.0, 12_000.0];
    let deriv = state_derivative(10.0, &moving, &stage, DRY_KG + FUEL_KG, &earth);
    assert!(deriv[1] == 350.0);
}

#[test]
fn drained_stage_goes_ballistic() {
    let stage = solid_stage();
    let earth = GravityModel::default();
    // Past fuel exhaustion the clamp zeroes acceleration and keeps climbing.
    let state = [500.0, 20_000.0];
    let deriv = state_derivative(150.0, &state, &stage, DRY_KG + FUEL_KG, &earth);
    assert!(deriv[0] == 0.0);
    assert!(deriv[1] == 500.0);
}

#[test]
fn zero_gravity_burn_matches_rocket_equation() {
    let mut simulator = Simulator::with_environment(
        vec![solid_stage()],
        GravityModel::zero(),
        SolverOptions::default(),
    )
    .expect("simulator");
    let profile = simulator.run().expect("run");

    let flow = THRUST_N / (ISP_S * G0);
    let m0 = DRY_KG + FUEL_KG;
    // Thrust cuts off at the rated window even though the stage keeps
    // draining afterwards, so the ideal delta-v integral stops at 60 s.
    let expected = ISP_S * G0 * (m0 / (m0 - flow * BURN_S)).ln();

    let last = profile.last().expect("samples");
    assert!(
        (last.velocity_m_s - expected).abs() < 0.005 * expected,
        "v_final = {}, expected = {}",
        last.velocity_m_s,
        expected
    );

    // Without gravity the velocity never decreases.
    for k in 1..profile.len() {
        assert!(
            profile.velocities_m_s[k] + 1e-6 >= profile.velocities_m_s[k - 1],
            "velocity dipped at sample {k}"
        );
    }
}
