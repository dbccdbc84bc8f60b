//! Vertical-ascent equations of motion.
//!
//! State is `[velocity_m_s, altitude_m]`. Mass is not integrated: each
//! engine model drains propellant at a constant rate, so the stack mass at
//! stage-local time `t` is just `initial_mass - flow * t`.

use stellar_solver::OdeSystem;

use crate::stage::Stage;

/// Inverse-square point gravity for a spherical body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    pub surface_gravity_m_s2: f64,
    pub planet_radius_m: f64,
}

impl GravityModel {
    pub const EARTH: Self = Self {
        surface_gravity_m_s2: stellar_core::constants::G0,
        planet_radius_m: stellar_core::constants::EARTH_RADIUS_M,
    };

    /// A model with no gravity at all, for exercising thrust terms alone.
    pub fn zero() -> Self {
        Self {
            surface_gravity_m_s2: 0.0,
            planet_radius_m: stellar_core::constants::EARTH_RADIUS_M,
        }
    }

    /// Gravitational acceleration (m/s^2) at `altitude_m` above the surface.
    pub fn acceleration_at(&self, altitude_m: f64) -> f64 {
        let ratio = self.planet_radius_m / (self.planet_radius_m + altitude_m);
        self.surface_gravity_m_s2 * ratio * ratio
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::EARTH
    }
}

/// `[velocity_m_s, altitude_m]`
pub type AscentState = [f64; 2];

/// Time derivative of the ascent state under one burning stage.
///
/// Once the drained mass reaches the stage dry mass the vehicle is ballistic
/// with thrust and gravity both dropped, which clamps the burnout boundary
/// rather than letting the constant-flow mass go below the structure.
pub fn state_derivative(
    time_s: f64,
    state: &AscentState,
    stage: &Stage,
    initial_stage_mass_kg: f64,
    gravity: &GravityModel,
) -> AscentState {
    let [velocity, altitude] = *state;
    let current_mass = initial_stage_mass_kg - stage.mass_flow_kg_s() * time_s;
    if current_mass <= stage.dry_mass_kg {
        // burnout
        return [0.0, velocity];
    }
    let thrust = stage.thrust_at(time_s);
    let g = gravity.acceleration_at(altitude);
    // Drag slot kept at zero until an aero model lands; the density profile
    // in `atmosphere` is what it would consume.
    let drag = 0.0;
    [thrust / current_mass - g - drag, velocity]
}

/// One stage's burn wired up as an ODE system.
///
/// Holds the stage mutably so throttle ramps advance with accepted solver
/// steps, and records the cluster thrust at every knot so the sampled
/// trajectory reflects the throttle actually flown.
pub struct StageAscent<'a> {
    stage: &'a mut Stage,
    initial_mass_kg: f64,
    gravity: GravityModel,
    thrust_trace: Vec<f64>,
}

impl<'a> StageAscent<'a> {
    pub fn new(stage: &'a mut Stage, initial_mass_kg: f64, gravity: GravityModel) -> Self {
        let ignition_thrust = stage.thrust_at(0.0);
        Self {
            stage,
            initial_mass_kg,
            gravity,
            thrust_trace: vec![ignition_thrust],
        }
    }

    /// Cluster thrust at each accepted knot, ignition included.
    pub fn thrust_trace(&self) -> &[f64] {
        &self.thrust_trace
    }

    pub fn initial_mass_kg(&self) -> f64 {
        self.initial_mass_kg
    }
}

impl OdeSystem<2> for StageAscent<'_> {
    fn rhs(&self, time_s: f64, state: &[f64; 2]) -> [f64; 2] {
        state_derivative(time_s, state, self.stage, self.initial_mass_kg, &self.gravity)
    }

    fn after_step(&mut self, time_s: f64, dt_s: f64) {
        self.stage.advance_throttle(dt_s);
        self.thrust_trace.push(self.stage.thrust_at(time_s));
    }
}
