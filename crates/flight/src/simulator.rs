//! Mission orchestration: fly each stage in turn and stitch the trajectory.

use thiserror::Error;

use stellar_config::{EngineConfig, MissionConfig};
use stellar_core::units::m_to_km;
use stellar_solver::{Dopri5, IntegrationError, SolverOptions};

use crate::dynamics::{AscentState, GravityModel, StageAscent};
use crate::profile::{FlightProfile, SeparationEvent, TrajectorySample};
use crate::stage::{Stage, StageError};

/// Errors raised while assembling or flying a mission.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("a mission needs at least one stage")]
    NoStages,
    #[error("mission already flown; build a new simulator to fly it again")]
    AlreadyFlown,
    #[error(
        "mission '{mission}' lists {stages} stages but {engines} engine definitions were supplied"
    )]
    EngineCountMismatch {
        mission: String,
        stages: usize,
        engines: usize,
    },
    #[error("stage {index} '{name}': {source}")]
    Stage {
        index: usize,
        name: String,
        source: StageError,
    },
    #[error("stage {index} '{name}': {source}")]
    Integration {
        index: usize,
        name: String,
        source: IntegrationError,
    },
}

/// Where a simulator is in its mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    /// Not yet flown.
    Idle,
    /// Burning the stage at this zero-based index.
    Burn(usize),
    /// Dropping the spent stage at this zero-based index.
    Separation(usize),
    /// All stages flown.
    Complete,
}

/// Flies a stack of stages sequentially and collects the trajectory.
pub struct Simulator {
    stages: Vec<Stage>,
    gravity: GravityModel,
    solver: Dopri5,
    phase: FlightPhase,
    total_initial_mass_kg: f64,
}

impl Simulator {
    /// Simulator over `stages` with Earth gravity and default solver settings.
    pub fn new(stages: Vec<Stage>) -> Result<Self, SimulationError> {
        Self::with_environment(stages, GravityModel::default(), SolverOptions::default())
    }

    /// Simulator with an explicit gravity model and solver configuration.
    pub fn with_environment(
        stages: Vec<Stage>,
        gravity: GravityModel,
        options: SolverOptions,
    ) -> Result<Self, SimulationError> {
        if stages.is_empty() {
            return Err(SimulationError::NoStages);
        }
        let total_initial_mass_kg = stages.iter().map(Stage::total_mass_kg).sum();
        Ok(Self {
            stages,
            gravity,
            solver: Dopri5::new(options),
            phase: FlightPhase::Idle,
            total_initial_mass_kg,
        })
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Launch mass of the full stack (kg).
    pub fn total_initial_mass_kg(&self) -> f64 {
        self.total_initial_mass_kg
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Fly the whole mission from rest at the surface.
    ///
    /// Each stage burns until its propellant is exhausted at the constant
    /// cluster flow rate; velocity and altitude carry across separations
    /// while the spent stage's mass drops away. Sample times are strictly
    /// increasing: the ignition knot of a follow-on stage coincides with
    /// the previous burnout and is not re-emitted.
    ///
    /// A simulator flies its mission once: stage state (hybrid throttle
    /// ramps, spent propellant) is consumed by the flight. Any later `run`
    /// call, including after a run that failed partway, returns
    /// [`SimulationError::AlreadyFlown`].
    pub fn run(&mut self) -> Result<FlightProfile, SimulationError> {
        if self.phase != FlightPhase::Idle {
            return Err(SimulationError::AlreadyFlown);
        }

        let gravity = self.gravity;
        let solver = self.solver;

        let mut profile = FlightProfile::default();
        let mut state: AscentState = [0.0, 0.0];
        let mut time_offset = 0.0;
        let mut running_mass_kg = self.total_initial_mass_kg;

        loop {
            match self.phase {
                FlightPhase::Idle => self.phase = FlightPhase::Burn(0),
                FlightPhase::Burn(index) => {
                    let stage = &mut self.stages[index];
                    let stage_name = stage.name.clone();
                    let mass_flow = stage.mass_flow_kg_s();
                    let burn_duration = stage.burn_duration_s();

                    let mut ascent = StageAscent::new(stage, running_mass_kg, gravity);
                    let solution = solver
                        .integrate(&mut ascent, 0.0, state, burn_duration)
                        .map_err(|source| SimulationError::Integration {
                            index: index + 1,
                            name: stage_name,
                            source,
                        })?;
                    let thrust_trace = ascent.thrust_trace().to_vec();

                    for (knot, ((&t, y), &thrust)) in solution
                        .times()
                        .iter()
                        .zip(solution.states())
                        .zip(&thrust_trace)
                        .enumerate()
                    {
                        // The ignition knot of a follow-on stage repeats the
                        // previous burnout sample.
                        if index > 0 && knot == 0 {
                            continue;
                        }
                        profile.push(TrajectorySample {
                            time_s: time_offset + t,
                            altitude_km: m_to_km(y[1]),
                            velocity_m_s: y[0],
                            mass_kg: running_mass_kg - mass_flow * t,
                            thrust_n: thrust,
                            stage: index + 1,
                        });
                    }

                    state = solution.final_state();
                    time_offset += solution.final_time();
                    self.phase = FlightPhase::Separation(index);
                }
                FlightPhase::Separation(index) => {
                    running_mass_kg -= self.stages[index].total_mass_kg();
                    profile.separations.push(SeparationEvent {
                        stage: index + 1,
                        time_s: time_offset,
                        altitude_km: m_to_km(state[1]),
                        velocity_m_s: state[0],
                    });
                    self.phase = if index + 1 < self.stages.len() {
                        FlightPhase::Burn(index + 1)
                    } else {
                        FlightPhase::Complete
                    };
                }
                FlightPhase::Complete => break,
            }
        }

        Ok(profile)
    }
}

/// Assemble flight-ready stages from a mission manifest and the engine
/// definitions resolved for it, in manifest order.
pub fn build_stages(
    mission: &MissionConfig,
    engines: &[EngineConfig],
) -> Result<Vec<Stage>, SimulationError> {
    if mission.stages.len() != engines.len() {
        return Err(SimulationError::EngineCountMismatch {
            mission: mission.name.clone(),
            stages: mission.stages.len(),
            engines: engines.len(),
        });
    }
    mission
        .stages
        .iter()
        .zip(engines)
        .enumerate()
        .map(|(index, (stage, engine))| {
            Stage::from_config(stage, engine).map_err(|source| SimulationError::Stage {
                index: index + 1,
                name: stage.stage_name.clone(),
                source,
            })
        })
        .collect()
}
