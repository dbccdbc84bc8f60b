//! Stage aggregates and the engine-definition factory.

use thiserror::Error;

use stellar_config::{EngineConfig, StageConfig};
use stellar_engines::{Engine, EngineError};

/// Errors raised while assembling a stage.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("engine definition rejected: {0}")]
    Engine(#[from] EngineError),
    #[error("stage '{name}': dry mass must be positive (got {value} kg)")]
    NonPositiveDryMass { name: String, value: f64 },
    #[error("stage '{name}': fuel mass must be positive (got {value} kg)")]
    NonPositiveFuelMass { name: String, value: f64 },
    #[error("stage '{name}' needs at least one engine")]
    NoEngines { name: String },
}

/// One rocket stage: structural and propellant masses plus `num_engines`
/// identical engines described by a single thrust model.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub dry_mass_kg: f64,
    pub fuel_mass_kg: f64,
    pub num_engines: u32,
    engine: Engine,
}

impl Stage {
    pub fn new(
        name: impl Into<String>,
        dry_mass_kg: f64,
        fuel_mass_kg: f64,
        num_engines: u32,
        engine: Engine,
    ) -> Result<Self, StageError> {
        let name = name.into();
        if !(dry_mass_kg > 0.0) {
            return Err(StageError::NonPositiveDryMass {
                name,
                value: dry_mass_kg,
            });
        }
        if !(fuel_mass_kg > 0.0) {
            return Err(StageError::NonPositiveFuelMass {
                name,
                value: fuel_mass_kg,
            });
        }
        if num_engines == 0 {
            return Err(StageError::NoEngines { name });
        }
        Ok(Self {
            name,
            dry_mass_kg,
            fuel_mass_kg,
            num_engines,
            engine,
        })
    }

    /// Build a stage from its manifest record and engine definition.
    pub fn from_config(stage: &StageConfig, engine: &EngineConfig) -> Result<Self, StageError> {
        let engine = build_engine(engine)?;
        Self::new(
            stage.stage_name.clone(),
            stage.dry_mass_kg,
            stage.fuel_mass_kg,
            stage.num_engines,
            engine,
        )
    }

    /// Combined structural and propellant mass (kg).
    pub fn total_mass_kg(&self) -> f64 {
        self.dry_mass_kg + self.fuel_mass_kg
    }

    /// Total thrust of the engine cluster (N) at stage-local `time_s`.
    pub fn thrust_at(&self, time_s: f64) -> f64 {
        self.engine.thrust_at(time_s) * f64::from(self.num_engines)
    }

    /// Total propellant mass-flow rate of the cluster (kg/s).
    pub fn mass_flow_kg_s(&self) -> f64 {
        self.engine.mass_flow_kg_s() * f64::from(self.num_engines)
    }

    /// Time to exhaust the stage's fuel at the constant cluster flow rate.
    ///
    /// Distinct from the engine's rated burn window: a stage can run dry
    /// before the window closes or coast after it does, still draining at
    /// the constant rate. That approximation is what fixes each burn's
    /// integration span at ignition.
    pub fn burn_duration_s(&self) -> f64 {
        self.fuel_mass_kg / self.mass_flow_kg_s()
    }

    /// Command the cluster throttle (delegates to the engine model).
    pub fn set_throttle(&mut self, throttle: f64) -> Result<(), StageError> {
        Ok(self.engine.set_throttle(throttle)?)
    }

    /// Advance hybrid throttle-ramp state by `dt_s` seconds.
    pub fn advance_throttle(&mut self, dt_s: f64) {
        self.engine.advance_throttle(dt_s);
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Dispatch an engine definition to the matching thrust-model constructor.
pub fn build_engine(config: &EngineConfig) -> Result<Engine, EngineError> {
    match config {
        EngineConfig::Liquid {
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            throttle_range,
            initial_throttle,
        } => Engine::liquid(
            name.clone(),
            *thrust_newtons,
            *isp_seconds,
            *burn_time_s,
            *throttle_range,
            *initial_throttle,
        ),
        EngineConfig::Solid {
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            ignition_delay_s,
        } => Engine::solid(
            name.clone(),
            *thrust_newtons,
            *isp_seconds,
            *burn_time_s,
            *ignition_delay_s,
        ),
        EngineConfig::Hybrid {
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            throttle_delay_s,
        } => Engine::hybrid(
            name.clone(),
            *thrust_newtons,
            *isp_seconds,
            *burn_time_s,
            *throttle_delay_s,
        ),
    }
}
