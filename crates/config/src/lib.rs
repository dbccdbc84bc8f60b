//! Mission and engine definition records plus their file loaders.
//!
//! Definitions are plain data: a mission names its stages, and every stage
//! points at an engine definition file. Loaders pick the parser from the
//! file extension (YAML, TOML, or JSON) and keep "file is missing" distinct
//! from "file would not parse" so callers can tell a bad path from a bad
//! record.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Engine definition parsed from an engine catalog file.
///
/// The `type` tag selects the thrust-model variant. An unrecognized tag
/// fails at parse time with an error that names it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum EngineConfig {
    Liquid {
        name: String,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        #[serde(default = "default_throttle_range")]
        throttle_range: [f64; 2],
        #[serde(default = "default_initial_throttle")]
        initial_throttle: f64,
    },
    Solid {
        name: String,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        #[serde(default = "default_ignition_delay")]
        ignition_delay_s: f64,
    },
    Hybrid {
        name: String,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        #[serde(default = "default_throttle_delay")]
        throttle_delay_s: f64,
    },
}

impl EngineConfig {
    /// Engine name as written in the definition file.
    pub fn name(&self) -> &str {
        match self {
            EngineConfig::Liquid { name, .. }
            | EngineConfig::Solid { name, .. }
            | EngineConfig::Hybrid { name, .. } => name,
        }
    }

    /// The variant tag, as it appears in definition files.
    pub fn type_name(&self) -> &'static str {
        match self {
            EngineConfig::Liquid { .. } => "Liquid",
            EngineConfig::Solid { .. } => "Solid",
            EngineConfig::Hybrid { .. } => "Hybrid",
        }
    }
}

fn default_throttle_range() -> [f64; 2] {
    [0.6, 1.0]
}

fn default_initial_throttle() -> f64 {
    1.0
}

fn default_ignition_delay() -> f64 {
    0.1
}

fn default_throttle_delay() -> f64 {
    0.5
}

/// One stage of a mission manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub stage_name: String,
    pub dry_mass_kg: f64,
    pub fuel_mass_kg: f64,
    pub num_engines: u32,
    /// Path to the stage's engine definition, used as written.
    pub engine_config: PathBuf,
}

/// A mission manifest: ordered stages, bottom first.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionConfig {
    pub name: String,
    pub stages: Vec<StageConfig>,
}

/// Errors that can occur while loading definition files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("definition file not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported definition format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Load a mission manifest.
pub fn load_mission<P: AsRef<Path>>(path: P) -> Result<MissionConfig, ConfigError> {
    load_record(path)
}

/// Load a single engine definition.
pub fn load_engine<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    load_record(path)
}

/// Load the engine definition of every stage, in stage order.
pub fn load_mission_engines(mission: &MissionConfig) -> Result<Vec<EngineConfig>, ConfigError> {
    mission
        .stages
        .iter()
        .map(|stage| load_engine(&stage.engine_config))
        .collect()
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            let reader = open_file(path)?;
            Ok(serde_yaml::from_reader(reader)?)
        }
        Some("toml") => {
            let contents = read_file(path)?;
            Ok(toml::from_str(&contents)?)
        }
        Some("json") => {
            let reader = open_file(path)?;
            Ok(serde_json::from_reader(reader)?)
        }
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn open_file(path: &Path) -> Result<File, ConfigError> {
    File::open(path).map_err(|err| missing_or_io(path, err))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|err| missing_or_io(path, err))
}

fn missing_or_io(path: &Path, err: std::io::Error) -> ConfigError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ConfigError::MissingFile {
            path: path.to_path_buf(),
        }
    } else {
        ConfigError::Io(err)
    }
}
