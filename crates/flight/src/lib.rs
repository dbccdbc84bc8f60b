//! Powered-ascent dynamics and the multi-stage flight simulator.
//!
//! The crate is organized around one flow: definitions become [`Stage`]
//! aggregates via [`build_stages`], the [`Simulator`] integrates each
//! stage's burn with the adaptive solver, and the stitched result comes
//! back as a [`FlightProfile`] ordered by mission time.

pub mod atmosphere;
pub mod dynamics;
pub mod profile;
pub mod simulator;
pub mod stage;

pub use dynamics::{AscentState, GravityModel, StageAscent, state_derivative};
pub use profile::{FlightProfile, SeparationEvent, TrajectorySample};
pub use simulator::{FlightPhase, SimulationError, Simulator, build_stages};
pub use stage::{Stage, StageError, build_engine};
