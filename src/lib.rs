//! Powered-ascent simulation for multi-stage rockets lives here.
//!
//! The workspace crates carry the physics: engine thrust models, stage
//! stacking, the adaptive integrator, and trajectory export. Keeping the
//! logic in library crates lets multiple front-ends (CLI, plotting, web)
//! share it; this facade re-exports them under one roof.

pub use stellar_config as config;
pub use stellar_core::{constants, units};
pub use stellar_engines as engines;
pub use stellar_export as export;
pub use stellar_flight as flight;
pub use stellar_solver as solver;

pub use stellar_flight::{FlightProfile, Simulator, build_stages};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
