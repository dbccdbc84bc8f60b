//! Exponential atmosphere model.
//!
//! Informational in this revision: the equations of motion keep their drag
//! slot at zero, but the density profile is exposed so a drag force can be
//! added later without reshaping call sites.

use stellar_core::constants::{ATMOSPHERE_SCALE_HEIGHT_M, SEA_LEVEL_DENSITY_KG_M3};

/// Air density (kg/m³) at `altitude_m` metres above sea level.
pub fn density(altitude_m: f64) -> f64 {
    SEA_LEVEL_DENSITY_KG_M3 * (-altitude_m / ATMOSPHERE_SCALE_HEIGHT_M).exp()
}
