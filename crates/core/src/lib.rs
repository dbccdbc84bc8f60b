//! Core constants and shared unit helpers for the StellarLab workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²). Also the reference
    /// acceleration in the specific-impulse/mass-flow relation.
    pub const G0: f64 = 9.80665;
    /// Mean Earth radius (m).
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
    /// Air density at sea level (kg/m³).
    pub const SEA_LEVEL_DENSITY_KG_M3: f64 = 1.225;
    /// Scale height of the exponential atmosphere model (m).
    pub const ATMOSPHERE_SCALE_HEIGHT_M: f64 = 8_500.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert newtons to kilonewtons.
    #[inline]
    pub fn n_to_kn(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert kilonewtons to newtons.
    #[inline]
    pub fn kn_to_n(v: f64) -> f64 {
        v * 1_000.0
    }
}
