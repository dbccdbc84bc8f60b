//! Engine thrust models.
//!
//! Every engine shares the same rated core (thrust, specific impulse, burn
//! time, and the mass-flow rate derived from them); the variants differ only
//! in how they gate and scale that rated thrust over a stage burn. The set
//! is closed: stage builders match exhaustively on [`EngineKind`] instead of
//! dispatching through trait objects.

use thiserror::Error;

use stellar_core::constants::G0;

/// Errors raised while constructing or commanding an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine '{name}': {quantity} must be positive (got {value})")]
    NonPositive {
        name: String,
        quantity: &'static str,
        value: f64,
    },
    #[error("engine '{name}': ignition delay must not be negative (got {value})")]
    NegativeIgnitionDelay { name: String, value: f64 },
    #[error("engine '{name}': invalid throttle range [{min}, {max}]")]
    InvalidThrottleRange { name: String, min: f64, max: f64 },
    #[error("engine '{name}': throttle {value} outside allowed range [{min}, {max}]")]
    ThrottleOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("engine '{name}' is not throttleable")]
    NotThrottleable { name: String },
}

/// Variant-specific throttle and ignition state.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineKind {
    /// Pump-fed liquid engine with a bounded, instantaneous throttle.
    Liquid {
        throttle_range: [f64; 2],
        current_throttle: f64,
    },
    /// Solid motor: runs at full rated thrust once the grain ignites.
    Solid { ignition_delay_s: f64 },
    /// Hybrid motor whose throttle ramps toward a commanded target.
    Hybrid {
        throttle_delay_s: f64,
        target_throttle: f64,
        current_throttle: f64,
    },
}

/// A rocket engine: rated parameters shared by every variant plus the
/// variant state in [`EngineKind`].
///
/// The mass-flow rate is fixed at construction as
/// `thrust / (isp * G0)` and stays constant for the life of the model,
/// including while throttled. Burn-duration bookkeeping in the simulator
/// relies on that approximation.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    name: String,
    thrust_newtons: f64,
    isp_seconds: f64,
    burn_time_s: f64,
    mass_flow_kg_s: f64,
    kind: EngineKind,
}

impl Engine {
    /// Build a liquid engine. The initial throttle must lie inside the
    /// configured `[min, max]` range.
    pub fn liquid(
        name: impl Into<String>,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        throttle_range: [f64; 2],
        initial_throttle: f64,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        let [min, max] = throttle_range;
        if !(min > 0.0 && max >= min) {
            return Err(EngineError::InvalidThrottleRange { name, min, max });
        }
        if !(min..=max).contains(&initial_throttle) {
            return Err(EngineError::ThrottleOutOfRange {
                name,
                value: initial_throttle,
                min,
                max,
            });
        }
        Self::with_kind(
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            EngineKind::Liquid {
                throttle_range,
                current_throttle: initial_throttle,
            },
        )
    }

    /// Build a solid motor that ignites `ignition_delay_s` after stage start.
    pub fn solid(
        name: impl Into<String>,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        ignition_delay_s: f64,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        if !(ignition_delay_s >= 0.0) {
            return Err(EngineError::NegativeIgnitionDelay {
                name,
                value: ignition_delay_s,
            });
        }
        Self::with_kind(
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            EngineKind::Solid { ignition_delay_s },
        )
    }

    /// Build a hybrid motor. The throttle ramps from 0 toward a target of
    /// 1.0 at a rate of `1 / throttle_delay_s` per second.
    pub fn hybrid(
        name: impl Into<String>,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        throttle_delay_s: f64,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        require_positive(&name, "throttle delay", throttle_delay_s)?;
        Self::with_kind(
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            EngineKind::Hybrid {
                throttle_delay_s,
                target_throttle: 1.0,
                current_throttle: 0.0,
            },
        )
    }

    fn with_kind(
        name: String,
        thrust_newtons: f64,
        isp_seconds: f64,
        burn_time_s: f64,
        kind: EngineKind,
    ) -> Result<Self, EngineError> {
        require_positive(&name, "thrust", thrust_newtons)?;
        require_positive(&name, "specific impulse", isp_seconds)?;
        require_positive(&name, "burn time", burn_time_s)?;
        let mass_flow_kg_s = thrust_newtons / (isp_seconds * G0);
        Ok(Self {
            name,
            thrust_newtons,
            isp_seconds,
            burn_time_s,
            mass_flow_kg_s,
            kind,
        })
    }

    /// Thrust in newtons at `time_s` seconds after stage start.
    ///
    /// Zero outside the variant's thrust window, never negative. Liquid and
    /// hybrid engines scale the rated thrust by their current throttle;
    /// solid motors deliver full rated thrust between ignition and the end
    /// of the grain burn.
    pub fn thrust_at(&self, time_s: f64) -> f64 {
        match &self.kind {
            EngineKind::Liquid {
                current_throttle, ..
            }
            | EngineKind::Hybrid {
                current_throttle, ..
            } => {
                if (0.0..=self.burn_time_s).contains(&time_s) {
                    self.thrust_newtons * current_throttle
                } else {
                    0.0
                }
            }
            EngineKind::Solid { ignition_delay_s } => {
                if (*ignition_delay_s..=ignition_delay_s + self.burn_time_s).contains(&time_s) {
                    self.thrust_newtons
                } else {
                    0.0
                }
            }
        }
    }

    /// Command a throttle setting.
    ///
    /// Liquid: applied immediately, rejected outside the configured range.
    /// Hybrid: clamped into `[0, 1]` and stored as the ramp target.
    /// Solid: always an error.
    pub fn set_throttle(&mut self, throttle: f64) -> Result<(), EngineError> {
        match &mut self.kind {
            EngineKind::Liquid {
                throttle_range,
                current_throttle,
            } => {
                let [min, max] = *throttle_range;
                if !(min..=max).contains(&throttle) {
                    return Err(EngineError::ThrottleOutOfRange {
                        name: self.name.clone(),
                        value: throttle,
                        min,
                        max,
                    });
                }
                *current_throttle = throttle;
                Ok(())
            }
            EngineKind::Solid { .. } => Err(EngineError::NotThrottleable {
                name: self.name.clone(),
            }),
            EngineKind::Hybrid {
                target_throttle, ..
            } => {
                *target_throttle = throttle.clamp(0.0, 1.0);
                Ok(())
            }
        }
    }

    /// Advance hybrid throttle state by `dt_s` seconds of burn time.
    ///
    /// The current throttle moves toward the target at `1 / throttle_delay`
    /// per second and stops exactly on it; repeated calls converge without
    /// overshoot. No-op for liquid and solid engines.
    pub fn advance_throttle(&mut self, dt_s: f64) {
        if let EngineKind::Hybrid {
            throttle_delay_s,
            target_throttle,
            current_throttle,
        } = &mut self.kind
        {
            if dt_s <= 0.0 {
                return;
            }
            let step = dt_s / *throttle_delay_s;
            if *current_throttle < *target_throttle {
                *current_throttle = (*current_throttle + step).min(*target_throttle);
            } else if *current_throttle > *target_throttle {
                *current_throttle = (*current_throttle - step).max(*target_throttle);
            }
            *current_throttle = current_throttle.clamp(0.0, 1.0);
        }
    }

    /// Effective throttle right now (1.0 for solid motors).
    pub fn current_throttle(&self) -> f64 {
        match &self.kind {
            EngineKind::Liquid {
                current_throttle, ..
            }
            | EngineKind::Hybrid {
                current_throttle, ..
            } => *current_throttle,
            EngineKind::Solid { .. } => 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rated thrust (N).
    pub fn thrust_newtons(&self) -> f64 {
        self.thrust_newtons
    }

    /// Specific impulse (s).
    pub fn isp_seconds(&self) -> f64 {
        self.isp_seconds
    }

    /// Rated burn window length (s).
    pub fn burn_time_s(&self) -> f64 {
        self.burn_time_s
    }

    /// Propellant mass-flow rate (kg/s), constant for the model's lifetime.
    pub fn mass_flow_kg_s(&self) -> f64 {
        self.mass_flow_kg_s
    }

    pub fn kind(&self) -> &EngineKind {
        &self.kind
    }
}

fn require_positive(name: &str, quantity: &'static str, value: f64) -> Result<(), EngineError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::NonPositive {
            name: name.to_string(),
            quantity,
            value,
        })
    }
}
