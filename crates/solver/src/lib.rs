//! Adaptive Runge-Kutta integration with dense output.
//!
//! The integrator is a Dormand-Prince 5(4) embedded pair with proportional
//! step-size control: a step is accepted when the scaled error estimate is
//! at most one, and the step size is rescaled by `0.9 * err^(-1/5)` on
//! accept and `0.9 * err^(-1/4)` on reject, clamped to the configured
//! bounds. Accepted states are kept as knots together with the endpoint
//! derivatives of each step, so the solution can be sampled anywhere in
//! the integrated span with a cubic Hermite interpolant.
//!
//! Systems may carry state that evolves between steps (for example a
//! throttle ramp): [`OdeSystem::after_step`] runs once per accepted step
//! with the step size actually taken. Because that hook may change the
//! right-hand side, the first stage is re-evaluated at the start of every
//! step instead of reusing the last stage of the previous one.

use thiserror::Error;

/// A first-order ODE system `dy/dt = f(t, y)` with `N` state components.
pub trait OdeSystem<const N: usize> {
    /// Right-hand side evaluated at `(t, y)`.
    fn rhs(&self, t: f64, y: &[f64; N]) -> [f64; N];

    /// Hook invoked once after every accepted step, with the end time of
    /// the step and the step size that was taken. Default: no-op.
    fn after_step(&mut self, _t: f64, _dt: f64) {}
}

/// Absolute and relative error tolerances.
#[derive(Debug, Clone, Copy)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    pub fn new(abs: f64, rel: f64) -> Self {
        Self { abs, rel }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-3,
        }
    }
}

/// Step-size bounds and loop guards for one integration run.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// First trial step size (s).
    pub initial_step: f64,
    /// Smallest step the controller may select (s).
    pub min_step: f64,
    /// Largest step the controller may select (s).
    pub max_step: f64,
    /// Upper bound on attempted steps before the run is aborted.
    pub max_steps: usize,
    pub tolerances: Tolerances,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            initial_step: 1e-3,
            min_step: 1e-9,
            max_step: 1.0,
            max_steps: 1_000_000,
            tolerances: Tolerances::default(),
        }
    }
}

/// Ways an integration run can fail.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("integration span must advance time (t0 = {t0}, t_end = {t_end})")]
    BadSpan { t0: f64, t_end: f64 },
    #[error(
        "unusable step bounds: initial_step = {initial_step}, min_step = {min_step}, max_step = {max_step}"
    )]
    BadStepBounds {
        initial_step: f64,
        min_step: f64,
        max_step: f64,
    },
    #[error("step size underflow at t = {t}: error control cannot satisfy the tolerances")]
    StepSizeUnderflow { t: f64 },
    #[error("exceeded {max_steps} attempted steps at t = {t}")]
    MaxStepsExceeded { t: f64, max_steps: usize },
    #[error("state became non-finite at t = {t}")]
    NonFiniteState { t: f64 },
}

/// Counters describing one integration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub steps_accepted: usize,
    pub steps_rejected: usize,
    pub rhs_evals: usize,
}

/// Dormand-Prince 5(4) coefficients (DOPRI5).
///
/// `A` holds the lower-triangular stage coefficients for stages 2..=7,
/// `B` the fifth-order solution weights, and `E = B - B̂` the weights of
/// the embedded fourth-order error estimate.
mod tableau {
    pub const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

    pub const A: [[f64; 6]; 6] = [
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
        [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
        [
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
            0.0,
            0.0,
        ],
        [
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
            0.0,
        ],
        [
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
        ],
    ];

    pub const B: [f64; 7] = [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ];

    pub const E: [f64; 7] = [
        71.0 / 57600.0,
        0.0,
        -71.0 / 16695.0,
        71.0 / 1920.0,
        -17253.0 / 339200.0,
        22.0 / 525.0,
        -1.0 / 40.0,
    ];
}

enum StepResult<const N: usize> {
    Accept {
        y_new: [f64; N],
        /// Derivative at the start of the step.
        dy_start: [f64; N],
        /// Derivative at the end of the step (seventh stage).
        dy_end: [f64; N],
        h_next: f64,
    },
    Reject {
        h_next: f64,
    },
}

/// Dormand-Prince 5(4) integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dopri5 {
    options: SolverOptions,
}

impl Dopri5 {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Integrate `system` from `(t0, y0)` to exactly `t_end`, recording
    /// every accepted step as a knot of the returned dense solution.
    pub fn integrate<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &mut S,
        t0: f64,
        y0: [f64; N],
        t_end: f64,
    ) -> Result<DenseSolution<N>, IntegrationError> {
        if !(t_end > t0) {
            return Err(IntegrationError::BadSpan { t0, t_end });
        }

        let opts = &self.options;
        // The step clamps below require finite bounds with
        // 0 < min_step <= max_step.
        if !(opts.initial_step.is_finite()
            && opts.max_step.is_finite()
            && opts.initial_step > 0.0
            && opts.min_step > 0.0
            && opts.max_step >= opts.min_step)
        {
            return Err(IntegrationError::BadStepBounds {
                initial_step: opts.initial_step,
                min_step: opts.min_step,
                max_step: opts.max_step,
            });
        }

        let mut stats = Stats::default();
        let mut ts = vec![t0];
        let mut ys = vec![y0];
        let mut dys_start: Vec<[f64; N]> = Vec::new();
        let mut dys_end: Vec<[f64; N]> = Vec::new();

        let mut t = t0;
        let mut y = y0;
        let mut h = opts.initial_step.clamp(opts.min_step, opts.max_step);
        let mut attempts = 0usize;

        while t < t_end {
            attempts += 1;
            if attempts > opts.max_steps {
                return Err(IntegrationError::MaxStepsExceeded {
                    t,
                    max_steps: opts.max_steps,
                });
            }

            // Truncate the final step so the last knot lands on t_end.
            let truncated = t + h >= t_end;
            let h_try = if truncated { t_end - t } else { h };

            match self.try_step(system, t, &y, h_try, &mut stats)? {
                StepResult::Accept {
                    y_new,
                    dy_start,
                    dy_end,
                    h_next,
                } => {
                    t = if truncated { t_end } else { t + h_try };
                    y = y_new;
                    h = h_next.clamp(opts.min_step, opts.max_step);

                    ts.push(t);
                    ys.push(y);
                    dys_start.push(dy_start);
                    dys_end.push(dy_end);
                    stats.steps_accepted += 1;

                    system.after_step(t, h_try);
                }
                StepResult::Reject { h_next } => {
                    stats.steps_rejected += 1;
                    // A truncated final step may legitimately be below the
                    // minimum; only an untruncated step at the floor means
                    // the controller has nowhere left to go.
                    if !truncated && h_try <= opts.min_step {
                        return Err(IntegrationError::StepSizeUnderflow { t });
                    }
                    h = h_next.max(opts.min_step);
                }
            }
        }

        Ok(DenseSolution {
            ts,
            ys,
            dys_start,
            dys_end,
            stats,
        })
    }

    fn try_step<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        t: f64,
        y: &[f64; N],
        h: f64,
        stats: &mut Stats,
    ) -> Result<StepResult<N>, IntegrationError> {
        let tol = &self.options.tolerances;
        let mut k = [[0.0; N]; 7];

        k[0] = system.rhs(t, y);
        for stage in 1..7 {
            let mut y_stage = *y;
            for (j, kj) in k.iter().enumerate().take(stage) {
                let a = tableau::A[stage - 1][j];
                if a != 0.0 {
                    for i in 0..N {
                        y_stage[i] += h * a * kj[i];
                    }
                }
            }
            k[stage] = system.rhs(t + tableau::C[stage] * h, &y_stage);
        }
        stats.rhs_evals += 7;

        // The seventh stage point is the fifth-order solution itself
        // (c7 = 1 and the last A row equals B), so k[6] is the end-point
        // derivative used for the error estimate and the interpolant.
        let mut y_new = *y;
        for (j, kj) in k.iter().enumerate() {
            let b = tableau::B[j];
            if b != 0.0 {
                for i in 0..N {
                    y_new[i] += h * b * kj[i];
                }
            }
        }

        if y_new.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFiniteState { t });
        }

        let mut sq_sum = 0.0;
        for i in 0..N {
            let mut err = 0.0;
            for (j, kj) in k.iter().enumerate() {
                err += tableau::E[j] * kj[i];
            }
            err *= h;
            let scale = tol.abs + tol.rel * y[i].abs().max(y_new[i].abs());
            let ratio = err / scale;
            sq_sum += ratio * ratio;
        }
        let err_norm = (sq_sum / N as f64).sqrt();

        if err_norm <= 1.0 {
            let factor = (0.9 * err_norm.powf(-0.2)).min(5.0);
            Ok(StepResult::Accept {
                y_new,
                dy_start: k[0],
                dy_end: k[6],
                h_next: h * factor,
            })
        } else {
            let factor = (0.9 * err_norm.powf(-0.25)).max(0.1);
            Ok(StepResult::Reject { h_next: h * factor })
        }
    }
}

/// Solution of one integration run: the accepted knots plus enough
/// derivative information to interpolate between them.
///
/// Each step contributes a segment with its own endpoint derivatives.
/// They are kept per segment rather than per knot because the
/// [`OdeSystem::after_step`] hook may change the right-hand side between
/// two adjacent steps.
#[derive(Debug, Clone)]
pub struct DenseSolution<const N: usize> {
    ts: Vec<f64>,
    ys: Vec<[f64; N]>,
    dys_start: Vec<[f64; N]>,
    dys_end: Vec<[f64; N]>,
    stats: Stats,
}

impl<const N: usize> DenseSolution<N> {
    /// All knot times, strictly increasing; first is `t0`, last is `t_end`.
    pub fn times(&self) -> &[f64] {
        &self.ts
    }

    /// Knot states aligned with [`times`](Self::times).
    pub fn states(&self) -> &[[f64; N]] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.ts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts.is_empty()
    }

    pub fn final_time(&self) -> f64 {
        self.ts[self.ts.len() - 1]
    }

    pub fn final_state(&self) -> [f64; N] {
        self.ys[self.ys.len() - 1]
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Evaluate the solution at `t` with cubic Hermite interpolation over
    /// the containing segment. Times outside the integrated span clamp to
    /// the nearest endpoint.
    pub fn sample(&self, t: f64) -> [f64; N] {
        let n = self.ts.len();
        if n == 1 || t <= self.ts[0] {
            return self.ys[0];
        }
        if t >= self.ts[n - 1] {
            return self.ys[n - 1];
        }

        let seg = self.ts.partition_point(|&knot| knot <= t) - 1;
        let seg = seg.min(n - 2);
        let h = self.ts[seg + 1] - self.ts[seg];
        let s = (t - self.ts[seg]) / h;

        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        let y0 = &self.ys[seg];
        let y1 = &self.ys[seg + 1];
        let d0 = &self.dys_start[seg];
        let d1 = &self.dys_end[seg];

        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = h00 * y0[i] + h * h10 * d0[i] + h01 * y1[i] + h * h11 * d1[i];
        }
        out
    }
}
