use stellarlab::solver::{Dopri5, IntegrationError, OdeSystem, SolverOptions, Tolerances};

/// y'' = -y as a first-order pair; from [1, 0] the solution is [cos t, -sin t].
struct Oscillator;

impl OdeSystem<2> for Oscillator {
    fn rhs(&self, _t: f64, y: &[f64; 2]) -> [f64; 2] {
        [y[1], -y[0]]
    }
}

struct ConstantRate;

impl OdeSystem<1> for ConstantRate {
    fn rhs(&self, _t: f64, _y: &[f64; 1]) -> [f64; 1] {
        [1.0]
    }
}

struct Blowup;

impl OdeSystem<1> for Blowup {
    fn rhs(&self, _t: f64, _y: &[f64; 1]) -> [f64; 1] {
        [f64::NAN]
    }
}

#[derive(Default)]
struct CountedDecay {
    hook_calls: usize,
    total_dt: f64,
}

impl OdeSystem<1> for CountedDecay {
    fn rhs(&self, _t: f64, y: &[f64; 1]) -> [f64; 1] {
        [-0.5 * y[0]]
    }

    fn after_step(&mut self, _t: f64, dt: f64) {
        self.hook_calls += 1;
        self.total_dt += dt;
    }
}

#[test]
fn oscillator_half_period_is_accurate() {
    let options = SolverOptions {
        max_step: 0.5,
        tolerances: Tolerances::new(1e-9, 1e-9),
        ..SolverOptions::default()
    };
    let solver = Dopri5::new(options);
    let solution = solver
        .integrate(&mut Oscillator, 0.0, [1.0, 0.0], std::f64::consts::PI)
        .expect("integrate");

    let end = solution.final_state();
    assert!((end[0] + 1.0).abs() < 1e-6, "cos(pi) = {}", end[0]);
    assert!(end[1].abs() < 1e-6, "-sin(pi) = {}", end[1]);

    // Dense output holds away from the knots too.
    let quarter = solution.sample(std::f64::consts::FRAC_PI_2);
    assert!(quarter[0].abs() < 1e-6, "cos(pi/2) = {}", quarter[0]);
    assert!((quarter[1] + 1.0).abs() < 1e-6, "-sin(pi/2) = {}", quarter[1]);
}

#[test]
fn knots_are_strictly_increasing_and_hit_both_endpoints() {
    let solver = Dopri5::new(SolverOptions {
        max_step: 0.25,
        ..SolverOptions::default()
    });
    let solution = solver
        .integrate(&mut Oscillator, 0.0, [1.0, 0.0], 2.0)
        .expect("integrate");

    let times = solution.times();
    assert!(times[0] == 0.0);
    assert!(solution.final_time() == 2.0);
    for k in 1..times.len() {
        let gap = times[k] - times[k - 1];
        assert!(gap > 0.0, "knot {k} does not advance");
        assert!(gap <= 0.25 + 1e-12, "gap = {gap}");
    }
}

#[test]
fn constant_rate_is_integrated_exactly() {
    let solver = Dopri5::default();
    let solution = solver
        .integrate(&mut ConstantRate, 0.0, [0.0], 3.0)
        .expect("integrate");
    assert!((solution.final_state()[0] - 3.0).abs() < 1e-12);
    // Hermite interpolation reproduces a linear solution exactly.
    assert!((solution.sample(1.7)[0] - 1.7).abs() < 1e-12);
    // Outside the span the sample clamps to the endpoints.
    assert!(solution.sample(-1.0)[0] == solution.states()[0][0]);
    assert!(solution.sample(99.0)[0] == solution.final_state()[0]);
}

#[test]
fn rejects_empty_span() {
    let solver = Dopri5::default();
    assert!(matches!(
        solver.integrate(&mut ConstantRate, 1.0, [0.0], 1.0),
        Err(IntegrationError::BadSpan { .. })
    ));
    assert!(matches!(
        solver.integrate(&mut ConstantRate, 1.0, [0.0], 0.5),
        Err(IntegrationError::BadSpan { .. })
    ));
}

#[test]
fn rejects_unusable_step_bounds() {
    let cases = [
        SolverOptions {
            max_step: 0.0,
            ..SolverOptions::default()
        },
        SolverOptions {
            max_step: f64::NAN,
            ..SolverOptions::default()
        },
        SolverOptions {
            min_step: -1e-9,
            ..SolverOptions::default()
        },
        SolverOptions {
            initial_step: 0.0,
            ..SolverOptions::default()
        },
    ];
    for options in cases {
        let solver = Dopri5::new(options);
        // An error, never a panic, whatever the caller passed for the bounds.
        assert!(matches!(
            solver.integrate(&mut ConstantRate, 0.0, [0.0], 3.0),
            Err(IntegrationError::BadStepBounds { .. })
        ));
    }
}

#[test]
fn non_finite_state_is_reported() {
    let solver = Dopri5::default();
    assert!(matches!(
        solver.integrate(&mut Blowup, 0.0, [1.0], 1.0),
        Err(IntegrationError::NonFiniteState { .. })
    ));
}

#[test]
fn after_step_runs_once_per_accepted_step() {
    let solver = Dopri5::default();
    let mut system = CountedDecay::default();
    let solution = solver
        .integrate(&mut system, 0.0, [2.0], 3.0)
        .expect("integrate");

    let stats = solution.stats();
    assert!(stats.steps_accepted == solution.len() - 1);
    assert!(system.hook_calls == stats.steps_accepted);
    // The step sizes handed to the hook tile the span.
    assert!((system.total_dt - 3.0).abs() < 1e-9, "sum dt = {}", system.total_dt);
    assert!(stats.rhs_evals == 7 * (stats.steps_accepted + stats.steps_rejected));

    let expected = 2.0 * (-1.5f64).exp();
    assert!(
        (solution.final_state()[0] - expected).abs() < 1e-3,
        "decay end = {}",
        solution.final_state()[0]
    );
}
