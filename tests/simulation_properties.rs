use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use epimod::error::SimError;
use epimod::model::{EpiModel, Params, Variant};
use epimod::sim::{Simulation, TimeGrid};

fn closed_system_params(variant: Variant) -> Params {
    // No replenishment, no reinfection, no mortality: total mass is conserved.
    Params {
        beta: 0.3,
        rho: 0.1,
        delta: 0.0,
        alpha: 0.0,
        lambda: 0.0,
        gamma: match variant {
            Variant::Sird => None,
            Variant::Slird => Some(0.1),
        },
    }
}

#[test]
fn trajectory_shape_matches_grid() {
    let sim = Simulation::default();
    let traj = sim
        .run(Variant::Sird, Params::default_for(Variant::Sird))
        .expect("default run");

    assert_eq!(traj.t.len(), 160);
    assert_eq!(traj.series.len(), 3);
    for s in &traj.series {
        assert_eq!(s.values.len(), 160);
    }
    assert_eq!(traj.t[0], 0.0);
    assert_eq!(*traj.t.last().expect("non-empty"), 160.0);

    // First state is the configured initial condition exactly.
    assert_eq!(traj.series[0].values[0], 0.99);
    assert_eq!(traj.series[1].values[0], 0.01);
    assert_eq!(traj.series[2].values[0], 0.0);

    let slird = sim
        .run(Variant::Slird, Params::default_for(Variant::Slird))
        .expect("default slird run");
    assert_eq!(slird.series.len(), 4);
    let keys: Vec<&str> = slird.series.iter().map(|s| s.key).collect();
    assert_eq!(keys, ["S", "L", "I", "R"]);
    assert_eq!(slird.series[0].values[0], 0.99);
    assert_eq!(slird.series[1].values[0], 0.0);
    assert_eq!(slird.series[2].values[0], 0.01);
}

#[test]
fn closed_system_conserves_mass() {
    let sim = Simulation::default();
    for variant in [Variant::Sird, Variant::Slird] {
        let traj = sim
            .run(variant, closed_system_params(variant))
            .expect("closed-system run");
        for idx in 0..traj.t.len() {
            let total: f64 = traj.series.iter().map(|s| s.values[idx]).sum();
            assert!(
                (total - 1.0).abs() < 1e-9,
                "{} mass drifted to {} at t={}",
                variant,
                total,
                traj.t[idx]
            );
        }
    }
}

#[test]
fn disease_free_state_stays_disease_free() {
    // No spontaneous infection: with I0 = 0 (and L0 = 0) the infection terms
    // are identically zero, so I and R stay at exactly 0 even with inflow.
    let grid = TimeGrid::default().points();

    let sird = EpiModel::new(Variant::Sird, Params::default_for(Variant::Sird)).expect("model");
    let states = sird.integrate(&[1.0, 0.0, 0.0], &grid).expect("integrate");
    for y in &states {
        assert_eq!(y[1], 0.0);
        assert_eq!(y[2], 0.0);
    }

    let slird = EpiModel::new(Variant::Slird, Params::default_for(Variant::Slird)).expect("model");
    let states = slird
        .integrate(&[1.0, 0.0, 0.0, 0.0], &grid)
        .expect("integrate");
    for y in &states {
        assert_eq!(y[1], 0.0);
        assert_eq!(y[2], 0.0);
        assert_eq!(y[3], 0.0);
    }
}

#[test]
fn infected_decays_when_removal_dominates() {
    // rho + delta well above beta: I can only shrink.
    let params = Params {
        beta: 0.3,
        rho: 1.0,
        delta: 0.5,
        alpha: 0.0,
        lambda: 0.0,
        gamma: None,
    };
    let traj = Simulation::default()
        .run(Variant::Sird, params)
        .expect("decay run");
    let i = &traj.compartment("I").expect("I series").values;
    for w in i.windows(2) {
        assert!(w[1] <= w[0] + 1e-15, "I increased: {} -> {}", w[0], w[1]);
    }
    assert!(*i.last().expect("non-empty") < 1e-10);
}

#[test]
fn identical_inputs_give_identical_trajectories() {
    let sim = Simulation::default();
    let a = sim
        .run(Variant::Slird, Params::default_for(Variant::Slird))
        .expect("first run");
    let b = sim
        .run(Variant::Slird, Params::default_for(Variant::Slird))
        .expect("second run");
    assert_eq!(a, b);
}

#[test]
fn slird_converges_to_sird_as_gamma_grows() {
    // Fixed-step RK4 needs dt * gamma inside its stability region, so use a
    // fine grid for the stiff settings.
    let sim = Simulation::new(TimeGrid::new(0.0, 160.0, 3201));
    let sird = sim
        .run(Variant::Sird, Params::default_for(Variant::Sird))
        .expect("sird run");
    let sird_i = &sird.compartment("I").expect("I series").values;

    let gap_for = |gamma: f64| -> f64 {
        let mut params = Params::default_for(Variant::Slird);
        params.gamma = Some(gamma);
        let slird = sim.run(Variant::Slird, params).expect("slird run");
        let slird_i = &slird.compartment("I").expect("I series").values;
        sird_i
            .iter()
            .zip(slird_i.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max)
    };

    let gap_10 = gap_for(10.0);
    let gap_40 = gap_for(40.0);
    assert!(gap_40 < 0.01, "gap at gamma=40 was {}", gap_40);
    assert!(
        gap_40 <= gap_10 + 1e-9,
        "gap did not shrink: gamma=10 -> {}, gamma=40 -> {}",
        gap_10,
        gap_40
    );
}

#[test]
fn default_scenario_has_expected_shape() {
    // Defaults: I rises to a peak within the first third of the horizon and
    // decays after it; S partially recovers after its trough via alpha and
    // lambda inflows.
    let traj = Simulation::default()
        .run(Variant::Sird, Params::default_for(Variant::Sird))
        .expect("default run");
    let i = &traj.compartment("I").expect("I series").values;
    let s = &traj.compartment("S").expect("S series").values;

    let (peak_idx, peak) = i
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (k, &v)| if v > acc.1 { (k, v) } else { acc });
    assert!(peak_idx > 0, "I peaked at the initial sample");
    assert!(
        peak_idx < i.len() / 3,
        "I peaked at sample {} of {}",
        peak_idx,
        i.len()
    );
    assert!(peak > 0.05, "I peak was only {}", peak);
    assert!(i[peak_idx + 10] < peak, "I did not decay after its peak");

    let s_min = s.iter().copied().fold(f64::INFINITY, f64::min);
    assert!(s_min < 0.9, "S never depleted (min {})", s_min);
    assert!(
        *s.last().expect("non-empty") > s_min + 0.01,
        "S did not recover after its trough"
    );
}

#[test]
fn validation_rejects_bad_requests() {
    let sim = Simulation::default();

    let named: BTreeMap<String, f64> = Params::default_for(Variant::Sird)
        .named()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    // Unknown variant tag.
    match sim.run_named("SEIR", &named) {
        Err(SimError::InvalidVariant(tag)) => assert_eq!(tag, "SEIR"),
        other => panic!("expected InvalidVariant, got {:?}", other),
    }

    // gamma missing for SLIRD.
    match sim.run_named("SLIRD", &named) {
        Err(SimError::MissingParameter { name }) => assert_eq!(name, "gamma"),
        other => panic!("expected MissingParameter, got {:?}", other),
    }

    // Unrecognized extra for SIRD.
    let mut extra = named.clone();
    extra.insert("gamma".to_string(), 0.1);
    match sim.run_named("SIRD", &extra) {
        Err(SimError::UnknownParameter { name }) => assert_eq!(name, "gamma"),
        other => panic!("expected UnknownParameter, got {:?}", other),
    }

    // Non-finite value.
    let mut bad = named.clone();
    bad.insert("beta".to_string(), f64::NAN);
    match sim.run_named("SIRD", &bad) {
        Err(SimError::NonFiniteParameter { name, .. }) => assert_eq!(name, "beta"),
        other => panic!("expected NonFiniteParameter, got {:?}", other),
    }

    // Degenerate grids.
    let one_point = Simulation::new(TimeGrid::new(0.0, 160.0, 1));
    assert!(matches!(
        one_point.run(Variant::Sird, Params::default_for(Variant::Sird)),
        Err(SimError::DegenerateGrid { .. })
    ));
    let backwards = Simulation::new(TimeGrid::new(10.0, 0.0, 160));
    assert!(matches!(
        backwards.run(Variant::Sird, Params::default_for(Variant::Sird)),
        Err(SimError::DegenerateGrid { .. })
    ));

    // Initial-state arity must match the variant.
    let model = EpiModel::new(Variant::Sird, Params::default_for(Variant::Sird)).expect("model");
    assert!(matches!(
        model.integrate(&[1.0, 0.0, 0.0, 0.0], &TimeGrid::default().points()),
        Err(SimError::DimensionMismatch {
            expected: 3,
            got: 4
        })
    ));
}

#[test]
fn degenerate_sample_counts_do_not_panic_in_points() {
    // check() rejects these grids, but points() is public and must stay
    // total for them instead of underflowing `samples - 1`.
    assert!(TimeGrid::new(0.0, 160.0, 0).points().is_empty());
    assert_eq!(TimeGrid::new(0.0, 160.0, 1).points().len(), 1);
    assert!(TimeGrid::new(0.0, 160.0, 0).check().is_err());
    assert!(TimeGrid::new(0.0, 160.0, 1).check().is_err());
}

#[test]
fn cancellation_flag_aborts_the_run() {
    let cancel = AtomicBool::new(true);
    let result = Simulation::default().run_with_cancel(
        Variant::Sird,
        Params::default_for(Variant::Sird),
        &cancel,
    );
    assert!(matches!(result, Err(SimError::Cancelled)));

    cancel.store(false, Ordering::Relaxed);
    assert!(Simulation::default()
        .run_with_cancel(Variant::Sird, Params::default_for(Variant::Sird), &cancel)
        .is_ok());
}

#[test]
fn runaway_growth_attaches_instability_warning() {
    // Removal rate far beyond the fixed-step stability region: the state
    // blows up to non-finite values, which must warn, not abort.
    let params = Params {
        beta: 0.3,
        rho: 10.0,
        delta: 0.0,
        alpha: 0.01,
        lambda: 0.01,
        gamma: None,
    };
    let traj = Simulation::default()
        .run(Variant::Sird, params)
        .expect("run still completes");
    assert!(!traj.warnings.is_empty());
}

#[test]
fn clamping_is_optional_and_off_by_default() {
    // A negative replenishment drains S through zero; the permissive default
    // must let it go negative, the clamped variant must not.
    let params = Params {
        beta: 0.3,
        rho: 0.1,
        delta: 0.05,
        alpha: -0.05,
        lambda: 0.01,
        gamma: None,
    };

    let permissive = Simulation::default()
        .run(Variant::Sird, params.clone())
        .expect("permissive run");
    let s_min = permissive
        .compartment("S")
        .expect("S series")
        .values
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    assert!(s_min < 0.0, "expected S to go negative, min was {}", s_min);

    let mut clamped_sim = Simulation::default();
    clamped_sim.clamp_non_negative = true;
    let clamped = clamped_sim
        .run(Variant::Sird, params)
        .expect("clamped run");
    for s in &clamped.series {
        assert!(s.values.iter().all(|&v| v >= 0.0));
    }

    // With defaults nothing goes negative, so clamping must be a no-op.
    let a = Simulation::default()
        .run(Variant::Sird, Params::default_for(Variant::Sird))
        .expect("run");
    let mut b_sim = Simulation::default();
    b_sim.clamp_non_negative = true;
    let b = b_sim
        .run(Variant::Sird, Params::default_for(Variant::Sird))
        .expect("run");
    assert_eq!(a.series, b.series);
}
