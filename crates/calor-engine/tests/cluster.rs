//! End-to-end runs compared against the serial reference solver.

use std::time::Duration;

use calor_core::{Diffusivity, GridDims, Rank};
use calor_decomp::DecompError;
use calor_engine::{Cluster, ConfigError, RunError, SimConfig};
use calor_grid::GlobalField;
use calor_stencil::reference;
use calor_test_utils::{compare, fixtures};
use proptest::prelude::*;

fn config(nx: usize, ny: usize, workers: usize, steps: u64) -> SimConfig {
    SimConfig {
        dims: GridDims::new(nx, ny),
        steps,
        workers,
        threads: 1,
        liveness_timeout: Some(Duration::from_secs(10)),
        ..SimConfig::default()
    }
}

fn run(cfg: SimConfig, initial: &GlobalField) -> GlobalField {
    Cluster::new(cfg).unwrap().run(initial).unwrap().field
}

#[test]
fn single_worker_matches_reference() {
    let cfg = config(12, 10, 1, 20);
    let initial = fixtures::seeded(cfg.dims, 1).unwrap();
    let expected = reference::advance(&initial, cfg.diffusivity, cfg.steps);
    compare::assert_fields_identical(&run(cfg, &initial), &expected);
}

#[test]
fn four_workers_match_reference_bitwise() {
    let cfg = config(8, 8, 4, 15);
    let initial = fixtures::parabolic(cfg.dims).unwrap();
    let expected = reference::advance(&initial, cfg.diffusivity, cfg.steps);
    compare::assert_fields_identical(&run(cfg, &initial), &expected);
}

#[test]
fn other_block_grids_match_reference() {
    // (nx, ny, workers): 2 x 3, 3 x 3, and 2 x 4 block grids.
    for (nx, ny, workers) in [(12, 18, 6), (9, 9, 9), (10, 16, 8)] {
        let cfg = config(nx, ny, workers, 12);
        let initial = fixtures::seeded(cfg.dims, workers as u64).unwrap();
        let expected = reference::advance(&initial, cfg.diffusivity, cfg.steps);
        compare::assert_fields_identical(&run(cfg, &initial), &expected);
    }
}

#[test]
fn compute_pool_size_does_not_change_the_result() {
    let cfg = config(16, 12, 4, 10);
    let initial = fixtures::seeded(cfg.dims, 7).unwrap();
    let one = run(cfg.clone(), &initial);
    let three = run(
        SimConfig {
            threads: 3,
            ..cfg
        },
        &initial,
    );
    compare::assert_fields_identical(&one, &three);
}

#[test]
fn four_by_four_single_step() {
    let cfg = SimConfig {
        diffusivity: Diffusivity::new(0.1, 0.1),
        ..config(4, 4, 1, 1)
    };
    let initial = fixtures::parabolic(cfg.dims).unwrap();
    let out = run(cfg.clone(), &initial);

    for i in 0..4 {
        for j in 0..4 {
            if i == 0 || i == 3 || j == 0 || j == 3 {
                assert_eq!(out[(i, j)], initial[(i, j)], "boundary ({i}, {j})");
            } else {
                let u = |x: usize, y: usize| initial[(x, y)];
                let c = f64::from(u(i, j));
                let k = f64::from(0.1f32);
                let expected = (c
                    + k * (f64::from(u(i + 1, j) + u(i - 1, j)) - 2.0 * c)
                    + k * (f64::from(u(i, j + 1) + u(i, j - 1)) - 2.0 * c))
                    as f32;
                assert_eq!(out[(i, j)], expected, "interior ({i}, {j})");
            }
        }
    }
}

#[test]
fn uniform_field_survives_exchange_unchanged() {
    let cfg = config(4, 4, 4, 9);
    let initial = fixtures::uniform(cfg.dims, 5.0).unwrap();
    let out = run(cfg, &initial);
    assert!(out.as_slice().iter().all(|&v| v == 5.0));
}

#[test]
fn zero_steps_round_trips_the_field() {
    let cfg = config(10, 12, 4, 0);
    let initial = fixtures::ramp(cfg.dims).unwrap();
    compare::assert_fields_identical(&run(cfg, &initial), &initial);
}

#[test]
fn domain_boundary_is_invariant() {
    let cfg = config(12, 12, 9, 25);
    let initial = fixtures::seeded(cfg.dims, 42).unwrap();
    let out = run(cfg, &initial);
    for x in 0..12 {
        for y in 0..12 {
            if x == 0 || y == 0 || x == 11 || y == 11 {
                assert_eq!(out[(x, y)], initial[(x, y)], "({x}, {y})");
            }
        }
    }
}

#[test]
fn truncated_remainder_is_never_simulated() {
    // 5 x 4 over a 2 x 2 block grid: blocks are 2 x 2, row 4 is uncovered.
    let cfg = config(5, 4, 4, 6);
    let cluster = Cluster::new(cfg.clone()).unwrap();
    assert_eq!(cluster.partition().covered(), (4, 4));

    let initial = fixtures::seeded(cfg.dims, 5).unwrap();
    let out = cluster.run(&initial).unwrap().field;
    assert_eq!(out.row(4), initial.row(4));

    // The covered corner evolves as a 4 x 4 field of its own.
    let corner = GlobalField::from_fn(GridDims::new(4, 4), |x, y| initial[(x, y)]).unwrap();
    let expected = reference::advance(&corner, cfg.diffusivity, cfg.steps);
    let got = GlobalField::from_fn(GridDims::new(4, 4), |x, y| out[(x, y)]).unwrap();
    compare::assert_fields_identical(&got, &expected);
}

#[test]
fn report_has_metrics_for_every_rank() {
    let cfg = config(8, 8, 4, 5);
    let initial = fixtures::parabolic(cfg.dims).unwrap();
    let report = Cluster::new(cfg).unwrap().run(&initial).unwrap();
    let ranks: Vec<Rank> = report.workers.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![Rank(0), Rank(1), Rank(2), Rank(3)]);
    assert!(report.workers.iter().all(|m| m.steps == 5));
    // Every block is a corner: two edges of four cells per round, plus
    // the priming round.
    assert!(report.workers.iter().all(|m| m.exchange.values_sent == 6 * 2 * 4));
    assert!(report.max_elapsed_secs() >= 0.0);
}

#[test]
fn prime_worker_count_is_rejected_before_running() {
    let err = Cluster::new(config(8, 8, 7, 1)).unwrap_err();
    assert!(matches!(
        err,
        RunError::Config(ConfigError::Decomp(DecompError::PrimeWorkerCount { workers: 7 }))
    ));
}

#[test]
fn mismatched_initial_field_is_rejected() {
    let cluster = Cluster::new(config(8, 8, 4, 1)).unwrap();
    let wrong = fixtures::ramp(GridDims::new(8, 6)).unwrap();
    assert!(matches!(
        cluster.run(&wrong),
        Err(RunError::Config(ConfigError::FieldShape { .. }))
    ));
}

// ── Random configurations ──────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any accepted configuration evolves its covered corner exactly as
    /// the serial solver does and never touches the remainder.
    #[test]
    fn random_configurations_match_reference(
        workers in prop::sample::select(vec![1usize, 4, 6, 8, 9, 10, 12, 16]),
        short in 1usize..14,
        multiple in 1usize..4,
        tall in any::<bool>(),
        steps in 0u64..8,
        seed in any::<u64>(),
    ) {
        // One axis is a multiple of the worker count, so the cells divide.
        let long = workers * multiple;
        let (nx, ny) = if tall { (short, long) } else { (long, short) };
        let cfg = config(nx, ny, workers, steps);
        let cluster = match Cluster::new(cfg.clone()) {
            Ok(cluster) => cluster,
            Err(RunError::Config(ConfigError::Decomp(DecompError::EmptyBlock { .. }))) => {
                return Err(TestCaseError::reject("empty blocks"));
            }
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };
        let (rows, cols) = cluster.partition().covered();

        let initial = fixtures::seeded(cfg.dims, seed).unwrap();
        let out = cluster.run(&initial).unwrap().field;

        let corner = GlobalField::from_fn(GridDims::new(rows, cols), |x, y| initial[(x, y)]).unwrap();
        let expected = reference::advance(&corner, cfg.diffusivity, steps);
        let got = GlobalField::from_fn(GridDims::new(rows, cols), |x, y| out[(x, y)]).unwrap();
        prop_assert_eq!(compare::first_mismatch(&got, &expected, rows, cols), None);

        for x in 0..nx {
            for y in 0..ny {
                if x >= rows || y >= cols {
                    prop_assert_eq!(out[(x, y)].to_bits(), initial[(x, y)].to_bits());
                }
            }
        }
    }
}
