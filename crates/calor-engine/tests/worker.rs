//! Lifecycle, halo timing, and failure behavior of individual workers.

use std::thread;
use std::time::Duration;

use calor_comm::{world, ExchangeError, HaloExchangeEngine};
use calor_core::{BlockGrid, BlockShape, Direction, GridDims, PartitionAssignment, Rank, StepId};
use calor_engine::{Phase, RunError, SimConfig, SimulationLoop};
use calor_grid::HaloBuffer;
use calor_stencil::HeatStencil;
use calor_test_utils::fixtures;

fn small(workers: usize, timeout: Option<Duration>) -> SimConfig {
    SimConfig {
        dims: GridDims::new(6, 6),
        steps: 3,
        workers,
        threads: 1,
        liveness_timeout: timeout,
        ..SimConfig::default()
    }
}

#[test]
fn phases_advance_setup_step_done() {
    let cfg = small(1, Some(Duration::from_secs(5)));
    let initial = fixtures::parabolic(cfg.dims).unwrap();
    let comm = world(1, cfg.liveness_timeout).pop().unwrap();
    let mut worker = SimulationLoop::new(comm, cfg).unwrap();

    assert_eq!(worker.phase(), Phase::Setup);
    assert!(matches!(
        worker.step(),
        Err(RunError::InvalidPhase { .. })
    ));
    worker.setup(Some(&initial)).unwrap();
    assert_eq!(worker.phase(), Phase::Step { completed: 0 });
    assert_eq!(
        worker.assignment().unwrap().shape,
        BlockShape::new(6, 6)
    );

    worker.step().unwrap();
    worker.step().unwrap();
    assert_eq!(worker.phase(), Phase::Step { completed: 2 });
    assert_eq!(worker.buffer().unwrap().flips(), 2);

    let out = worker.finish(Some(initial.clone())).unwrap();
    assert_eq!(out.metrics.steps, 2);
    assert_eq!(out.metrics.exchange.rounds, 3);
    assert!(out.field.is_some());
}

#[test]
fn coordinator_without_initial_field_fails() {
    let cfg = small(1, Some(Duration::from_secs(5)));
    let comm = world(1, cfg.liveness_timeout).pop().unwrap();
    let worker = SimulationLoop::new(comm, cfg).unwrap();
    assert!(matches!(
        worker.run(None),
        Err(RunError::MissingInitialField)
    ));
}

#[test]
fn silent_peer_is_a_liveness_fault() {
    let cfg = small(4, Some(Duration::from_millis(50)));
    let initial = fixtures::parabolic(cfg.dims).unwrap();
    let mut comms = world(4, cfg.liveness_timeout);
    let root = comms.remove(0);
    // Ranks 1..3 exist but never run.
    let err = SimulationLoop::new(root, cfg)
        .unwrap()
        .run(Some(&initial))
        .unwrap_err();
    assert!(
        matches!(err, RunError::Exchange(ExchangeError::Stalled { rank: Rank(0), .. })),
        "{err:?}"
    );
    drop(comms);
}

#[test]
fn failed_peer_aborts_the_world() {
    let cfg = small(4, None);
    let mut comms = world(4, cfg.liveness_timeout);
    let member = comms.remove(1);
    let member_cfg = cfg.clone();
    let h = thread::spawn(move || SimulationLoop::new(member, member_cfg).unwrap().run(None));

    // The coordinator dies before sending any assignment.
    thread::sleep(Duration::from_millis(20));
    drop(comms);

    let err = h.join().unwrap().unwrap_err();
    assert!(
        matches!(err, RunError::Exchange(ExchangeError::Aborted { rank: Rank(1) })),
        "{err:?}"
    );
}

/// Each worker records, per step, the boundary it sends towards its
/// peer (read at the start of the step) and the halo it holds from that
/// peer after the inbound wait.
fn stepped_worker(
    mut comm: calor_comm::Communicator,
    grid: BlockGrid,
    shape: BlockShape,
    initial: Vec<f32>,
    steps: u64,
) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let rank = comm.rank();
    let assignment = PartitionAssignment {
        grid,
        shape,
        neighbors: grid.neighbors_of(rank).unwrap(),
    };
    let (towards, from) = if rank == Rank(0) {
        (Direction::Right, Direction::Right)
    } else {
        (Direction::Left, Direction::Left)
    };
    let stencil = HeatStencil::new(Default::default());
    let mut buffer = HaloBuffer::new(shape).unwrap();
    buffer.current_mut().load_interior(&initial).unwrap();
    buffer.sync_next().unwrap();
    let mut engine = HaloExchangeEngine::new(rank, &assignment);

    let mut sent = Vec::new();
    let mut held = Vec::new();
    let mut step = StepId::PRIME;
    for _ in 0..steps {
        step = step.next();
        sent.push(buffer.current().boundary(towards).unwrap());
        engine.start_all(&comm, buffer.current(), step).unwrap();
        {
            let (cur, next) = buffer.split();
            stencil.interior(cur, next);
        }
        engine.wait_inbound(&mut comm, buffer.current_mut()).unwrap();
        held.push(buffer.current().halo(from).unwrap());
        {
            let (cur, next) = buffer.split();
            stencil.exterior(cur, next, &assignment.neighbors);
        }
        engine.wait_outbound().unwrap();
        buffer.flip();
    }
    engine.release().unwrap();
    comm.close();
    (sent, held)
}

#[test]
fn halo_holds_the_neighbors_previous_step_boundary() {
    let grid = BlockGrid::new(1, 2);
    let shape = BlockShape::new(4, 4);
    let field = fixtures::seeded(GridDims::new(4, 8), 9).unwrap();
    let block = |c0: usize| -> Vec<f32> {
        (0..4)
            .flat_map(|x| (c0..c0 + 4).map(move |y| (x, y)))
            .map(|(x, y)| field[(x, y)])
            .collect()
    };
    let (left_init, right_init) = (block(0), block(4));

    let mut comms = world(2, Some(Duration::from_secs(5)));
    let right_comm = comms.pop().unwrap();
    let left_comm = comms.pop().unwrap();
    let left = thread::spawn(move || stepped_worker(left_comm, grid, shape, left_init, 6));
    let right = thread::spawn(move || stepped_worker(right_comm, grid, shape, right_init, 6));
    let (left_sent, left_held) = left.join().unwrap();
    let (right_sent, right_held) = right.join().unwrap();

    for k in 0..6 {
        assert_eq!(left_held[k], right_sent[k], "left halo, step {}", k + 1);
        assert_eq!(right_held[k], left_sent[k], "right halo, step {}", k + 1);
    }
    // The boundary moves, so matching step k rules out step k + 1.
    assert_ne!(left_sent[0], left_sent[5]);
}
