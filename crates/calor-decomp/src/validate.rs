//! Launch-time checks on the worker count.

use calor_core::GridDims;

use crate::error::DecompError;

/// Trial-division primality test. `0` and `1` are not prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Reject worker counts that cannot drive a run over `dims`.
///
/// Checks, in order: at least one worker, not prime, `NX * NY`
/// addressable, and `NX * NY` divisible by the count. Empty blocks are caught by [`Partition::new`]
/// once the block grid is known.
///
/// [`Partition::new`]: crate::Partition::new
pub fn validate_worker_count(dims: GridDims, workers: usize) -> Result<(), DecompError> {
    if workers == 0 {
        return Err(DecompError::NoWorkers);
    }
    if is_prime(workers) {
        return Err(DecompError::PrimeWorkerCount { workers });
    }
    let cells = dims
        .cell_count()
        .ok_or(DecompError::GridTooLarge { dims })?;
    if cells % workers != 0 {
        return Err(DecompError::IndivisibleCells { cells, workers });
    }
    Ok(())
}
