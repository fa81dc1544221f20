//! Multi-core host backend on a rayon worker pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{BackendError, ExecutionBackend};

/// Parallel loop over cells on a fixed-size worker pool.
///
/// Each worker creates its own scratch through the `init` closure the first
/// time it picks up work and reuses it for every cell it processes. Cells are
/// distributed by rayon's work stealing, so the cell-to-worker assignment
/// differs between runs; results do not.
#[derive(Debug)]
pub struct HostParallel {
    /// Dedicated pool, or `None` to run on rayon's global pool.
    pool: Option<ThreadPool>,
    /// Minimum number of consecutive cells handed to one worker.
    min_len: usize,
}

impl Default for HostParallel {
    fn default() -> Self {
        Self::new()
    }
}

impl HostParallel {
    /// Use rayon's global pool.
    pub fn new() -> Self {
        Self {
            pool: None,
            min_len: 1,
        }
    }

    /// Build a dedicated pool with `nthreads` workers.
    pub fn with_threads(nthreads: usize) -> Result<Self, BackendError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .thread_name(|i| format!("cese-worker-{i}"))
            .build()
            .map_err(BackendError::pool_init)?;
        Ok(Self {
            pool: Some(pool),
            min_len: 1,
        })
    }

    /// Set the minimum chunk of consecutive cells per work item.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self
    }

    /// Number of workers the pass will run on.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

fn run<R, S, I, K>(out: &mut [R], min_len: usize, init: I, kernel: K)
where
    R: Send,
    I: Fn() -> S + Sync + Send,
    K: Fn(usize, &mut S) -> R + Sync + Send,
{
    out.par_iter_mut()
        .enumerate()
        .with_min_len(min_len)
        .for_each_init(init, |scratch, (icl, slot)| {
            *slot = kernel(icl, scratch);
        });
}

impl ExecutionBackend for HostParallel {
    fn name(&self) -> &'static str {
        "host"
    }

    fn map_cells<R, S, I, K>(&self, out: &mut [R], init: I, kernel: K) -> Result<(), BackendError>
    where
        R: Send,
        I: Fn() -> S + Sync + Send,
        K: Fn(usize, &mut S) -> R + Sync + Send,
    {
        let min_len = self.min_len;
        match &self.pool {
            Some(pool) => pool.install(|| run(out, min_len, init, kernel)),
            None => run(out, min_len, init, kernel),
        }
        Ok(())
    }
}
