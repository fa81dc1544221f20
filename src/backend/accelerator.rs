//! Accelerator-style backend: a grid of fixed-size blocks of lanes.
//!
//! The launch mirrors a GPU kernel: `nblock = ceil(ncell / block_size)`
//! blocks of `block_size` lanes each, one lane per cell index
//! `icl = iblk * block_size + ithr`. Lanes past `ncell` do nothing. Every
//! lane owns its scratch, and lane results land in a staging buffer that is
//! only copied to the output after all blocks have joined, which plays the
//! role of the device synchronization before results become visible.
//!
//! Blocks are scheduled onto rayon workers.

use log::trace;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::{BackendError, ExecutionBackend};

/// Largest supported number of lanes per block.
pub const MAX_BLOCK_SIZE: usize = 1024;

/// Largest number of blocks in one launch.
pub const MAX_GRID_BLOCKS: usize = i32::MAX as usize;

/// Default number of lanes per block.
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Block/lane grid backend.
#[derive(Debug)]
pub struct Accelerator {
    block_size: usize,
    pool: Option<ThreadPool>,
}

impl Default for Accelerator {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            pool: None,
        }
    }
}

impl Accelerator {
    /// Create a backend launching blocks of `block_size` lanes.
    pub fn new(block_size: usize) -> Result<Self, BackendError> {
        if block_size == 0 || block_size > MAX_BLOCK_SIZE {
            return Err(BackendError::InvalidBlockSize {
                block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        Ok(Self {
            block_size,
            pool: None,
        })
    }

    /// Run blocks on a dedicated pool of `nthreads` workers.
    pub fn with_threads(mut self, nthreads: usize) -> Result<Self, BackendError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .thread_name(|i| format!("cese-block-{i}"))
            .build()
            .map_err(BackendError::pool_init)?;
        self.pool = Some(pool);
        Ok(self)
    }

    /// Lanes per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks needed to cover `ncell` cells.
    pub fn grid_size(&self, ncell: usize) -> usize {
        ncell.div_ceil(self.block_size)
    }
}

fn launch<R, S, I, K>(staging: &mut [Option<R>], block_size: usize, ncell: usize, init: I, kernel: K)
where
    R: Send,
    I: Fn() -> S + Sync + Send,
    K: Fn(usize, &mut S) -> R + Sync + Send,
{
    staging
        .par_chunks_mut(block_size)
        .enumerate()
        .for_each(|(iblk, lanes)| {
            for (ithr, lane) in lanes.iter_mut().enumerate() {
                let icl = iblk * block_size + ithr;
                if icl < ncell {
                    let mut scratch = init();
                    *lane = Some(kernel(icl, &mut scratch));
                }
            }
        });
}

impl ExecutionBackend for Accelerator {
    fn name(&self) -> &'static str {
        "accelerator"
    }

    fn map_cells<R, S, I, K>(&self, out: &mut [R], init: I, kernel: K) -> Result<(), BackendError>
    where
        R: Send,
        I: Fn() -> S + Sync + Send,
        K: Fn(usize, &mut S) -> R + Sync + Send,
    {
        let ncell = out.len();
        let nblock = self.grid_size(ncell);
        if nblock > MAX_GRID_BLOCKS {
            return Err(BackendError::GridTooLarge {
                nblock,
                max: MAX_GRID_BLOCKS,
            });
        }
        trace!(
            "accelerator launch: {} blocks x {} lanes for {} cells",
            nblock, self.block_size, ncell
        );

        let mut staging: Vec<Option<R>> = Vec::with_capacity(nblock * self.block_size);
        staging.resize_with(nblock * self.block_size, || None);
        let block_size = self.block_size;
        match &self.pool {
            Some(pool) => pool.install(|| launch(&mut staging, block_size, ncell, init, kernel)),
            None => launch(&mut staging, block_size, ncell, init, kernel),
        }

        for (slot, lane) in out.iter_mut().zip(staging) {
            if let Some(value) = lane {
                *slot = value;
            }
        }
        Ok(())
    }
}
