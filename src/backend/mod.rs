//! Execution backends driving per-cell kernels over the cell index space.
//!
//! A pass is an embarrassingly parallel map: for every interior cell
//! `icl in 0..ncell` the kernel computes one output record from shared,
//! read-only inputs. Backends only differ in how they schedule those calls:
//!
//! - [`Serial`]: ascending loop on the calling thread
//! - [`HostParallel`]: rayon worker pool, per-worker scratch (`parallel` feature)
//! - [`Accelerator`]: grid of fixed-size blocks, per-lane scratch (`accelerator` feature)
//!
//! Since each output slot is written by exactly one kernel call and the
//! kernel is a pure function of its inputs, every backend produces the same
//! results in the same slots.

mod error;
mod serial;

#[cfg(feature = "accelerator")]
mod accelerator;
#[cfg(feature = "parallel")]
mod host;

pub use error::BackendError;
pub use serial::Serial;

#[cfg(feature = "accelerator")]
pub use accelerator::{Accelerator, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE, MAX_GRID_BLOCKS};
#[cfg(feature = "parallel")]
pub use host::HostParallel;

/// A strategy for applying a per-cell kernel to every cell of a pass.
pub trait ExecutionBackend: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Fill `out[icl] = kernel(icl, scratch)` for every `icl in 0..out.len()`.
    ///
    /// `init` creates a private scratch value for each execution unit
    /// (the calling thread, a worker, or a lane). The call returns only after
    /// every cell has been processed.
    fn map_cells<R, S, I, K>(&self, out: &mut [R], init: I, kernel: K) -> Result<(), BackendError>
    where
        R: Send,
        I: Fn() -> S + Sync + Send,
        K: Fn(usize, &mut S) -> R + Sync + Send;
}

/// Backend selected by the enabled cargo features.
#[cfg(feature = "accelerator")]
pub type DefaultBackend = Accelerator;

/// Backend selected by the enabled cargo features.
#[cfg(all(feature = "parallel", not(feature = "accelerator")))]
pub type DefaultBackend = HostParallel;

/// Backend selected by the enabled cargo features.
#[cfg(not(any(feature = "parallel", feature = "accelerator")))]
pub type DefaultBackend = Serial;

#[cfg(test)]
mod tests {
    use super::*;

    fn squares<B: ExecutionBackend>(backend: &B, n: usize) -> Vec<f64> {
        let mut out = vec![0.0; n];
        backend
            .map_cells(&mut out, || 0usize, |icl, calls| {
                *calls += 1;
                (icl * icl) as f64
            })
            .unwrap();
        out
    }

    #[test]
    fn test_serial_fills_every_slot() {
        let out = squares(&Serial, 5);
        assert_eq!(out, vec![0.0, 1.0, 4.0, 9.0, 16.0]);
    }

    #[test]
    fn test_empty_pass() {
        assert!(squares(&Serial, 0).is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_host_matches_serial() {
        let host = HostParallel::with_threads(3).unwrap().with_min_len(4);
        assert_eq!(host.num_threads(), 3);
        assert_eq!(squares(&host, 1000), squares(&Serial, 1000));
    }

    #[cfg(feature = "accelerator")]
    #[test]
    fn test_accelerator_partial_last_block() {
        let acc = Accelerator::new(32).unwrap();
        assert_eq!(acc.grid_size(100), 4);
        assert_eq!(squares(&acc, 100), squares(&Serial, 100));
    }

    #[cfg(feature = "accelerator")]
    #[test]
    fn test_accelerator_rejects_block_size() {
        assert_eq!(
            Accelerator::new(0).unwrap_err(),
            BackendError::InvalidBlockSize {
                block_size: 0,
                max: MAX_BLOCK_SIZE
            }
        );
        assert!(Accelerator::new(MAX_BLOCK_SIZE + 1).is_err());
        assert!(Accelerator::new(MAX_BLOCK_SIZE).is_ok());
    }
}
