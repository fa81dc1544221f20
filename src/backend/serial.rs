//! Single-threaded reference backend.

use super::{BackendError, ExecutionBackend};

/// Runs the kernel over cells `0..ncell` in ascending order on the caller's
/// thread, with a single scratch value reused for every cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct Serial;

impl ExecutionBackend for Serial {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn map_cells<R, S, I, K>(&self, out: &mut [R], init: I, kernel: K) -> Result<(), BackendError>
    where
        R: Send,
        I: Fn() -> S + Sync + Send,
        K: Fn(usize, &mut S) -> R + Sync + Send,
    {
        let mut scratch = init();
        for (icl, slot) in out.iter_mut().enumerate() {
            *slot = kernel(icl, &mut scratch);
        }
        Ok(())
    }
}
