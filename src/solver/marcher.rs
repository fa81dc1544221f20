//! Stage driver tying mesh, provider, backend and configuration together.
//!
//! # Example
//!
//! ```
//! use cese_rs::{BoundaryKind, CartesianMesh, CeseConfig, CeseSolver, Dim2, EulerJacobian, GasState, Serial};
//!
//! let mesh = CartesianMesh::quads(4, 4, [1.0, 1.0], BoundaryKind::Periodic).unwrap();
//! let mut solver = CeseSolver::<_, _, _, 4>::new(mesh, EulerJacobian, Serial, CeseConfig::new(1e-3)).unwrap();
//! let mut state = solver.new_state(1);
//! state.fill_uniform(&GasState::<Dim2>::new(1.0, [0.5, 0.0], 1.0), 1.4).unwrap();
//!
//! let report = solver.march_stage(&mut state).unwrap();
//! assert!(report.max_ocfl < 1.0);
//! state.swap();
//! ```

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::backend::ExecutionBackend;
use crate::mesh::MeshBlock;
use crate::types::SpaceDim;

use super::cese::compute_soln;
use super::cfl::{compute_cfl, CflOutcome, CflReport};
use super::config::CeseConfig;
use super::core::CeseState;
use super::half_step::compute_half_step;
use super::jacobian::FluxJacobian;
use super::SolverError;

/// Accumulated wall time of one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassTiming {
    /// Number of completed calls.
    pub calls: usize,
    /// Total wall time over all calls.
    pub total: Duration,
}

impl PassTiming {
    /// Average wall time per call.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls as u32
        }
    }
}

/// Wall time per pass name.
#[derive(Clone, Debug, Default)]
pub struct PassTimer {
    passes: BTreeMap<&'static str, PassTiming>,
}

impl PassTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` and charge its wall time to `pass`.
    pub fn time<T>(&mut self, pass: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(pass, start.elapsed());
        out
    }

    /// Add one call of duration `elapsed` to `pass`.
    pub fn record(&mut self, pass: &'static str, elapsed: Duration) {
        let entry = self.passes.entry(pass).or_default();
        entry.calls += 1;
        entry.total += elapsed;
    }

    /// Timing of `pass`, if it ran at least once.
    pub fn get(&self, pass: &str) -> Option<&PassTiming> {
        self.passes.get(pass)
    }

    /// All recorded passes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PassTiming)> {
        self.passes.iter().map(|(name, timing)| (*name, timing))
    }

    /// Forget all recorded timings.
    pub fn reset(&mut self) {
        self.passes.clear();
    }
}

/// Explicit CESE marcher over one mesh block.
///
/// Passes run in the order the caller invokes them; a stage is
/// [`march_stage`](Self::march_stage) (integrator, then CFL on the new
/// state). Swapping levels, halo exchange and gradient reconstruction happen
/// outside, between stages.
pub struct CeseSolver<D: SpaceDim, P, B, const NEQ: usize> {
    mesh: MeshBlock<D>,
    provider: P,
    backend: B,
    config: CeseConfig,
    outcomes: Vec<CflOutcome>,
    timer: PassTimer,
    total_adjusted: usize,
}

impl<D, P, B, const NEQ: usize> CeseSolver<D, P, B, NEQ>
where
    D: SpaceDim,
    P: FluxJacobian<D, NEQ>,
    B: ExecutionBackend,
{
    /// Validate the inputs once and build the marcher.
    pub fn new(mesh: MeshBlock<D>, provider: P, backend: B, config: CeseConfig) -> Result<Self, SolverError> {
        config.validate()?;
        mesh.validate()?;
        if let Some(expected) = provider.required_neq() {
            if expected != NEQ {
                return Err(SolverError::ProviderMismatch {
                    expected,
                    actual: NEQ,
                });
            }
        }
        debug!(
            "CESE solver: {}D, {} equations, {} cells, {} ghosts, {} backend",
            D::NDIM,
            NEQ,
            mesh.ncell(),
            mesh.ngstcell(),
            backend.name()
        );
        Ok(Self {
            outcomes: Vec::with_capacity(mesh.ncell()),
            mesh,
            provider,
            backend,
            config,
            timer: PassTimer::new(),
            total_adjusted: 0,
        })
    }

    pub fn mesh(&self) -> &MeshBlock<D> {
        &self.mesh
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CeseConfig {
        &self.config
    }

    /// Change the time increment used by subsequent passes.
    pub fn set_time_increment(&mut self, time_increment: f64) -> Result<(), SolverError> {
        let config = self.config.with_time_increment(time_increment);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Allocate a state matching the mesh.
    pub fn new_state(&self, nsca: usize) -> CeseState<D, NEQ> {
        CeseState::for_mesh(&self.mesh, nsca)
    }

    /// CFL pass over `state.soln`.
    ///
    /// The returned report carries the number of adjusted cells accumulated
    /// over every CFL pass of this solver.
    pub fn calc_cfl(&mut self, state: &mut CeseState<D, NEQ>) -> Result<CflReport, SolverError> {
        state.check_layout(&self.mesh)?;
        let Self {
            mesh,
            backend,
            config,
            outcomes,
            timer,
            ..
        } = &mut *self;
        let mut report = timer.time("calc_cfl", || compute_cfl(backend, mesh, state, config, outcomes))?;
        self.total_adjusted += report.n_adjusted;
        report.total_adjusted = self.total_adjusted;
        Ok(report)
    }

    /// Integrator pass: `soln` from `sol`, `dsol` and `solt`.
    pub fn calc_soln(&mut self, state: &mut CeseState<D, NEQ>) -> Result<(), SolverError> {
        state.check_layout(&self.mesh)?;
        let Self {
            mesh,
            provider,
            backend,
            config,
            timer,
            ..
        } = &mut *self;
        timer.time("calc_soln", || compute_soln(backend, mesh, state, provider, config))
    }

    /// Half-step volume update: `soln = sol + clvol · Δt/2`.
    pub fn calc_half_step(&mut self, state: &mut CeseState<D, NEQ>) -> Result<(), SolverError> {
        state.check_layout(&self.mesh)?;
        let Self {
            mesh,
            backend,
            config,
            timer,
            ..
        } = &mut *self;
        timer.time("calc_half_step", || compute_half_step(backend, mesh, state, config))
    }

    /// One stage: integrate into `soln`, then estimate CFL on it.
    pub fn march_stage(&mut self, state: &mut CeseState<D, NEQ>) -> Result<CflReport, SolverError> {
        self.calc_soln(state)?;
        self.calc_cfl(state)
    }

    /// Per-pass wall time.
    pub fn timer(&self) -> &PassTimer {
        &self.timer
    }

    /// Cells adjusted by the pressure floor over all CFL passes.
    pub fn total_adjusted(&self) -> usize {
        self.total_adjusted
    }
}
