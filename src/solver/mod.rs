//! CESE marching passes.
//!
//! # Submodules
//!
//! - [`core`]: Cell fields and the mutable solution state
//! - [`jacobian`]: Flux-Jacobian provider contract and the linear provider
//! - [`euler`]: Ideal-gas Euler provider
//! - [`cfl`]: CFL estimation with pressure floor
//! - [`cese`]: CESE flux integration
//! - [`half_step`]: Half-step volume update
//! - [`diagnostics`]: Conservation totals and finiteness scans
//!
//! # Passes
//!
//! Each pass is a per-cell kernel (`estimate_cell`, `integrate_cell`,
//! `half_step_cell`) plus a driver (`compute_cfl`, `compute_soln`,
//! `compute_half_step`) that runs it on an
//! [`ExecutionBackend`](crate::backend::ExecutionBackend). The kernels read
//! only shared inputs and return the output record of their own cell, so the
//! drivers are free to schedule cells in any order.
//!
//! [`CeseSolver`] bundles mesh, provider, backend and configuration, validates
//! them once, and times every pass.

pub mod cese;
pub mod cfl;
mod config;
pub mod core;
pub mod diagnostics;
mod error;
pub mod euler;
pub mod half_step;
pub mod jacobian;
mod marcher;

pub use cese::{CeseScratch, compute_soln, integrate_cell};
pub use cfl::{CflOutcome, CflReport, compute_cfl, estimate_cell};
pub use config::{CeseConfig, FloatingPointMode, SOLVCON_TINY};
pub use core::{CeseState, CellField, GasState, ScalarTable, StateView};
pub use diagnostics::{AllFinite, ce_volumes, conserved_totals, first_non_finite};
pub use error::SolverError;
pub use euler::EulerJacobian;
pub use half_step::{compute_half_step, half_step_cell};
pub use jacobian::{ConstantJacobian, Flux, FluxJacobian, Jacobian, zero_flux, zero_jacobian};
pub use marcher::{CeseSolver, PassTimer, PassTiming};
