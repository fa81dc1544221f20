//! # cese-rs
//!
//! The explicit time-marching core of an unstructured-mesh CESE
//! (space-time Conservation Element / Solution Element) solver for
//! hyperbolic conservation laws.
//!
//! This crate provides the per-cell passes of a two-stage march:
//! - CFL estimation with a pressure floor (ideal-gas dynamics)
//! - CESE flux integration through a pluggable flux-Jacobian provider
//! - A half-step volume update
//!
//! and the execution backends that drive them over the cell index space:
//! serial, a multi-core host pool (`parallel` feature) and an
//! accelerator-style block/lane grid (`accelerator` feature). All backends
//! produce the same per-cell results.
//!
//! Mesh construction, halo exchange and time-step selection are left to the
//! caller; [`mesh::CartesianMesh`] builds small reference blocks.

pub mod backend;
pub mod mesh;
pub mod solver;
pub mod types;

// Backends
pub use backend::{BackendError, DefaultBackend, ExecutionBackend, Serial};
#[cfg(feature = "accelerator")]
pub use backend::Accelerator;
#[cfg(feature = "parallel")]
pub use backend::HostParallel;

// Mesh
pub use mesh::{
    BoundaryKind, CartesianMesh, CeseGeometry, GhostKind, MeshBlock, MeshBuilder,
    MeshConnectivity, MeshError, SubFace, CLMFC, FCMND, FCREL,
};

// Solver
pub use solver::{
    CeseConfig, CeseSolver, CeseState, CellField, CflReport, ConstantJacobian, EulerJacobian,
    FloatingPointMode, Flux, FluxJacobian, GasState, Jacobian, PassTimer, ScalarTable,
    SolverError, StateView, compute_cfl, compute_half_step, compute_soln, conserved_totals,
};

// Types
pub use types::{Dim2, Dim3, SpaceDim};
