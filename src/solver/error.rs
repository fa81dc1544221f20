//! Error types for the marching passes.

use thiserror::Error;

use crate::backend::BackendError;
use crate::mesh::MeshError;

/// Errors returned by solver passes and their setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// State arrays do not match the mesh they are used with.
    #[error("State layout mismatch: {field} has {actual} cells, mesh expects {expected}")]
    StateMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The equation count does not fit the gas-dynamics layout.
    #[error("Gas dynamics needs {expected} equations in {ndim}D, state has {actual}")]
    EquationCount {
        ndim: usize,
        expected: usize,
        actual: usize,
    },

    /// The state carries fewer auxiliary scalars per cell than a pass reads.
    #[error("Pass `{pass}` reads {expected} auxiliary scalars per cell, state has {actual}")]
    ScalarCount {
        pass: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A flux-Jacobian provider was built for a different equation count.
    #[error("Flux-Jacobian provider expects {expected} equations, state has {actual}")]
    ProviderMismatch { expected: usize, actual: usize },

    /// A non-finite value was produced while floating-point trapping is on.
    #[error("Numerical fault in pass `{pass}` at cell {cell}")]
    NumericalFault { pass: &'static str, cell: usize },

    /// Mesh validation failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The execution backend failed to run a pass.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SolverError {
    /// Create an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
