//! Core state containers for the CESE passes.
//!
//! - [`CellField`]: per-cell values with ghost cells at negative indices
//! - [`ScalarTable`]: per-cell auxiliary scalars (`amsca`)
//! - [`CeseState`]: the full set of arrays mutated by the march
//! - [`StateView`]: the read-only slice of the state given to providers

pub mod cell_field;
mod state;

pub use cell_field::{CellField, ScalarTable};
pub(crate) use state::{check_gas_layout, check_scalar_count};
pub use state::{ALMOST_ZERO, CeseState, GasState, Gradient, StateView};
