//! Half-step volume update.
//!
//! `soln[icl][ieq] = sol[icl][ieq] + clvol[icl] · Δt/2` for every interior
//! cell and equation. The volume term is added as-is, independent of the
//! equation; ghost slots are not written and no neighbor is read.

use log::{debug, warn};

use crate::backend::ExecutionBackend;
use crate::mesh::MeshBlock;
use crate::types::SpaceDim;

use super::config::{CeseConfig, FloatingPointMode};
use super::core::{CeseState, CellField};
use super::diagnostics::first_non_finite;
use super::SolverError;

/// Half-step kernel for interior cell `icl`.
#[inline]
pub fn half_step_cell<const NEQ: usize>(
    icl: usize,
    sol: &CellField<[f64; NEQ]>,
    clvol: &CellField<f64>,
    hdt: f64,
) -> [f64; NEQ] {
    let ic = icl as isize;
    let increment = clvol[ic] * hdt;
    let mut out = sol[ic];
    for value in out.iter_mut() {
        *value += increment;
    }
    out
}

/// Run the half-step update over all interior cells.
pub fn compute_half_step<B, D, const NEQ: usize>(
    backend: &B,
    mesh: &MeshBlock<D>,
    state: &mut CeseState<D, NEQ>,
    config: &CeseConfig,
) -> Result<(), SolverError>
where
    B: ExecutionBackend,
    D: SpaceDim,
{
    debug!(
        "calc_half_step: {} cells on {} backend",
        mesh.ncell(),
        backend.name()
    );
    let hdt = config.half_dt();
    let sol = &state.sol;
    let clvol = &mesh.geom.clvol;
    backend.map_cells(state.soln.interior_mut(), || (), |icl, _| {
        half_step_cell(icl, sol, clvol, hdt)
    })?;

    if config.fp_mode == FloatingPointMode::Trap {
        if let Some(cell) = first_non_finite(state.soln.interior()) {
            warn!("calc_half_step: non-finite result at cell {}", cell);
            return Err(SolverError::NumericalFault {
                pass: "calc_half_step",
                cell,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Serial;
    use crate::mesh::{BoundaryKind, CartesianMesh};
    use crate::types::Dim2;

    #[test]
    fn test_adds_volume_term_to_every_equation() {
        let mesh = CartesianMesh::quads(2, 2, [4.0, 2.0], BoundaryKind::Mirror).unwrap();
        let mut state = CeseState::<Dim2, 3>::for_mesh(&mesh, 1);
        state.sol.fill([1.0, 2.0, 3.0]);
        state.soln.fill([0.0; 3]);
        compute_half_step(&Serial, &mesh, &mut state, &CeseConfig::new(0.5)).unwrap();
        // clvol = 2, dt/2 = 0.25
        for icl in 0..4 {
            assert_eq!(state.soln[icl], [1.5, 2.5, 3.5]);
        }
        assert_eq!(state.soln[-1], [0.0; 3]);
    }

    #[test]
    fn test_zero_increment_copies_sol() {
        let mesh = CartesianMesh::quads(1, 1, [1.0, 1.0], BoundaryKind::Mirror).unwrap();
        let mut state = CeseState::<Dim2, 2>::for_mesh(&mesh, 1);
        state.sol.fill([4.0, -1.0]);
        compute_half_step(&Serial, &mesh, &mut state, &CeseConfig::new(0.0)).unwrap();
        assert_eq!(state.soln[0], [4.0, -1.0]);
    }
}
