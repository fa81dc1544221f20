//! CESE flux integration.
//!
//! The new state of interior cell `icl` is the space-time flux balance over
//! its conservation elements. For every face slot `ifl` with neighbor `jcl`:
//!
//! - the spatial flux is the neighbor's Taylor-expanded solution at the CE
//!   centroid times the CE volume,
//!   `(sol[jcl] + (cecnd[icl][ifl] - cecnd[jcl][0]) · dsol[jcl]) · cevol[icl][ifl]`;
//! - the temporal flux is integrated over each lateral sub-face with the
//!   linearized flux `fcn + jacos · usfc`, where
//!   `usfc = (Δt/4) solt[jcl] + (mid - cecnd[jcl][0]) · dsol[jcl]`.
//!
//! The accumulated balance is divided by the total CE volume
//! `cevol[icl][0]`.

use log::{debug, warn};

use crate::backend::ExecutionBackend;
use crate::mesh::MeshBlock;
use crate::types::{dot, sub, SpaceDim};

use super::config::{CeseConfig, FloatingPointMode};
use super::core::{check_scalar_count, CeseState, StateView};
use super::diagnostics::first_non_finite;
use super::jacobian::{zero_flux, zero_jacobian, Flux, FluxJacobian, Jacobian};
use super::SolverError;

/// Private working memory of one execution unit.
#[derive(Clone, Copy, Debug)]
pub struct CeseScratch<D: SpaceDim, const NEQ: usize> {
    pub fcn: Flux<D, NEQ>,
    pub jacos: Jacobian<D, NEQ>,
    pub dfcn: Flux<D, NEQ>,
    pub usfc: [f64; NEQ],
}

impl<D: SpaceDim, const NEQ: usize> Default for CeseScratch<D, NEQ> {
    fn default() -> Self {
        Self {
            fcn: zero_flux::<D, NEQ>(),
            jacos: zero_jacobian::<D, NEQ>(),
            dfcn: zero_flux::<D, NEQ>(),
            usfc: [0.0; NEQ],
        }
    }
}

/// Integrate the flux balance of interior cell `icl`.
#[inline]
pub fn integrate_cell<D, P, const NEQ: usize>(
    icl: usize,
    mesh: &MeshBlock<D>,
    view: &StateView<'_, D, NEQ>,
    provider: &P,
    config: &CeseConfig,
    scratch: &mut CeseScratch<D, NEQ>,
) -> [f64; NEQ]
where
    D: SpaceDim,
    P: FluxJacobian<D, NEQ> + ?Sized,
{
    let qdt = config.quarter_dt();
    let hdt = config.half_dt();
    let conn = &mesh.conn;
    let geom = &mesh.geom;
    let ic = icl as isize;
    let cecnd = &geom.cecnd[ic];
    let cevol = &geom.cevol[ic];

    let mut soln = [0.0; NEQ];
    for (slot, &ifc) in conn.cell_faces(icl).iter().enumerate() {
        let ifl = slot + 1;
        let jcl = conn.neighbor(ifc, ic);
        let jcecnd = &geom.cecnd[jcl][0];
        let jsol = &view.sol[jcl];
        let jdsol = &view.dsol[jcl];
        let jsolt = &view.solt[jcl];

        // Spatial flux at the given time.
        let disp = sub::<D>(&cecnd[ifl], jcecnd);
        for ieq in 0..NEQ {
            let fusp = jsol[ieq] + dot::<D>(&disp, &jdsol[ieq]);
            soln[ieq] += fusp * cevol[ifl];
        }

        // Temporal flux through the sub-faces.
        provider.evaluate(view, jcl, &mut scratch.fcn, &mut scratch.jacos);
        for subface in &geom.sfmrc[icl][slot][..conn.face_node_count(ifc)] {
            let disp = sub::<D>(&subface.mid, jcecnd);
            for ieq in 0..NEQ {
                scratch.usfc[ieq] = qdt * jsolt[ieq] + dot::<D>(&disp, &jdsol[ieq]);
            }
            for ieq in 0..NEQ {
                let mut dfcn = scratch.fcn[ieq];
                for jeq in 0..NEQ {
                    for d in 0..D::NDIM {
                        dfcn[d] += scratch.jacos[ieq][jeq][d] * scratch.usfc[jeq];
                    }
                }
                scratch.dfcn[ieq] = dfcn;
            }
            for ieq in 0..NEQ {
                soln[ieq] -= hdt * dot::<D>(&scratch.dfcn[ieq], &subface.normal);
            }
        }
    }

    for value in soln.iter_mut() {
        *value /= cevol[0];
    }
    soln
}

/// Run the integrator over all interior cells, writing `soln` from `sol`,
/// `dsol` and `solt`.
///
/// Ghost slots of `soln` are left untouched. In
/// [`FloatingPointMode::Trap`] a non-finite result aborts with the lowest
/// offending cell; `soln` contents are then unspecified.
pub fn compute_soln<B, D, P, const NEQ: usize>(
    backend: &B,
    mesh: &MeshBlock<D>,
    state: &mut CeseState<D, NEQ>,
    provider: &P,
    config: &CeseConfig,
) -> Result<(), SolverError>
where
    B: ExecutionBackend,
    D: SpaceDim,
    P: FluxJacobian<D, NEQ> + ?Sized,
{
    check_scalar_count("calc_soln", &state.amsca, provider.required_nsca())?;
    debug!(
        "calc_soln: {} cells on {} backend",
        mesh.ncell(),
        backend.name()
    );
    let view = StateView {
        sol: &state.sol,
        dsol: &state.dsol,
        solt: &state.solt,
        amsca: &state.amsca,
    };
    let out = state.soln.interior_mut();
    backend.map_cells(out, CeseScratch::<D, NEQ>::default, |icl, scratch| {
        integrate_cell(icl, mesh, &view, provider, config, scratch)
    })?;

    if config.fp_mode == FloatingPointMode::Trap {
        if let Some(cell) = first_non_finite(state.soln.interior()) {
            warn!("calc_soln: non-finite result at cell {}", cell);
            return Err(SolverError::NumericalFault {
                pass: "calc_soln",
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
    use crate::solver::core::GasState;
    use crate::solver::euler::EulerJacobian;
    use crate::solver::jacobian::ConstantJacobian;
    use crate::types::Dim2;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_flow_is_fixed_point() {
        let mesh = CartesianMesh::quads(3, 3, [1.0, 1.0], BoundaryKind::Mirror).unwrap();
        let mut state = CeseState::<Dim2, 4>::for_mesh(&mesh, 1);
        let gas = GasState::<Dim2>::new(1.1, [0.7, -0.2], 0.9);
        state.fill_uniform(&gas, 1.4).unwrap();
        state.soln.fill([0.0; 4]);
        let config = CeseConfig::new(0.01);
        compute_soln(&Serial, &mesh, &mut state, &EulerJacobian, &config).unwrap();
        for icl in 0..9 {
            for ieq in 0..4 {
                assert_relative_eq!(
                    state.soln[icl][ieq],
                    state.sol[icl][ieq],
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_ghost_slots_untouched() {
        let mesh = CartesianMesh::quads(2, 1, [2.0, 1.0], BoundaryKind::Mirror).unwrap();
        let mut state = CeseState::<Dim2, 1>::for_mesh(&mesh, 1);
        state.sol.fill([1.0]);
        state.solt.fill([0.0]);
        state.dsol.fill([[0.0, 0.0]]);
        state.soln.fill([-7.0]);
        let provider = ConstantJacobian::<Dim2, 1>::advection([1.0, 0.0]);
        compute_soln(&Serial, &mesh, &mut state, &provider, &CeseConfig::new(0.1)).unwrap();
        for k in 1..=mesh.ngstcell() as isize {
            assert_eq!(state.soln[-k], [-7.0]);
        }
        assert_relative_eq!(state.soln[0][0], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_time_increment_averages_neighbors() {
        // With dt = 0 and no gradients the update is the CE-volume-weighted
        // average of the neighbor states.
        let mesh = CartesianMesh::quads(3, 1, [3.0, 1.0], BoundaryKind::Periodic).unwrap();
        let mut state = CeseState::<Dim2, 1>::for_mesh(&mesh, 1);
        state.dsol.fill([[0.0, 0.0]]);
        state.solt.fill([0.0]);
        for (icl, v) in [1.0, 2.0, 4.0].into_iter().enumerate() {
            state.sol[icl as isize] = [v];
        }
        state.refresh_ghosts(&mesh);
        let provider = ConstantJacobian::<Dim2, 1>::advection([1.0, 0.0]);
        compute_soln(&Serial, &mesh, &mut state, &provider, &CeseConfig::new(0.0)).unwrap();
        // Cell 1: south/north neighbors are its own images, east is 4, west is 1.
        assert_relative_eq!(state.soln[1][0], (2.0 + 4.0 + 2.0 + 1.0) / 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_euler_rejects_state_without_gamma() {
        let mesh = CartesianMesh::quads(2, 2, [1.0, 1.0], BoundaryKind::Periodic).unwrap();
        let mut state = CeseState::<Dim2, 4>::for_mesh(&mesh, 0);
        state.sol.fill([1.0, 0.0, 0.0, 2.5]);
        let err = compute_soln(&Serial, &mesh, &mut state, &EulerJacobian, &CeseConfig::new(0.1)).unwrap_err();
        assert_eq!(
            err,
            SolverError::ScalarCount {
                pass: "calc_soln",
                expected: 1,
                actual: 0
            }
        );

        // Linear providers read no scalars.
        let mut state = CeseState::<Dim2, 1>::for_mesh(&mesh, 0);
        state.sol.fill([1.0]);
        state.solt.fill([0.0]);
        state.dsol.fill([[0.0, 0.0]]);
        let provider = ConstantJacobian::<Dim2, 1>::advection([1.0, 0.0]);
        assert!(compute_soln(&Serial, &mesh, &mut state, &provider, &CeseConfig::new(0.1)).is_ok());
    }

    #[test]
    fn test_trap_reports_first_bad_cell() {
        let mesh = CartesianMesh::quads(3, 1, [3.0, 1.0], BoundaryKind::Mirror).unwrap();
        let mut state = CeseState::<Dim2, 1>::for_mesh(&mesh, 1);
        state.sol.fill([1.0]);
        state.solt.fill([0.0]);
        state.dsol.fill([[0.0, 0.0]]);
        state.sol[2] = [f64::NAN];
        let provider = ConstantJacobian::<Dim2, 1>::advection([1.0, 0.0]);
        let config = CeseConfig::new(0.1).with_fp_mode(FloatingPointMode::Trap);
        let err = compute_soln(&Serial, &mesh, &mut state, &provider, &config).unwrap_err();
        // Cell 1 reads cell 2 through their shared face.
        assert_eq!(
            err,
            SolverError::NumericalFault {
                pass: "calc_soln",
                cell: 1
            }
        );
    }
}
