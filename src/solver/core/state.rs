//! Mutable solution state of one mesh block.

use crate::mesh::MeshBlock;
use crate::solver::SolverError;
use crate::types::SpaceDim;

use super::cell_field::{CellField, ScalarTable};

/// Fill value for freshly allocated arrays, so that a forgotten initializer
/// shows up as a tiny but non-zero number instead of a silent zero.
pub const ALMOST_ZERO: f64 = 1.0e-200;

/// Spatial gradient of the conserved vector: `dsol[ieq][idim]`.
pub type Gradient<D, const NEQ: usize> = [<D as SpaceDim>::Coord; NEQ];

/// Conserved variables, gradients and per-cell outputs of the march.
///
/// All per-cell arrays cover ghost cells too; only the external halo
/// exchange (or [`CeseState::refresh_ghosts`]) writes ghost slots.
#[derive(Clone, Debug)]
pub struct CeseState<D: SpaceDim, const NEQ: usize> {
    /// Conserved variables at the current time level.
    pub sol: CellField<[f64; NEQ]>,
    /// Conserved variables at the next time level.
    pub soln: CellField<[f64; NEQ]>,
    /// Temporal derivative of `sol`.
    pub solt: CellField<[f64; NEQ]>,
    /// Spatial gradient of `sol`.
    pub dsol: CellField<Gradient<D, NEQ>>,
    /// Spatial gradient of `soln`.
    pub dsoln: CellField<Gradient<D, NEQ>>,
    /// Auxiliary scalars; slot 0 is the ratio of specific heats.
    pub amsca: ScalarTable,
    /// Clamped CFL number.
    pub cfl: CellField<f64>,
    /// Raw CFL number.
    pub ocfl: CellField<f64>,
}

impl<D: SpaceDim, const NEQ: usize> CeseState<D, NEQ> {
    /// Allocate every array once, filled with [`ALMOST_ZERO`].
    pub fn new(ncell: usize, ngstcell: usize, nsca: usize) -> Self {
        let mut grad = [D::ORIGIN; NEQ];
        for g in grad.iter_mut() {
            for d in 0..D::NDIM {
                g[d] = ALMOST_ZERO;
            }
        }
        let mut amsca = ScalarTable::new(ncell, ngstcell, nsca);
        amsca.data.fill(ALMOST_ZERO);
        Self {
            sol: CellField::filled(ncell, ngstcell, [ALMOST_ZERO; NEQ]),
            soln: CellField::filled(ncell, ngstcell, [ALMOST_ZERO; NEQ]),
            solt: CellField::filled(ncell, ngstcell, [ALMOST_ZERO; NEQ]),
            dsol: CellField::filled(ncell, ngstcell, grad),
            dsoln: CellField::filled(ncell, ngstcell, grad),
            amsca,
            cfl: CellField::filled(ncell, ngstcell, 0.0),
            ocfl: CellField::filled(ncell, ngstcell, 0.0),
        }
    }

    /// Allocate a state sized for `mesh`.
    pub fn for_mesh(mesh: &MeshBlock<D>, nsca: usize) -> Self {
        Self::new(mesh.ncell(), mesh.ngstcell(), nsca)
    }

    /// Number of interior cells.
    pub fn ncell(&self) -> usize {
        self.sol.ncell
    }

    /// Number of ghost cells.
    pub fn ngstcell(&self) -> usize {
        self.sol.ngstcell
    }

    /// Exchange current and next levels (`sol`/`soln`, `dsol`/`dsoln`).
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.sol, &mut self.soln);
        std::mem::swap(&mut self.dsol, &mut self.dsoln);
    }

    /// Set the whole block, ghosts included, to one ideal-gas state.
    ///
    /// Fills `sol` and `soln` with the conserved variables, zeroes the
    /// gradients and the temporal derivative, and stores `gamma` in
    /// `amsca[..][0]`.
    pub fn fill_uniform(&mut self, gas: &GasState<D>, gamma: f64) -> Result<(), SolverError> {
        check_gas_layout::<D>(NEQ)?;
        check_scalar_count("fill_uniform", &self.amsca, 1)?;
        let mut u = [0.0; NEQ];
        gas.to_conserved(gamma, &mut u);
        self.sol.fill(u);
        self.soln.fill(u);
        self.solt.fill([0.0; NEQ]);
        self.dsol.fill([D::ORIGIN; NEQ]);
        self.dsoln.fill([D::ORIGIN; NEQ]);
        self.amsca.fill_slot(0, gamma);
        Ok(())
    }

    /// Copy `sol`, `soln`, `solt`, gradients and scalars of each ghost's
    /// source cell into the ghost slot.
    ///
    /// Stands in for a halo exchange on single-block runs.
    pub fn refresh_ghosts(&mut self, mesh: &MeshBlock<D>) {
        for (k, &src) in mesh.ghost_sources.iter().enumerate() {
            let jcl = -(k as isize + 1);
            let src = src as isize;
            self.sol[jcl] = self.sol[src];
            self.soln[jcl] = self.soln[src];
            self.solt[jcl] = self.solt[src];
            self.dsol[jcl] = self.dsol[src];
            self.dsoln[jcl] = self.dsoln[src];
            let row = self.amsca.get(src).to_vec();
            self.amsca.get_mut(jcl).copy_from_slice(&row);
        }
    }

    /// Check that every array addresses the same cells as `mesh`.
    pub fn check_layout(&self, mesh: &MeshBlock<D>) -> Result<(), SolverError> {
        let expected = mesh.ncell() + mesh.ngstcell();
        let layouts = [
            ("sol", self.sol.len(), self.sol.ngstcell),
            ("soln", self.soln.len(), self.soln.ngstcell),
            ("solt", self.solt.len(), self.solt.ngstcell),
            ("dsol", self.dsol.len(), self.dsol.ngstcell),
            ("dsoln", self.dsoln.len(), self.dsoln.ngstcell),
            ("cfl", self.cfl.len(), self.cfl.ngstcell),
            ("ocfl", self.ocfl.len(), self.ocfl.ngstcell),
            (
                "amsca",
                self.amsca.ncell + self.amsca.ngstcell,
                self.amsca.ngstcell,
            ),
        ];
        for (field, actual, ngstcell) in layouts {
            if actual != expected || ngstcell != mesh.ngstcell() {
                return Err(SolverError::StateMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Read-only view handed to flux-Jacobian providers.
    pub fn view(&self) -> StateView<'_, D, NEQ> {
        StateView {
            sol: &self.sol,
            dsol: &self.dsol,
            solt: &self.solt,
            amsca: &self.amsca,
        }
    }
}

/// Shared, read-only inputs of a pass.
#[derive(Clone, Copy, Debug)]
pub struct StateView<'a, D: SpaceDim, const NEQ: usize> {
    pub sol: &'a CellField<[f64; NEQ]>,
    pub dsol: &'a CellField<Gradient<D, NEQ>>,
    pub solt: &'a CellField<[f64; NEQ]>,
    pub amsca: &'a ScalarTable,
}

impl<D: SpaceDim, const NEQ: usize> StateView<'_, D, NEQ> {
    /// Ratio of specific heats of cell `icl`.
    #[inline(always)]
    pub fn gamma(&self, icl: isize) -> f64 {
        self.amsca.get(icl)[0]
    }
}

/// `NEQ == NDIM + 2` for the ideal-gas layout `[ρ, ρv, E]`.
pub(crate) fn check_gas_layout<D: SpaceDim>(neq: usize) -> Result<(), SolverError> {
    if neq != D::NDIM + 2 {
        return Err(SolverError::EquationCount {
            ndim: D::NDIM,
            expected: D::NDIM + 2,
            actual: neq,
        });
    }
    Ok(())
}

/// `amsca` must hold at least `expected` scalars per cell for `pass`.
pub(crate) fn check_scalar_count(
    pass: &'static str,
    amsca: &ScalarTable,
    expected: usize,
) -> Result<(), SolverError> {
    if amsca.nsca < expected {
        return Err(SolverError::ScalarCount {
            pass,
            expected,
            actual: amsca.nsca,
        });
    }
    Ok(())
}

/// Primitive ideal-gas state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasState<D: SpaceDim> {
    pub density: f64,
    pub velocity: D::Coord,
    pub pressure: f64,
}

impl<D: SpaceDim> GasState<D> {
    pub fn new(density: f64, velocity: D::Coord, pressure: f64) -> Self {
        Self {
            density,
            velocity,
            pressure,
        }
    }

    /// Write `[ρ, ρv, p/(γ-1) + ρ|v|²/2]` into `u`.
    pub fn to_conserved(&self, gamma: f64, u: &mut [f64]) {
        debug_assert_eq!(u.len(), D::NDIM + 2);
        let mut v2 = 0.0;
        u[0] = self.density;
        for d in 0..D::NDIM {
            u[1 + d] = self.density * self.velocity[d];
            v2 += self.velocity[d] * self.velocity[d];
        }
        u[1 + D::NDIM] = self.pressure / (gamma - 1.0) + 0.5 * self.density * v2;
    }

    /// Recover primitive variables from a conserved vector.
    pub fn from_conserved(u: &[f64], gamma: f64) -> Self {
        debug_assert_eq!(u.len(), D::NDIM + 2);
        let rho = u[0];
        let mut velocity = D::ORIGIN;
        let mut m2 = 0.0;
        for d in 0..D::NDIM {
            velocity[d] = u[1 + d] / rho;
            m2 += u[1 + d] * u[1 + d];
        }
        let pressure = (gamma - 1.0) * (u[1 + D::NDIM] - 0.5 * m2 / rho);
        Self {
            density: rho,
            velocity,
            pressure,
        }
    }

    /// Speed of sound `sqrt(γ p / ρ)`.
    pub fn sound_speed(&self, gamma: f64) -> f64 {
        (gamma * self.pressure / self.density).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dim2, Dim3};
    use approx::assert_relative_eq;

    #[test]
    fn test_primitive_conserved_pair() {
        let gas = GasState::<Dim3>::new(1.2, [10.0, -3.0, 0.5], 1.0e5);
        let mut u = [0.0; 5];
        gas.to_conserved(1.4, &mut u);
        assert_relative_eq!(u[0], 1.2);
        assert_relative_eq!(u[2], -3.6);
        let back = GasState::<Dim3>::from_conserved(&u, 1.4);
        assert_relative_eq!(back.pressure, 1.0e5, max_relative = 1e-12);
        assert_relative_eq!(back.velocity[2], 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_new_state_is_almost_zero() {
        let state = CeseState::<Dim2, 4>::new(3, 2, 1);
        assert_eq!(state.sol[-2], [ALMOST_ZERO; 4]);
        assert_eq!(state.dsol[1][3][1], ALMOST_ZERO);
        assert_eq!(state.amsca.get(0), &[ALMOST_ZERO]);
    }

    #[test]
    fn test_swap_exchanges_levels() {
        let mut state = CeseState::<Dim2, 4>::new(2, 0, 1);
        state.sol.fill([1.0; 4]);
        state.soln.fill([2.0; 4]);
        state.swap();
        assert_eq!(state.sol[0], [2.0; 4]);
        assert_eq!(state.soln[1], [1.0; 4]);
    }

    #[test]
    fn test_fill_uniform_rejects_wrong_equation_count() {
        let mut state = CeseState::<Dim2, 5>::new(1, 0, 1);
        let gas = GasState::<Dim2>::new(1.0, [0.0, 0.0], 1.0);
        assert_eq!(
            state.fill_uniform(&gas, 1.4),
            Err(SolverError::EquationCount {
                ndim: 2,
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_fill_uniform_sets_gamma() {
        let mut state = CeseState::<Dim2, 4>::new(2, 1, 2);
        let gas = GasState::<Dim2>::new(1.0, [1.0, 0.0], 1.0);
        state.fill_uniform(&gas, 1.4).unwrap();
        assert_eq!(state.amsca.get(-1)[0], 1.4);
        assert_relative_eq!(state.sol[1][3], 1.0 / 0.4 + 0.5);
        assert_eq!(state.solt[0], [0.0; 4]);
    }

    #[test]
    fn test_fill_uniform_needs_gamma_slot() {
        let mut state = CeseState::<Dim2, 4>::new(2, 1, 0);
        let gas = GasState::<Dim2>::new(1.0, [1.0, 0.0], 1.0);
        assert_eq!(
            state.fill_uniform(&gas, 1.4),
            Err(SolverError::ScalarCount {
                pass: "fill_uniform",
                expected: 1,
                actual: 0
            })
        );
    }
}
