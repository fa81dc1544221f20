//! Ideal-gas Euler equations in conservative form.
//!
//! Conserved vector `u = [ρ, m_1..m_NDIM, E]` with momentum `m = ρv` and
//! total energy `E`. The ratio of specific heats is read per cell from
//! `amsca[jcl][0]`.

use crate::types::SpaceDim;

use super::core::StateView;
use super::jacobian::{Flux, FluxJacobian, Jacobian};

/// Flux and Jacobian of the compressible Euler equations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EulerJacobian;

impl<D: SpaceDim, const NEQ: usize> FluxJacobian<D, NEQ> for EulerJacobian {
    fn evaluate(
        &self,
        view: &StateView<'_, D, NEQ>,
        jcl: isize,
        fcn: &mut Flux<D, NEQ>,
        jacos: &mut Jacobian<D, NEQ>,
    ) {
        let ndim = D::NDIM;
        let ie = 1 + ndim;
        let u = &view.sol[jcl];
        let ga = view.gamma(jcl);
        let ga1 = ga - 1.0;

        let rho = u[0];
        let mut v = D::ORIGIN;
        let mut v2 = 0.0;
        for d in 0..ndim {
            v[d] = u[1 + d] / rho;
            v2 += v[d] * v[d];
        }
        let energy = u[ie];
        let pr = ga1 * (energy - 0.5 * rho * v2);
        let h = (energy + pr) / rho;

        for row in jacos.iter_mut() {
            for col in row.iter_mut() {
                *col = D::ORIGIN;
            }
        }

        for k in 0..ndim {
            // Mass.
            fcn[0][k] = u[1 + k];
            jacos[0][1 + k][k] = 1.0;

            // Momentum.
            for i in 0..ndim {
                let delta_ik = if i == k { 1.0 } else { 0.0 };
                fcn[1 + i][k] = u[1 + i] * v[k] + delta_ik * pr;
                jacos[1 + i][0][k] = -v[i] * v[k] + delta_ik * 0.5 * ga1 * v2;
                for j in 0..ndim {
                    let mut a = -delta_ik * ga1 * v[j];
                    if i == j {
                        a += v[k];
                    }
                    if j == k {
                        a += v[i];
                    }
                    jacos[1 + i][1 + j][k] = a;
                }
                jacos[1 + i][ie][k] = delta_ik * ga1;
            }

            // Energy.
            fcn[ie][k] = (energy + pr) * v[k];
            jacos[ie][0][k] = v[k] * (0.5 * ga1 * v2 - h);
            for j in 0..ndim {
                let delta_jk = if j == k { 1.0 } else { 0.0 };
                jacos[ie][1 + j][k] = h * delta_jk - ga1 * v[j] * v[k];
            }
            jacos[ie][ie][k] = ga * v[k];
        }
    }

    fn required_neq(&self) -> Option<usize> {
        Some(D::NDIM + 2)
    }

    fn required_nsca(&self) -> usize {
        1
    }
}
