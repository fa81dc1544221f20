//! Flux and flux-Jacobian providers.
//!
//! The CESE integrator needs, for every neighbor cell `jcl` it visits, the
//! physical flux `F_k(u_j)` in each spatial direction `k` and its Jacobian
//! `A_k = ∂F_k/∂u` evaluated at the neighbor's state. The model physics
//! lives entirely behind [`FluxJacobian`]; the integrator never inspects the
//! equations.

use crate::types::SpaceDim;

use super::core::StateView;

/// Flux vector per equation and direction: `fcn[ieq][idim]`.
pub type Flux<D, const NEQ: usize> = [<D as SpaceDim>::Coord; NEQ];

/// Flux Jacobian per equation pair and direction: `jacos[ieq][jeq][idim]`.
pub type Jacobian<D, const NEQ: usize> = [[<D as SpaceDim>::Coord; NEQ]; NEQ];

/// Zeroed flux buffer.
#[inline]
pub fn zero_flux<D: SpaceDim, const NEQ: usize>() -> Flux<D, NEQ> {
    [D::ORIGIN; NEQ]
}

/// Zeroed Jacobian buffer.
#[inline]
pub fn zero_jacobian<D: SpaceDim, const NEQ: usize>() -> Jacobian<D, NEQ> {
    [[D::ORIGIN; NEQ]; NEQ]
}

/// Evaluates flux and flux Jacobian for one cell.
///
/// Implementations must be pure functions of the view and the cell index:
/// they are called concurrently from every execution unit of a pass, with
/// the same `jcl` possibly visited by several cells at once.
pub trait FluxJacobian<D: SpaceDim, const NEQ: usize>: Sync {
    /// Fill `fcn` and `jacos` for cell `jcl` (negative for ghosts).
    ///
    /// Both buffers are overwritten completely.
    fn evaluate(
        &self,
        view: &StateView<'_, D, NEQ>,
        jcl: isize,
        fcn: &mut Flux<D, NEQ>,
        jacos: &mut Jacobian<D, NEQ>,
    );

    /// Equation count this provider was built for, when it is fixed.
    fn required_neq(&self) -> Option<usize> {
        None
    }

    /// Leading `amsca` slots read by [`evaluate`](Self::evaluate).
    fn required_nsca(&self) -> usize {
        0
    }
}

impl<D, const NEQ: usize, F> FluxJacobian<D, NEQ> for F
where
    D: SpaceDim,
    F: Fn(&StateView<'_, D, NEQ>, isize, &mut Flux<D, NEQ>, &mut Jacobian<D, NEQ>) + Sync,
{
    fn evaluate(
        &self,
        view: &StateView<'_, D, NEQ>,
        jcl: isize,
        fcn: &mut Flux<D, NEQ>,
        jacos: &mut Jacobian<D, NEQ>,
    ) {
        self(view, jcl, fcn, jacos)
    }
}

/// Linear system `∂u/∂t + Σ_k A_k ∂u/∂x_k = 0` with constant `A_k`.
///
/// The flux is `F_k = A_k u` and the Jacobian is `A_k` itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantJacobian<D: SpaceDim, const NEQ: usize> {
    /// `jacos[ieq][jeq][idim]`.
    pub jacos: Jacobian<D, NEQ>,
}

impl<D: SpaceDim, const NEQ: usize> ConstantJacobian<D, NEQ> {
    pub fn new(jacos: Jacobian<D, NEQ>) -> Self {
        Self { jacos }
    }

    /// Scalar advection `u_t + c·∇u = 0` applied to every equation.
    pub fn advection(velocity: D::Coord) -> Self {
        let mut jacos = zero_jacobian::<D, NEQ>();
        for (ieq, row) in jacos.iter_mut().enumerate() {
            row[ieq] = velocity;
        }
        Self { jacos }
    }
}

impl<D: SpaceDim, const NEQ: usize> FluxJacobian<D, NEQ> for ConstantJacobian<D, NEQ> {
    fn evaluate(
        &self,
        view: &StateView<'_, D, NEQ>,
        jcl: isize,
        fcn: &mut Flux<D, NEQ>,
        jacos: &mut Jacobian<D, NEQ>,
    ) {
        let u = &view.sol[jcl];
        *jacos = self.jacos;
        for ieq in 0..NEQ {
            for idim in 0..D::NDIM {
                let mut f = 0.0;
                for jeq in 0..NEQ {
                    f += self.jacos[ieq][jeq][idim] * u[jeq];
                }
                fcn[ieq][idim] = f;
            }
        }
    }

    fn required_neq(&self) -> Option<usize> {
        Some(NEQ)
    }
}
