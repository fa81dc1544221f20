//! Conservation diagnostics and finiteness checks.
//!
//! # Example
//!
//! ```
//! use cese_rs::solver::{conserved_totals, first_non_finite};
//! use cese_rs::solver::core::CellField;
//!
//! let soln = CellField::from_parts(vec![[9.0, 9.0]], vec![[1.0, 2.0], [3.0, 4.0]]);
//! let totals = conserved_totals(&soln, &[0.5, 2.0]);
//! assert_eq!(totals, [6.5, 9.0]);
//! assert_eq!(first_non_finite(soln.interior()), None);
//! ```

use crate::mesh::CeseGeometry;
use crate::types::SpaceDim;

use super::cfl::CflOutcome;
use super::core::CellField;

/// Values that can be checked for NaN and infinity.
pub trait AllFinite {
    fn all_finite(&self) -> bool;
}

impl AllFinite for f64 {
    #[inline]
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl<const N: usize> AllFinite for [f64; N] {
    #[inline]
    fn all_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

impl AllFinite for CflOutcome {
    #[inline]
    fn all_finite(&self) -> bool {
        self.energy.is_finite() && self.cfl.is_finite() && self.ocfl.is_finite()
    }
}

/// Index of the first value holding NaN or infinity.
pub fn first_non_finite<T: AllFinite>(values: &[T]) -> Option<usize> {
    values.iter().position(|v| !v.all_finite())
}

/// Per-equation `Σ u[icl] · weights[icl]` over interior cells.
pub fn conserved_totals<const NEQ: usize>(values: &CellField<[f64; NEQ]>, weights: &[f64]) -> [f64; NEQ] {
    debug_assert_eq!(values.ncell, weights.len());
    let mut totals = [0.0; NEQ];
    for (u, &w) in values.interior().iter().zip(weights) {
        for (t, v) in totals.iter_mut().zip(u) {
            *t += v * w;
        }
    }
    totals
}

/// Total CE volumes `cevol[icl][0]` of interior cells.
///
/// These are the weights under which the CESE update conserves
/// `Σ soln · volume` on a closed block.
pub fn ce_volumes<D: SpaceDim>(geom: &CeseGeometry<D>) -> Vec<f64> {
    geom.cevol.interior().iter().map(|v| v[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_non_finite_reports_lowest_index() {
        let values = [[1.0, 2.0], [f64::NAN, 0.0], [f64::INFINITY, 0.0]];
        assert_eq!(first_non_finite(&values), Some(1));
        assert_eq!(first_non_finite(&[1.0, 2.0]), None);
        let outcomes = [
            CflOutcome {
                energy: 1.0,
                cfl: 0.5,
                ocfl: 0.5,
            },
            CflOutcome {
                energy: f64::NAN,
                cfl: 1.0,
                ocfl: 0.0,
            },
        ];
        assert_eq!(first_non_finite(&outcomes), Some(1));
    }
}
