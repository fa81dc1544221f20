//! Per-cell storage with ghost-cell offset addressing.
//!
//! Cells are addressed by signed index: interior cells occupy `0..ncell`,
//! ghost cells occupy `-ngstcell..0`. Storage is a single contiguous buffer
//! with the ghosts first, so `data[icl + ngstcell]` holds cell `icl`.

use std::ops::{Index, IndexMut};

/// One value of type `T` per cell, ghosts included.
#[derive(Clone, Debug, PartialEq)]
pub struct CellField<T> {
    /// Values for ghost cells (reversed) followed by interior cells.
    pub data: Vec<T>,
    /// Number of interior cells.
    pub ncell: usize,
    /// Number of ghost cells preceding the interior range.
    pub ngstcell: usize,
}

impl<T: Copy> CellField<T> {
    /// Create a field with every slot set to `value`.
    pub fn filled(ncell: usize, ngstcell: usize, value: T) -> Self {
        Self {
            data: vec![value; ncell + ngstcell],
            ncell,
            ngstcell,
        }
    }

    /// Set every slot, ghosts included, to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> CellField<T> {
    /// Build a field from ghost values (ordered `-1, -2, ...`) and interior values.
    pub fn from_parts(mut ghosts: Vec<T>, interior: Vec<T>) -> Self {
        let ngstcell = ghosts.len();
        let ncell = interior.len();
        ghosts.reverse();
        ghosts.extend(interior);
        Self {
            data: ghosts,
            ncell,
            ngstcell,
        }
    }

    /// Storage position of cell `icl`.
    #[inline(always)]
    pub fn offset(&self, icl: isize) -> usize {
        debug_assert!(
            icl >= -(self.ngstcell as isize) && icl < self.ncell as isize,
            "cell index {} outside [-{}, {})",
            icl,
            self.ngstcell,
            self.ncell
        );
        (icl + self.ngstcell as isize) as usize
    }

    /// Value of cell `icl` (negative for ghosts).
    #[inline(always)]
    pub fn get(&self, icl: isize) -> &T {
        &self.data[self.offset(icl)]
    }

    /// Mutable value of cell `icl` (negative for ghosts).
    #[inline(always)]
    pub fn get_mut(&mut self, icl: isize) -> &mut T {
        let k = self.offset(icl);
        &mut self.data[k]
    }

    /// Interior cells `0..ncell`.
    #[inline]
    pub fn interior(&self) -> &[T] {
        &self.data[self.ngstcell..]
    }

    /// Mutable interior cells `0..ncell`.
    #[inline]
    pub fn interior_mut(&mut self) -> &mut [T] {
        &mut self.data[self.ngstcell..]
    }

    /// Ghost cells in storage order (`-ngstcell` first).
    #[inline]
    pub fn ghosts(&self) -> &[T] {
        &self.data[..self.ngstcell]
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether two fields address the same cell range.
    pub fn same_layout<U>(&self, other: &CellField<U>) -> bool {
        self.ncell == other.ncell && self.ngstcell == other.ngstcell
    }
}

impl<T> Index<isize> for CellField<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, icl: isize) -> &T {
        self.get(icl)
    }
}

impl<T> IndexMut<isize> for CellField<T> {
    #[inline(always)]
    fn index_mut(&mut self, icl: isize) -> &mut T {
        self.get_mut(icl)
    }
}

/// Fixed-stride table of per-cell auxiliary scalars (`amsca`).
///
/// Slot 0 holds the ratio of specific heats for gas-dynamics models.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTable {
    /// Interleaved values: `data[(icl + ngstcell) * nsca + k]`.
    pub data: Vec<f64>,
    /// Scalars per cell.
    pub nsca: usize,
    /// Number of interior cells.
    pub ncell: usize,
    /// Number of ghost cells.
    pub ngstcell: usize,
}

impl ScalarTable {
    /// Create a zeroed table.
    pub fn new(ncell: usize, ngstcell: usize, nsca: usize) -> Self {
        Self {
            data: vec![0.0; (ncell + ngstcell) * nsca],
            nsca,
            ncell,
            ngstcell,
        }
    }

    /// Scalars of cell `icl`.
    #[inline(always)]
    pub fn get(&self, icl: isize) -> &[f64] {
        let base = (icl + self.ngstcell as isize) as usize * self.nsca;
        &self.data[base..base + self.nsca]
    }

    /// Mutable scalars of cell `icl`.
    #[inline(always)]
    pub fn get_mut(&mut self, icl: isize) -> &mut [f64] {
        let base = (icl + self.ngstcell as isize) as usize * self.nsca;
        &mut self.data[base..base + self.nsca]
    }

    /// Set scalar `k` of every cell, ghosts included.
    pub fn fill_slot(&mut self, k: usize, value: f64) {
        for row in self.data.chunks_exact_mut(self.nsca) {
            row[k] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_offset_addressing() {
        let field = CellField::from_parts(vec![-1.0, -2.0], vec![0.0, 1.0, 2.0]);
        assert_eq!(field.ngstcell, 2);
        assert_eq!(field.ncell, 3);
        assert_eq!(field[-1], -1.0);
        assert_eq!(field[-2], -2.0);
        assert_eq!(field[0], 0.0);
        assert_eq!(field[2], 2.0);
        assert_eq!(field.interior(), &[0.0, 1.0, 2.0]);
        assert_eq!(field.ghosts(), &[-2.0, -1.0]);
    }

    #[test]
    fn test_interior_mut_leaves_ghosts() {
        let mut field = CellField::filled(3, 2, [1.0; 2]);
        for v in field.interior_mut() {
            *v = [5.0; 2];
        }
        assert_eq!(field[-1], [1.0; 2]);
        assert_eq!(field[-2], [1.0; 2]);
        assert_eq!(field[1], [5.0; 2]);
    }

    #[test]
    fn test_scalar_table_slots() {
        let mut amsca = ScalarTable::new(2, 1, 3);
        amsca.fill_slot(0, 1.4);
        amsca.get_mut(1)[2] = 7.0;
        assert_eq!(amsca.get(-1), &[1.4, 0.0, 0.0]);
        assert_eq!(amsca.get(1), &[1.4, 0.0, 7.0]);
    }
}
