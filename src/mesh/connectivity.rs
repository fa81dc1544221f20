//! Read-only mesh topology consumed by the kernels.
//!
//! The layout mirrors the fixed-arity tables produced by the upstream mesh
//! builder:
//!
//! - `clfcs[icl] = [nface, f1, f2, ...]` (at most [`CLMFC`] faces)
//! - `fcnds[ifc] = [nnode, n1, n2, ...]` (at most [`FCMND`] nodes)
//! - `fccls[ifc] = [c0, c1]` (exactly [`FCREL`] cells, ghosts negative)
//!
//! Face slots are 1-based in `clfcs` so that slot 0 of the per-cell geometry
//! tables can hold the cell-level value.

use super::error::MeshError;

/// Maximum number of faces per cell.
pub const CLMFC: usize = 6;

/// Maximum number of nodes per face (and therefore sub-faces per face).
pub const FCMND: usize = 4;

/// Number of cells sharing a face.
pub const FCREL: usize = 2;

/// Cell/face topology of one mesh block.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConnectivity {
    /// Number of interior cells.
    pub ncell: usize,
    /// Number of ghost cells, addressed as `-1..=-ngstcell`.
    pub ngstcell: usize,
    /// Per interior cell: face count followed by face indices.
    pub clfcs: Vec<[usize; CLMFC + 1]>,
    /// Per face: node count followed by node indices.
    pub fcnds: Vec<[usize; FCMND + 1]>,
    /// Per face: the two adjacent cells.
    pub fccls: Vec<[isize; FCREL]>,
}

impl MeshConnectivity {
    /// Number of faces.
    pub fn nface(&self) -> usize {
        self.fccls.len()
    }

    /// Face indices of interior cell `icl`, in slot order.
    #[inline(always)]
    pub fn cell_faces(&self, icl: usize) -> &[usize] {
        let row = &self.clfcs[icl];
        &row[1..=row[0]]
    }

    /// Number of nodes (and sub-faces) of face `ifc`.
    #[inline(always)]
    pub fn face_node_count(&self, ifc: usize) -> usize {
        self.fcnds[ifc][0]
    }

    /// Node indices of face `ifc`.
    pub fn face_nodes(&self, ifc: usize) -> &[usize] {
        let row = &self.fcnds[ifc];
        &row[1..=row[0]]
    }

    /// The cell on the other side of face `ifc` as seen from `icl`.
    #[inline(always)]
    pub fn neighbor(&self, ifc: usize, icl: isize) -> isize {
        let pair = self.fccls[ifc];
        pair[0] + pair[1] - icl
    }

    /// Check the topology contract.
    ///
    /// The kernels never re-check any of this; an invalid mesh that skips
    /// validation leads to out-of-bounds panics or garbage results.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.clfcs.len() != self.ncell {
            return Err(MeshError::SizeMismatch {
                name: "clfcs",
                expected: self.ncell,
                actual: self.clfcs.len(),
            });
        }
        if self.fcnds.len() != self.fccls.len() {
            return Err(MeshError::SizeMismatch {
                name: "fcnds",
                expected: self.fccls.len(),
                actual: self.fcnds.len(),
            });
        }
        for (ifc, row) in self.fcnds.iter().enumerate() {
            if row[0] > FCMND {
                return Err(MeshError::TooManyNodes {
                    face: ifc,
                    count: row[0],
                    max: FCMND,
                });
            }
        }
        let lo = -(self.ngstcell as isize);
        let hi = self.ncell as isize;
        for (ifc, pair) in self.fccls.iter().enumerate() {
            for &cell in pair {
                if cell < lo || cell >= hi {
                    return Err(MeshError::CellOutOfRange {
                        face: ifc,
                        cell,
                        ncell: self.ncell,
                        ngstcell: self.ngstcell,
                    });
                }
            }
        }
        for (icl, row) in self.clfcs.iter().enumerate() {
            if row[0] > CLMFC {
                return Err(MeshError::TooManyFaces {
                    cell: icl,
                    count: row[0],
                    max: CLMFC,
                });
            }
            for &ifc in &row[1..=row[0]] {
                if ifc >= self.nface() {
                    return Err(MeshError::FaceOutOfRange {
                        cell: icl,
                        face: ifc,
                        nface: self.nface(),
                    });
                }
                if !self.fccls[ifc].contains(&(icl as isize)) {
                    return Err(MeshError::NotIncident { cell: icl, face: ifc });
                }
            }
        }
        Ok(())
    }
}
