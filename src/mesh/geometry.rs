//! CESE dual-mesh geometry.
//!
//! For an interior cell `icl` and face slot `ifl` (face `ifc`, neighbor
//! `jcl`), the conservation element CE(icl, ifl) is the union of the pyramid
//! over `ifc` with apex at the solution point of `icl` and the pyramid over
//! `ifc` with apex at the solution point of `jcl`. The tables below hold, per
//! interior cell:
//!
//! - `cecnd[icl][0]`: solution point; `cecnd[icl][ifl]`: centroid of CE(icl, ifl)
//! - `cevol[icl][0]`: total CE volume; `cevol[icl][ifl]`: volume of CE(icl, ifl)
//! - `sfmrc[icl][ifl-1][inf]`: the lateral sub-faces of the `jcl` pyramid,
//!   one per face node, with outward area vectors
//!
//! Ghost cells only carry their solution point (`cecnd[jcl][0]`).

use super::connectivity::{MeshConnectivity, CLMFC, FCMND};
use super::error::MeshError;
use crate::solver::core::cell_field::CellField;
use crate::types::SpaceDim;

/// Relative tolerance of the `cevol[icl][0] == Σ cevol[icl][ifl]` check.
const VOLUME_RTOL: f64 = 1e-12;

/// One lateral sub-face of a conservation element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubFace<D: SpaceDim> {
    /// Midpoint (2D) or centroid (3D) of the sub-face.
    pub mid: D::Coord,
    /// Outward normal scaled by the sub-face area (2D: length).
    pub normal: D::Coord,
}

impl<D: SpaceDim> Default for SubFace<D> {
    fn default() -> Self {
        Self {
            mid: D::ORIGIN,
            normal: D::ORIGIN,
        }
    }
}

/// Sub-faces of every face slot of one cell.
pub type SubFaceTable<D> = [[SubFace<D>; FCMND]; CLMFC];

/// Geometric tables of the CESE dual mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct CeseGeometry<D: SpaceDim> {
    /// Solution point (slot 0) and CE centroids (slots 1..=nface).
    pub cecnd: CellField<[D::Coord; CLMFC + 1]>,
    /// Total CE volume (slot 0) and partial CE volumes (slots 1..=nface).
    pub cevol: CellField<[f64; CLMFC + 1]>,
    /// Lateral sub-faces, interior cells only.
    pub sfmrc: Vec<SubFaceTable<D>>,
    /// Primal cell volume.
    pub clvol: CellField<f64>,
}

impl<D: SpaceDim> CeseGeometry<D> {
    /// Zeroed tables sized for the given cell counts.
    pub fn zeroed(ncell: usize, ngstcell: usize) -> Self {
        Self {
            cecnd: CellField::filled(ncell, ngstcell, [D::ORIGIN; CLMFC + 1]),
            cevol: CellField::filled(ncell, ngstcell, [0.0; CLMFC + 1]),
            sfmrc: vec![[[SubFace::default(); FCMND]; CLMFC]; ncell],
            clvol: CellField::filled(ncell, ngstcell, 0.0),
        }
    }

    /// Solution point of cell `icl` (negative for ghosts).
    #[inline(always)]
    pub fn solution_point(&self, icl: isize) -> &D::Coord {
        &self.cecnd[icl][0]
    }

    /// Check array sizes against `conn` and the CE volume invariant.
    pub fn validate(&self, conn: &MeshConnectivity) -> Result<(), MeshError> {
        let expected = conn.ncell + conn.ngstcell;
        let fields: [(&'static str, usize, bool); 3] = [
            ("cecnd", self.cecnd.len(), self.cecnd.ngstcell == conn.ngstcell),
            ("cevol", self.cevol.len(), self.cevol.ngstcell == conn.ngstcell),
            ("clvol", self.clvol.len(), self.clvol.ngstcell == conn.ngstcell),
        ];
        for (name, actual, ghosts_match) in fields {
            if actual != expected || !ghosts_match {
                return Err(MeshError::SizeMismatch {
                    name,
                    expected,
                    actual,
                });
            }
        }
        if self.sfmrc.len() != conn.ncell {
            return Err(MeshError::SizeMismatch {
                name: "sfmrc",
                expected: conn.ncell,
                actual: self.sfmrc.len(),
            });
        }

        for icl in 0..conn.ncell {
            let vol = &self.cevol[icl as isize];
            let nface = conn.clfcs[icl][0];
            let mut sum = 0.0;
            for (ifl, &v) in vol.iter().enumerate().take(nface + 1).skip(1) {
                if v <= 0.0 {
                    return Err(MeshError::NonPositiveVolume {
                        cell: icl,
                        slot: ifl,
                        volume: v,
                    });
                }
                sum += v;
            }
            if (vol[0] - sum).abs() > VOLUME_RTOL * sum.abs().max(f64::MIN_POSITIVE) {
                return Err(MeshError::VolumeMismatch {
                    cell: icl,
                    total: vol[0],
                    sum,
                });
            }
        }
        Ok(())
    }
}

/// Connectivity plus geometry of one mesh block, as consumed by the solver.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBlock<D: SpaceDim> {
    pub conn: MeshConnectivity,
    pub geom: CeseGeometry<D>,
    /// For each ghost `-(k+1)`, the interior cell whose state it replicates.
    pub ghost_sources: Vec<usize>,
}

impl<D: SpaceDim> MeshBlock<D> {
    /// Number of interior cells.
    pub fn ncell(&self) -> usize {
        self.conn.ncell
    }

    /// Number of ghost cells.
    pub fn ngstcell(&self) -> usize {
        self.conn.ngstcell
    }

    /// Validate connectivity, geometry and the ghost source table.
    pub fn validate(&self) -> Result<(), MeshError> {
        self.conn.validate()?;
        self.geom.validate(&self.conn)?;
        if self.ghost_sources.len() != self.conn.ngstcell {
            return Err(MeshError::SizeMismatch {
                name: "ghost_sources",
                expected: self.conn.ngstcell,
                actual: self.ghost_sources.len(),
            });
        }
        Ok(())
    }
}
