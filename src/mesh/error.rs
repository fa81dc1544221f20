//! Errors raised while assembling or validating mesh data.

use thiserror::Error;

/// Violations of the connectivity / geometry contract.
///
/// These are checked once when a mesh is handed to the solver, never inside
/// the per-cell kernels.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A structured block has no cells along `axis`.
    #[error("block needs at least one cell along axis {axis}")]
    EmptyAxis { axis: usize },

    /// A structured block has a non-positive or non-finite extent along `axis`.
    #[error("block extent {length} along axis {axis} must be positive")]
    InvalidExtent { axis: usize, length: f64 },

    /// A cell lists more faces than the fixed stencil arity allows.
    #[error("cell {cell} has {count} faces, maximum is {max}")]
    TooManyFaces { cell: usize, count: usize, max: usize },

    /// A face lists more nodes than the fixed sub-face arity allows.
    #[error("face {face} has {count} nodes, maximum is {max}")]
    TooManyNodes { face: usize, count: usize, max: usize },

    /// A face has fewer nodes than the dimension requires.
    #[error("face {face} has {count} nodes, at least {min} are required")]
    TooFewNodes { face: usize, count: usize, min: usize },

    /// A node index referenced by a face does not exist.
    #[error("face {face} references node {node}, but the mesh has {nnode} nodes")]
    NodeOutOfRange { face: usize, node: usize, nnode: usize },

    /// A face index referenced by a cell does not exist.
    #[error("cell {cell} references face {face}, but the mesh has {nface} faces")]
    FaceOutOfRange { cell: usize, face: usize, nface: usize },

    /// A cell index referenced by a face lies outside `[-ngstcell, ncell)`.
    #[error("face {face} references cell {cell} outside [-{ngstcell}, {ncell})")]
    CellOutOfRange {
        face: usize,
        cell: isize,
        ncell: usize,
        ngstcell: usize,
    },

    /// A cell lists a face that does not name it as one of its two cells.
    #[error("cell {cell} lists face {face}, which is not incident to it")]
    NotIncident { cell: usize, face: usize },

    /// A face does not end up with exactly two adjacent cells.
    #[error("face {face} has {count} adjacent cells, expected 2")]
    Unpaired { face: usize, count: usize },

    /// A per-cell geometry array does not match the connectivity.
    #[error("geometry array `{name}` has {actual} entries, expected {expected}")]
    SizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A conservation element has zero or negative volume.
    #[error("cell {cell} slot {slot} has non-positive volume {volume}")]
    NonPositiveVolume { cell: usize, slot: usize, volume: f64 },

    /// `cevol[icl][0]` differs from the sum of its partial volumes.
    #[error("cell {cell} total volume {total} differs from sum of parts {sum}")]
    VolumeMismatch { cell: usize, total: f64, sum: f64 },
}
