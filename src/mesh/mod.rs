//! Mesh representation.
//!
//! Provides the read-only mesh data the CESE kernels consume:
//! - Cell/face connectivity with ghost cells at negative indices
//! - CESE dual-mesh geometry (solution points, CE volumes, sub-faces)
//! - A small assembler for building blocks from nodes, faces and cells
//! - Uniform Cartesian reference blocks for tests and benchmarks

mod builder;
mod cartesian;
mod connectivity;
mod error;
mod geometry;

pub use builder::{GhostKind, MeshBuilder};
pub use cartesian::{BoundaryKind, CartesianMesh};
pub use connectivity::{CLMFC, FCMND, FCREL, MeshConnectivity};
pub use error::MeshError;
pub use geometry::{CeseGeometry, MeshBlock, SubFace, SubFaceTable};
