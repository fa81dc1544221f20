//! Uniform Cartesian blocks (quads in 2D, hexahedra in 3D).
//!
//! Every boundary face gets one ghost cell. With [`BoundaryKind::Periodic`]
//! the ghost is a translated image of the cell on the opposite side of the
//! domain, which makes the block a closed system once ghost states are
//! refreshed from their sources. With [`BoundaryKind::Mirror`] the ghost
//! solution point is mirrored across the boundary face.

use super::builder::{GhostKind, MeshBuilder};
use super::error::MeshError;
use super::geometry::MeshBlock;
use crate::types::{Dim2, Dim3};

/// Treatment of the domain boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Opposite sides are identified through translated ghost images.
    Periodic,
    /// Ghost solution points are mirrored across the boundary face.
    Mirror,
}

/// Generator for uniform Cartesian blocks anchored at the origin.
pub struct CartesianMesh;

impl CartesianMesh {
    /// `nx × ny` quadrilaterals covering `[0, lx] × [0, ly]`.
    ///
    /// Face slots of each cell are ordered south, east, north, west.
    pub fn quads(
        nx: usize,
        ny: usize,
        lengths: [f64; 2],
        boundary: BoundaryKind,
    ) -> Result<MeshBlock<Dim2>, MeshError> {
        check_block(&[nx, ny], &lengths)?;
        let dx = lengths[0] / nx as f64;
        let dy = lengths[1] / ny as f64;

        let mut b = MeshBuilder::<Dim2>::new();
        for j in 0..=ny {
            for i in 0..=nx {
                b.add_node([i as f64 * dx, j as f64 * dy]);
            }
        }
        let node = |i: usize, j: usize| j * (nx + 1) + i;

        // Faces normal to x at column i, and normal to y at row j.
        let mut xface = vec![0; (nx + 1) * ny];
        for j in 0..ny {
            for i in 0..=nx {
                xface[j * (nx + 1) + i] = b.add_face(&[node(i, j), node(i, j + 1)])?;
            }
        }
        let mut yface = vec![0; nx * (ny + 1)];
        for j in 0..=ny {
            for i in 0..nx {
                yface[j * nx + i] = b.add_face(&[node(i, j), node(i + 1, j)])?;
            }
        }
        let xf = |i: usize, j: usize| xface[j * (nx + 1) + i];
        let yf = |i: usize, j: usize| yface[j * nx + i];
        let cell = |i: usize, j: usize| j * nx + i;

        for j in 0..ny {
            for i in 0..nx {
                b.add_cell(&[yf(i, j), xf(i + 1, j), yf(i, j + 1), xf(i, j)])?;
            }
        }

        let ghost = |partner: usize, offset: [f64; 2]| -> GhostKind<Dim2> {
            match boundary {
                BoundaryKind::Periodic => GhostKind::Image { partner, offset },
                BoundaryKind::Mirror => GhostKind::Mirror,
            }
        };
        for j in 0..ny {
            b.add_ghost(xf(0, j), ghost(cell(nx - 1, j), [-lengths[0], 0.0]));
            b.add_ghost(xf(nx, j), ghost(cell(0, j), [lengths[0], 0.0]));
        }
        for i in 0..nx {
            b.add_ghost(yf(i, 0), ghost(cell(i, ny - 1), [0.0, -lengths[1]]));
            b.add_ghost(yf(i, ny), ghost(cell(i, 0), [0.0, lengths[1]]));
        }
        b.build()
    }

    /// `n[0] × n[1] × n[2]` hexahedra covering `[0, lengths]`.
    ///
    /// Face slots of each cell are ordered x-, x+, y-, y+, z-, z+.
    pub fn hexes(
        n: [usize; 3],
        lengths: [f64; 3],
        boundary: BoundaryKind,
    ) -> Result<MeshBlock<Dim3>, MeshError> {
        let [nx, ny, nz] = n;
        check_block(&n, &lengths)?;
        let h = [
            lengths[0] / nx as f64,
            lengths[1] / ny as f64,
            lengths[2] / nz as f64,
        ];

        let mut b = MeshBuilder::<Dim3>::new();
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    b.add_node([i as f64 * h[0], j as f64 * h[1], k as f64 * h[2]]);
                }
            }
        }
        let node = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;

        let mut xface = vec![0; (nx + 1) * ny * nz];
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..=nx {
                    xface[(k * ny + j) * (nx + 1) + i] = b.add_face(&[
                        node(i, j, k),
                        node(i, j + 1, k),
                        node(i, j + 1, k + 1),
                        node(i, j, k + 1),
                    ])?;
                }
            }
        }
        let mut yface = vec![0; nx * (ny + 1) * nz];
        for k in 0..nz {
            for j in 0..=ny {
                for i in 0..nx {
                    yface[(k * (ny + 1) + j) * nx + i] = b.add_face(&[
                        node(i, j, k),
                        node(i + 1, j, k),
                        node(i + 1, j, k + 1),
                        node(i, j, k + 1),
                    ])?;
                }
            }
        }
        let mut zface = vec![0; nx * ny * (nz + 1)];
        for k in 0..=nz {
            for j in 0..ny {
                for i in 0..nx {
                    zface[(k * ny + j) * nx + i] = b.add_face(&[
                        node(i, j, k),
                        node(i + 1, j, k),
                        node(i + 1, j + 1, k),
                        node(i, j + 1, k),
                    ])?;
                }
            }
        }
        let xf = |i: usize, j: usize, k: usize| xface[(k * ny + j) * (nx + 1) + i];
        let yf = |i: usize, j: usize, k: usize| yface[(k * (ny + 1) + j) * nx + i];
        let zf = |i: usize, j: usize, k: usize| zface[(k * ny + j) * nx + i];
        let cell = |i: usize, j: usize, k: usize| (k * ny + j) * nx + i;

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    b.add_cell(&[
                        xf(i, j, k),
                        xf(i + 1, j, k),
                        yf(i, j, k),
                        yf(i, j + 1, k),
                        zf(i, j, k),
                        zf(i, j, k + 1),
                    ])?;
                }
            }
        }

        let ghost = |partner: usize, offset: [f64; 3]| -> GhostKind<Dim3> {
            match boundary {
                BoundaryKind::Periodic => GhostKind::Image { partner, offset },
                BoundaryKind::Mirror => GhostKind::Mirror,
            }
        };
        let [lx, ly, lz] = lengths;
        for k in 0..nz {
            for j in 0..ny {
                b.add_ghost(xf(0, j, k), ghost(cell(nx - 1, j, k), [-lx, 0.0, 0.0]));
                b.add_ghost(xf(nx, j, k), ghost(cell(0, j, k), [lx, 0.0, 0.0]));
            }
        }
        for k in 0..nz {
            for i in 0..nx {
                b.add_ghost(yf(i, 0, k), ghost(cell(i, ny - 1, k), [0.0, -ly, 0.0]));
                b.add_ghost(yf(i, ny, k), ghost(cell(i, 0, k), [0.0, ly, 0.0]));
            }
        }
        for j in 0..ny {
            for i in 0..nx {
                b.add_ghost(zf(i, j, 0), ghost(cell(i, j, nz - 1), [0.0, 0.0, -lz]));
                b.add_ghost(zf(i, j, nz), ghost(cell(i, j, 0), [0.0, 0.0, lz]));
            }
        }
        b.build()
    }

    /// A single tetrahedron with a mirrored ghost behind each of its 4 faces.
    pub fn tetrahedron(vertices: [[f64; 3]; 4]) -> Result<MeshBlock<Dim3>, MeshError> {
        let mut b = MeshBuilder::<Dim3>::new();
        let n: Vec<usize> = vertices.iter().map(|&v| b.add_node(v)).collect();
        let faces = [
            b.add_face(&[n[0], n[2], n[1]])?,
            b.add_face(&[n[0], n[1], n[3]])?,
            b.add_face(&[n[0], n[3], n[2]])?,
            b.add_face(&[n[1], n[2], n[3]])?,
        ];
        b.add_cell(&faces)?;
        for face in faces {
            b.add_ghost(face, GhostKind::Mirror);
        }
        b.build()
    }
}

/// Every axis needs at least one cell and a positive, finite extent.
fn check_block(counts: &[usize], lengths: &[f64]) -> Result<(), MeshError> {
    if let Some(axis) = counts.iter().position(|&n| n == 0) {
        return Err(MeshError::EmptyAxis { axis });
    }
    for (axis, &length) in lengths.iter().enumerate() {
        if !(length > 0.0 && length.is_finite()) {
            return Err(MeshError::InvalidExtent { axis, length });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quad_counts() {
        let mesh = CartesianMesh::quads(3, 2, [3.0, 2.0], BoundaryKind::Periodic).unwrap();
        assert_eq!(mesh.ncell(), 6);
        assert_eq!(mesh.ngstcell(), 2 * 2 + 2 * 3);
        assert_eq!(mesh.conn.nface(), 4 * 2 + 3 * 3);
        for icl in 0..6 {
            assert_relative_eq!(mesh.geom.clvol[icl], 1.0, epsilon = 1e-14);
            assert_relative_eq!(mesh.geom.cevol[icl][0], 2.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_periodic_images_translate_partner() {
        let mesh = CartesianMesh::quads(3, 2, [3.0, 2.0], BoundaryKind::Periodic).unwrap();
        // Ghost -1 sits west of cell 0 as an image of cell 2.
        assert_eq!(mesh.ghost_sources[0], 2);
        let g = mesh.geom.solution_point(-1);
        assert_relative_eq!(g[0], -0.5, epsilon = 1e-14);
        assert_relative_eq!(g[1], 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_mirror_matches_periodic_on_uniform_grid() {
        // On a uniform grid both ghost placements coincide geometrically.
        let p = CartesianMesh::quads(2, 2, [1.0, 1.0], BoundaryKind::Periodic).unwrap();
        let m = CartesianMesh::quads(2, 2, [1.0, 1.0], BoundaryKind::Mirror).unwrap();
        for k in 1..=p.ngstcell() as isize {
            let a = p.geom.solution_point(-k);
            let b = m.geom.solution_point(-k);
            assert_relative_eq!(a[0], b[0], epsilon = 1e-14);
            assert_relative_eq!(a[1], b[1], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_hex_block() {
        let mesh = CartesianMesh::hexes([2, 2, 2], [1.0, 1.0, 1.0], BoundaryKind::Mirror).unwrap();
        assert_eq!(mesh.ncell(), 8);
        assert_eq!(mesh.ngstcell(), 6 * 4);
        for icl in 0..8 {
            assert_relative_eq!(mesh.geom.clvol[icl], 0.125, epsilon = 1e-14);
            assert_relative_eq!(mesh.geom.cevol[icl][0], 0.25, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_bad_block_arguments_rejected() {
        assert_eq!(
            CartesianMesh::quads(3, 0, [1.0, 1.0], BoundaryKind::Mirror).unwrap_err(),
            MeshError::EmptyAxis { axis: 1 }
        );
        assert_eq!(
            CartesianMesh::quads(2, 2, [-1.0, 1.0], BoundaryKind::Periodic).unwrap_err(),
            MeshError::InvalidExtent { axis: 0, length: -1.0 }
        );
        assert_eq!(
            CartesianMesh::hexes([1, 1, 0], [1.0, 1.0, 1.0], BoundaryKind::Mirror).unwrap_err(),
            MeshError::EmptyAxis { axis: 2 }
        );
        assert!(matches!(
            CartesianMesh::hexes([1, 1, 1], [1.0, f64::NAN, 1.0], BoundaryKind::Mirror),
            Err(MeshError::InvalidExtent { axis: 1, .. })
        ));
        assert!(matches!(
            CartesianMesh::hexes([1, 1, 1], [1.0, 1.0, 0.0], BoundaryKind::Periodic),
            Err(MeshError::InvalidExtent { axis: 2, .. })
        ));
    }

    #[test]
    fn test_tetrahedron_has_four_faces() {
        let mesh = CartesianMesh::tetrahedron([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
        .unwrap();
        assert_eq!(mesh.conn.cell_faces(0).len(), 4);
        assert_eq!(mesh.ngstcell(), 4);
    }
}
