//! Assemble connectivity and CESE geometry from nodes, faces and cells.
//!
//! This is a reference assembler for small meshes (tests, benchmarks,
//! synthetic blocks). Cell solution points are the average of the cell's
//! nodes; ghost solution points are either the mirror image of the interior
//! solution point across the boundary face, or a translated copy of a partner
//! cell (periodic images).

use std::collections::BTreeSet;

use log::debug;

use super::connectivity::{MeshConnectivity, CLMFC, FCMND, FCREL};
use super::error::MeshError;
use super::geometry::{CeseGeometry, MeshBlock, SubFace};
use crate::types::{add, dot, mean, reflect, sub, SpaceDim};

/// How a ghost cell behind a boundary face is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GhostKind<D: SpaceDim> {
    /// Solution point mirrored across the face; state replicated from the
    /// interior cell that owns the face.
    Mirror,
    /// Translated image of an interior `partner` cell; solution point is the
    /// partner's plus `offset`, state replicated from the partner.
    Image { partner: usize, offset: D::Coord },
}

#[derive(Clone, Debug)]
struct GhostSpec<D: SpaceDim> {
    face: usize,
    kind: GhostKind<D>,
}

/// Incremental mesh assembler.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder<D: SpaceDim> {
    nodes: Vec<D::Coord>,
    faces: Vec<Vec<usize>>,
    cells: Vec<Vec<usize>>,
    ghosts: Vec<GhostSpec<D>>,
}

impl<D: SpaceDim> MeshBuilder<D> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            faces: Vec::new(),
            cells: Vec::new(),
            ghosts: Vec::new(),
        }
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, coord: D::Coord) -> usize {
        self.nodes.push(coord);
        self.nodes.len() - 1
    }

    /// Add a face given as an ordered node loop (2D: the two edge nodes).
    pub fn add_face(&mut self, nodes: &[usize]) -> Result<usize, MeshError> {
        let face = self.faces.len();
        if nodes.len() > FCMND {
            return Err(MeshError::TooManyNodes {
                face,
                count: nodes.len(),
                max: FCMND,
            });
        }
        if nodes.len() < D::NDIM {
            return Err(MeshError::TooFewNodes {
                face,
                count: nodes.len(),
                min: D::NDIM,
            });
        }
        if let Some(&node) = nodes.iter().find(|&&n| n >= self.nodes.len()) {
            return Err(MeshError::NodeOutOfRange {
                face,
                node,
                nnode: self.nodes.len(),
            });
        }
        self.faces.push(nodes.to_vec());
        Ok(face)
    }

    /// Add an interior cell bounded by `faces`, returning its index.
    ///
    /// Face order defines the face slots `1..=nface` of the cell.
    pub fn add_cell(&mut self, faces: &[usize]) -> Result<usize, MeshError> {
        let cell = self.cells.len();
        if faces.len() > CLMFC {
            return Err(MeshError::TooManyFaces {
                cell,
                count: faces.len(),
                max: CLMFC,
            });
        }
        if let Some(&face) = faces.iter().find(|&&f| f >= self.faces.len()) {
            return Err(MeshError::FaceOutOfRange {
                cell,
                face,
                nface: self.faces.len(),
            });
        }
        self.cells.push(faces.to_vec());
        Ok(cell)
    }

    /// Put a ghost cell behind boundary `face`, returning its (negative) index.
    pub fn add_ghost(&mut self, face: usize, kind: GhostKind<D>) -> isize {
        self.ghosts.push(GhostSpec { face, kind });
        -(self.ghosts.len() as isize)
    }

    /// Resolve adjacency and compute the CESE geometry.
    pub fn build(self) -> Result<MeshBlock<D>, MeshError> {
        let ncell = self.cells.len();
        let ngstcell = self.ghosts.len();
        let nface = self.faces.len();

        // Face -> adjacent cells, interior owners first.
        let mut adjacent: Vec<Vec<isize>> = vec![Vec::with_capacity(FCREL); nface];
        for (icl, faces) in self.cells.iter().enumerate() {
            for &ifc in faces {
                adjacent[ifc].push(icl as isize);
            }
        }
        for (k, ghost) in self.ghosts.iter().enumerate() {
            if ghost.face >= nface {
                return Err(MeshError::SizeMismatch {
                    name: "ghost face",
                    expected: nface,
                    actual: ghost.face,
                });
            }
            adjacent[ghost.face].push(-(k as isize + 1));
        }
        let mut fccls = Vec::with_capacity(nface);
        for (ifc, cells) in adjacent.iter().enumerate() {
            if cells.len() != FCREL {
                return Err(MeshError::Unpaired {
                    face: ifc,
                    count: cells.len(),
                });
            }
            fccls.push([cells[0], cells[1]]);
        }

        let mut clfcs = Vec::with_capacity(ncell);
        for faces in &self.cells {
            let mut row = [0; CLMFC + 1];
            row[0] = faces.len();
            row[1..=faces.len()].copy_from_slice(faces);
            clfcs.push(row);
        }
        let mut fcnds = Vec::with_capacity(nface);
        for nodes in &self.faces {
            let mut row = [0; FCMND + 1];
            row[0] = nodes.len();
            row[1..=nodes.len()].copy_from_slice(nodes);
            fcnds.push(row);
        }
        let conn = MeshConnectivity {
            ncell,
            ngstcell,
            clfcs,
            fcnds,
            fccls,
        };
        conn.validate()?;

        let mut geom = CeseGeometry::<D>::zeroed(ncell, ngstcell);
        let mut polygon: Vec<D::Coord> = Vec::with_capacity(FCMND);

        // Interior solution points and primal volumes.
        for (icl, faces) in self.cells.iter().enumerate() {
            let unique: BTreeSet<usize> = faces
                .iter()
                .flat_map(|&ifc| self.faces[ifc].iter().copied())
                .collect();
            let points: Vec<D::Coord> = unique.iter().map(|&n| self.nodes[n]).collect();
            let center = mean::<D>(&points);
            let mut volume = 0.0;
            for &ifc in faces {
                self.face_polygon(ifc, &mut polygon);
                volume += D::pyramid(&center, &polygon).0;
            }
            geom.cecnd[icl as isize] = [center; CLMFC + 1];
            geom.clvol[icl as isize] = volume;
        }

        // Ghost solution points.
        let mut ghost_sources = Vec::with_capacity(ngstcell);
        for (k, ghost) in self.ghosts.iter().enumerate() {
            let jcl = -(k as isize + 1);
            let (center, source) = match ghost.kind {
                GhostKind::Mirror => {
                    let owner = conn.neighbor(ghost.face, jcl);
                    if owner < 0 {
                        return Err(MeshError::CellOutOfRange {
                            face: ghost.face,
                            cell: owner,
                            ncell,
                            ngstcell,
                        });
                    }
                    self.face_polygon(ghost.face, &mut polygon);
                    let normal = D::face_normal(&polygon);
                    let on_plane = mean::<D>(&polygon);
                    let inner = *geom.solution_point(owner);
                    (reflect::<D>(&inner, &on_plane, &normal), owner as usize)
                }
                GhostKind::Image { partner, offset } => {
                    if partner >= ncell {
                        return Err(MeshError::CellOutOfRange {
                            face: ghost.face,
                            cell: partner as isize,
                            ncell,
                            ngstcell,
                        });
                    }
                    let base = *geom.solution_point(partner as isize);
                    (add::<D>(&base, &offset), partner)
                }
            };
            geom.cecnd[jcl] = [center; CLMFC + 1];
            geom.clvol[jcl] = geom.clvol[source as isize];
            ghost_sources.push(source);
        }

        // Conservation elements and their lateral sub-faces.
        let mut lateral = Vec::with_capacity(FCMND);
        for icl in 0..ncell {
            let ci = *geom.solution_point(icl as isize);
            let mut total = 0.0;
            for (slot, &ifc) in conn.cell_faces(icl).iter().enumerate() {
                let ifl = slot + 1;
                let jcl = conn.neighbor(ifc, icl as isize);
                let cj = *geom.solution_point(jcl);
                self.face_polygon(ifc, &mut polygon);

                let (vi, pi) = D::pyramid(&ci, &polygon);
                let (vj, pj) = D::pyramid(&cj, &polygon);
                let vol = vi + vj;
                let mut centroid = D::ORIGIN;
                for d in 0..D::NDIM {
                    centroid[d] = (vi * pi[d] + vj * pj[d]) / vol;
                }
                geom.cecnd[icl as isize][ifl] = centroid;
                geom.cevol[icl as isize][ifl] = vol;
                total += vol;

                lateral.clear();
                D::lateral_subfaces(&cj, &polygon, &mut lateral);
                for (inf, &(mid, normal)) in lateral.iter().enumerate() {
                    // Outward from the neighbor-side pyramid, hence from the CE.
                    let outward = dot::<D>(&normal, &sub::<D>(&mid, &pj)) >= 0.0;
                    let mut oriented = normal;
                    if !outward {
                        for d in 0..D::NDIM {
                            oriented[d] = -normal[d];
                        }
                    }
                    geom.sfmrc[icl][slot][inf] = SubFace {
                        mid,
                        normal: oriented,
                    };
                }
            }
            geom.cevol[icl as isize][0] = total;
        }

        let block = MeshBlock {
            conn,
            geom,
            ghost_sources,
        };
        block.validate()?;
        debug!(
            "assembled mesh block: {} cells, {} ghosts, {} faces",
            ncell, ngstcell, nface
        );
        Ok(block)
    }

    fn face_polygon(&self, ifc: usize, out: &mut Vec<D::Coord>) {
        out.clear();
        out.extend(self.faces[ifc].iter().map(|&n| self.nodes[n]));
    }
}
