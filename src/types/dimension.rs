//! Compile-time spatial dimension.
//!
//! The kernels are generic over a [`SpaceDim`] marker so that every loop over
//! spatial components has a constant trip count and no runtime branching on
//! the dimension. [`Dim2`] and [`Dim3`] are the two supported instances.
//!
//! Besides the coordinate type, the trait carries the handful of geometric
//! primitives the CESE dual-mesh builder needs (pyramid volumes, lateral
//! sub-faces, face normals). These differ between 2D (triangles over edges)
//! and 3D (pyramids over polygons).

use std::fmt;
use std::ops::{Index, IndexMut};

/// A spatial dimension known at compile time.
pub trait SpaceDim: Copy + Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Number of spatial components.
    const NDIM: usize;

    /// Coordinate / vector type, `[f64; NDIM]`.
    type Coord: Copy
        + fmt::Debug
        + PartialEq
        + Send
        + Sync
        + AsRef<[f64]>
        + AsMut<[f64]>
        + Index<usize, Output = f64>
        + IndexMut<usize>;

    /// The zero vector.
    const ORIGIN: Self::Coord;

    /// Volume and centroid of the pyramid (2D: triangle) spanned by `apex`
    /// and the face polygon `face` (2D: the two edge end points).
    fn pyramid(apex: &Self::Coord, face: &[Self::Coord]) -> (f64, Self::Coord);

    /// Area-weighted normal of a face (2D: edge) given as an ordered node loop.
    ///
    /// The orientation follows the node ordering; callers orient it.
    fn face_normal(face: &[Self::Coord]) -> Self::Coord;

    /// Lateral sub-faces of the pyramid with apex `apex` over `face`.
    ///
    /// One sub-face per face node: in 2D the segment from the apex to the
    /// node, in 3D the triangle from the apex to the edge starting at the
    /// node. Each entry is `(centroid, area-weighted normal)`, with the normal
    /// not yet oriented.
    fn lateral_subfaces(apex: &Self::Coord, face: &[Self::Coord], out: &mut Vec<(Self::Coord, Self::Coord)>);
}

/// Two spatial dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dim2;

/// Three spatial dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dim3;

impl SpaceDim for Dim2 {
    const NDIM: usize = 2;
    type Coord = [f64; 2];
    const ORIGIN: Self::Coord = [0.0; 2];

    fn pyramid(apex: &[f64; 2], face: &[[f64; 2]]) -> (f64, [f64; 2]) {
        let (a, b) = (face[0], face[1]);
        let area = 0.5 * cross2(&sub::<Dim2>(&a, apex), &sub::<Dim2>(&b, apex)).abs();
        let centroid = [
            (apex[0] + a[0] + b[0]) / 3.0,
            (apex[1] + a[1] + b[1]) / 3.0,
        ];
        (area, centroid)
    }

    fn face_normal(face: &[[f64; 2]]) -> [f64; 2] {
        let d = sub::<Dim2>(&face[1], &face[0]);
        [d[1], -d[0]]
    }

    fn lateral_subfaces(apex: &[f64; 2], face: &[[f64; 2]], out: &mut Vec<([f64; 2], [f64; 2])>) {
        for node in face {
            let d = sub::<Dim2>(node, apex);
            let mid = [0.5 * (apex[0] + node[0]), 0.5 * (apex[1] + node[1])];
            out.push((mid, [d[1], -d[0]]));
        }
    }
}

impl SpaceDim for Dim3 {
    const NDIM: usize = 3;
    type Coord = [f64; 3];
    const ORIGIN: Self::Coord = [0.0; 3];

    fn pyramid(apex: &[f64; 3], face: &[[f64; 3]]) -> (f64, [f64; 3]) {
        // Fan the polygon around its node average into tetrahedra.
        let center = mean::<Dim3>(face);
        let mut volume = 0.0;
        let mut moment = [0.0; 3];
        for k in 0..face.len() {
            let a = face[k];
            let b = face[(k + 1) % face.len()];
            let v = triple(
                &sub::<Dim3>(&center, apex),
                &sub::<Dim3>(&a, apex),
                &sub::<Dim3>(&b, apex),
            )
            .abs()
                / 6.0;
            for d in 0..3 {
                moment[d] += v * 0.25 * (apex[d] + center[d] + a[d] + b[d]);
            }
            volume += v;
        }
        (volume, scale::<Dim3>(&moment, 1.0 / volume))
    }

    fn face_normal(face: &[[f64; 3]]) -> [f64; 3] {
        // Newell's method; exact for planar polygons.
        let mut n = [0.0; 3];
        for k in 0..face.len() {
            let a = face[k];
            let b = face[(k + 1) % face.len()];
            n[0] += (a[1] - b[1]) * (a[2] + b[2]);
            n[1] += (a[2] - b[2]) * (a[0] + b[0]);
            n[2] += (a[0] - b[0]) * (a[1] + b[1]);
        }
        scale::<Dim3>(&n, 0.5)
    }

    fn lateral_subfaces(apex: &[f64; 3], face: &[[f64; 3]], out: &mut Vec<([f64; 3], [f64; 3])>) {
        for k in 0..face.len() {
            let a = face[k];
            let b = face[(k + 1) % face.len()];
            let n = cross3(&sub::<Dim3>(&a, apex), &sub::<Dim3>(&b, apex));
            let mid = [
                (apex[0] + a[0] + b[0]) / 3.0,
                (apex[1] + a[1] + b[1]) / 3.0,
                (apex[2] + a[2] + b[2]) / 3.0,
            ];
            out.push((mid, scale::<Dim3>(&n, 0.5)));
        }
    }
}

/// Dot product.
#[inline(always)]
pub fn dot<D: SpaceDim>(a: &D::Coord, b: &D::Coord) -> f64 {
    let mut s = 0.0;
    for d in 0..D::NDIM {
        s += a[d] * b[d];
    }
    s
}

/// Component-wise `a - b`.
#[inline(always)]
pub fn sub<D: SpaceDim>(a: &D::Coord, b: &D::Coord) -> D::Coord {
    let mut r = D::ORIGIN;
    for d in 0..D::NDIM {
        r[d] = a[d] - b[d];
    }
    r
}

/// Component-wise `a + b`.
#[inline(always)]
pub fn add<D: SpaceDim>(a: &D::Coord, b: &D::Coord) -> D::Coord {
    let mut r = D::ORIGIN;
    for d in 0..D::NDIM {
        r[d] = a[d] + b[d];
    }
    r
}

/// `s * a`.
#[inline(always)]
pub fn scale<D: SpaceDim>(a: &D::Coord, s: f64) -> D::Coord {
    let mut r = D::ORIGIN;
    for d in 0..D::NDIM {
        r[d] = s * a[d];
    }
    r
}

/// Euclidean norm.
#[inline(always)]
pub fn norm<D: SpaceDim>(a: &D::Coord) -> f64 {
    dot::<D>(a, a).sqrt()
}

/// Euclidean distance between two points.
#[inline(always)]
pub fn distance<D: SpaceDim>(a: &D::Coord, b: &D::Coord) -> f64 {
    norm::<D>(&sub::<D>(a, b))
}

/// Arithmetic mean of a set of points.
pub fn mean<D: SpaceDim>(points: &[D::Coord]) -> D::Coord {
    let mut r = D::ORIGIN;
    for p in points {
        r = add::<D>(&r, p);
    }
    scale::<D>(&r, 1.0 / points.len() as f64)
}

/// Reflect `point` across the hyperplane through `on_plane` with normal `normal`.
pub fn reflect<D: SpaceDim>(point: &D::Coord, on_plane: &D::Coord, normal: &D::Coord) -> D::Coord {
    let nn = dot::<D>(normal, normal);
    let t = 2.0 * dot::<D>(&sub::<D>(point, on_plane), normal) / nn;
    sub::<D>(point, &scale::<D>(normal, t))
}

#[inline(always)]
fn cross2(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

#[inline(always)]
fn cross3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline(always)]
fn triple(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let bc = cross3(b, c);
    a[0] * bc[0] + a[1] * bc[1] + a[2] * bc[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_pyramid() {
        let (area, c) = Dim2::pyramid(&[0.0, 0.0], &[[1.0, 0.0], [0.0, 1.0]]);
        assert_relative_eq!(area, 0.5);
        assert_relative_eq!(c[0], 1.0 / 3.0);
        assert_relative_eq!(c[1], 1.0 / 3.0);
    }

    #[test]
    fn test_unit_cube_half_pyramid() {
        // Apex at the cube center over the bottom face: 1/6 of the cube.
        let face = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let (vol, c) = Dim3::pyramid(&[0.5, 0.5, 0.5], &face);
        assert_relative_eq!(vol, 1.0 / 6.0, epsilon = 1e-14);
        assert_relative_eq!(c[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(c[1], 0.5, epsilon = 1e-14);
        // Pyramid centroid sits at a quarter of the height from the base.
        assert_relative_eq!(c[2], 0.125, epsilon = 1e-14);
    }

    #[test]
    fn test_newell_normal_area() {
        let face = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 3.0, 0.0],
            [0.0, 3.0, 0.0],
        ];
        let n = Dim3::face_normal(&face);
        assert_relative_eq!(n[2].abs(), 6.0, epsilon = 1e-14);
        assert_relative_eq!(n[0], 0.0);
        assert_relative_eq!(n[1], 0.0);
    }

    #[test]
    fn test_reflect_across_line() {
        let p = reflect::<Dim2>(&[0.25, 0.5], &[1.0, 0.0], &[1.0, 0.0]);
        assert_relative_eq!(p[0], 1.75);
        assert_relative_eq!(p[1], 0.5);
    }

    #[test]
    fn test_lateral_subfaces_close_pyramid() {
        // Lateral faces plus the base form a closed surface: area vectors sum to zero
        // once oriented outward.
        let apex = [0.2, 0.3, 1.0];
        let face = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let (_, pc) = Dim3::pyramid(&apex, &face);
        let mut subs = Vec::new();
        Dim3::lateral_subfaces(&apex, &face, &mut subs);
        assert_eq!(subs.len(), 4);
        let mut total = [0.0; 3];
        for (mid, n) in &subs {
            let sign = if dot::<Dim3>(n, &sub::<Dim3>(mid, &pc)) < 0.0 { -1.0 } else { 1.0 };
            total = add::<Dim3>(&total, &scale::<Dim3>(n, sign));
        }
        // Outward base normal points down with area 1.
        assert_relative_eq!(total[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(total[1], 0.0, epsilon = 1e-14);
        assert_relative_eq!(total[2], 1.0, epsilon = 1e-14);
    }
}
