//! Shared low-level types.
//!
//! The spatial dimension is a compile-time marker ([`Dim2`], [`Dim3`]) so
//! that every per-dimension loop in the kernels has a constant trip count.
//! The small vector helpers operate on `D::Coord` for any [`SpaceDim`].

mod dimension;

pub use dimension::{Dim2, Dim3, SpaceDim, add, distance, dot, mean, norm, reflect, scale, sub};
