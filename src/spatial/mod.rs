//! Geometric primitives used by the frustum cover

pub mod aabb;
pub mod frustum;

pub use aabb::Aabb;
pub use frustum::{Frustum, IntersectionResult};
