//! # tilecover
//!
//! Decides which tiles of a quadtree tile pyramid a map renderer needs.
//!
//! Two independent engines are provided:
//! - a frustum-adaptive quadtree traversal that covers everything visible
//!   through a camera, at a level of detail that decreases with distance
//!   from the view center, and
//! - a scanline rasterizer that converts lat/lng bounds or arbitrary
//!   geometries into the tiles they overlap, eagerly, lazily or as a count.
//!
//! Both are pure functions of their inputs: nothing is cached between calls
//! and every call may run on its own thread.

pub mod core;
pub mod prelude;
pub mod spatial;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{TileLodOptions, TileLodProfile},
    geo::{LatLng, LatLngBounds, Point},
    tile_id::{CanonicalTileId, OverscaledTileId, UnwrappedTileId},
    viewport::{Viewport, ViewportMode},
};

pub use spatial::{aabb::Aabb, frustum::Frustum, frustum::IntersectionResult};

pub use tiles::{
    bounds::{cover_bounds, tile_count},
    frustum::{cover_frustum, TileCoverParameters},
    geometry::{cover_geometry, geometry_tile_count, TileCover},
    source::{covering_zoom_level, SourceKind},
};

pub use traits::ViewState;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid tile: {z}/{x}/{y} is outside the tile pyramid")]
    InvalidTile { z: u8, x: u32, y: u32 },
}
