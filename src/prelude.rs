//! Prelude module for common tilecover types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tilecover::prelude::*;`

pub use crate::core::{
    config::{TileLodOptions, TileLodProfile},
    geo::{LatLng, LatLngBounds, Point},
    tile_id::{CanonicalTileId, OverscaledTileId, UnwrappedTileId},
    viewport::{Viewport, ViewportMode},
};

pub use crate::spatial::{Aabb, Frustum, IntersectionResult};

pub use crate::tiles::{
    cover_bounds, cover_frustum, cover_geometry, covering_zoom_level, geometry_tile_count,
    tile_count, SourceKind, TileCover, TileCoverParameters,
};

pub use crate::traits::ViewState;

pub use crate::{Error, Result};
