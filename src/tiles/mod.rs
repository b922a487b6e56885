pub mod bounds;
pub mod frustum;
pub mod geometry;
pub mod scanline;
pub mod source;

// Re-exports for convenience
pub use bounds::{cover_bounds, tile_count};
pub use frustum::{cover_frustum, TileCoverParameters};
pub use geometry::{cover_geometry, geometry_tile_count, TileCover};
pub use source::{covering_zoom_level, SourceKind};
