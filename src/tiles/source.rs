use crate::core::constants::TILE_SIZE;
use serde::{Deserialize, Serialize};

/// Kind of data source a tile pyramid is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Vector,
    Raster,
    RasterDem,
    GeoJson,
    Video,
    Image,
    Annotations,
    CustomVector,
}

impl SourceKind {
    /// Whether tiles of this kind are picked at the nearest zoom rather than
    /// the zoom below. Raster imagery cannot be subdivided within a tile
    /// without visible blur.
    pub fn rounds_zoom(&self) -> bool {
        matches!(self, SourceKind::Raster | SourceKind::Video)
    }
}

/// Integer zoom whose tiles a source of `kind` should load for a camera at `zoom`.
///
/// Tile grids with tiles smaller than the 512px reference select deeper levels.
pub fn covering_zoom_level(zoom: f64, kind: SourceKind, tile_size: u16) -> i32 {
    let zoom = zoom + (TILE_SIZE / f64::from(tile_size)).log2();
    if kind.rounds_zoom() {
        zoom.round() as i32
    } else {
        zoom.floor() as i32
    }
}
