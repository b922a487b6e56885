//! Tile cover of latitude/longitude rectangles

use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::tile_id::{tiles_per_axis, UnwrappedTileId};
use crate::tiles::scanline::scan_triangle;

/// Tiles overlapped by `bounds` at `zoom`, nearest to the bounds center first.
///
/// Latitudes are clamped to the Web Mercator range. Bounds that are empty or
/// lie entirely beyond that range cover nothing. Longitudes are not wrapped,
/// so bounds past the antimeridian produce tiles in neighbouring world copies.
pub fn cover_bounds(bounds: &LatLngBounds, zoom: u8) -> Vec<UnwrappedTileId> {
    if bounds.is_empty() || bounds.is_outside_mercator() {
        return Vec::new();
    }
    let bounds = bounds.clamped();

    let tiles = cover_quad(
        bounds.north_west().to_tile_point(zoom),
        LatLng::new(bounds.north(), bounds.east()).to_tile_point(zoom),
        bounds.south_east().to_tile_point(zoom),
        LatLng::new(bounds.south(), bounds.west()).to_tile_point(zoom),
        bounds.center().to_tile_point(zoom),
        zoom,
    );
    log::debug!("cover_bounds z{}: {} tiles", zoom, tiles.len());
    tiles
}

/// Rasterizes the quad `tl, tr, br, bl` as two triangles sharing the `tl-br` diagonal
fn cover_quad(
    tl: Point,
    tr: Point,
    br: Point,
    bl: Point,
    center: Point,
    zoom: u8,
) -> Vec<UnwrappedTileId> {
    let rows = tiles_per_axis(zoom) as i64;
    let mut tiles: Vec<(f64, i64, i64)> = Vec::new();

    let mut scan_line = |x0: i64, x1: i64, y: i64| {
        if (0..=rows).contains(&y) {
            for x in x0..x1 {
                let tile_center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                tiles.push((tile_center.distance_squared_to(&center), x, y));
            }
        }
    };
    scan_triangle(tl, tr, br, 0, rows, &mut scan_line);
    scan_triangle(br, bl, tl, 0, rows, &mut scan_line);

    // Tiles on the shared diagonal are emitted twice
    tiles.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });
    tiles.dedup_by(|a, b| a.1 == b.1 && a.2 == b.2);

    tiles
        .into_iter()
        .map(|(_, x, y)| UnwrappedTileId::new(zoom, x, y))
        .collect()
}

/// Number of tiles [`cover_bounds`] would return, in constant time.
///
/// Counts the half-open column and row ranges the rasterizer fills. Columns
/// run from the unwrapped west edge to the unwrapped east edge, so bounds
/// reaching past the antimeridian include the columns of the neighbouring
/// world copy. Bounds without height cover nothing; bounds without width
/// cover one column unless they lie on a column boundary.
pub fn tile_count(bounds: &LatLngBounds, zoom: u8) -> u64 {
    if bounds.is_empty() || bounds.is_outside_mercator() {
        return 0;
    }
    let rows = tiles_per_axis(zoom) as i64;
    let sw = LatLng::new(bounds.south(), bounds.west()).to_tile_point(zoom);
    let ne = LatLng::new(bounds.north(), bounds.east()).to_tile_point(zoom);

    let width = (ne.x.ceil() as i64).saturating_sub(sw.x.floor() as i64).max(0);
    let height = if sw.y == ne.y {
        0
    } else {
        ((sw.y.ceil() as i64).min(rows) - (ne.y.floor() as i64).max(0)).max(0)
    };
    (width as u64).saturating_mul(height as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(tiles: &[UnwrappedTileId]) -> Vec<(i64, u32)> {
        tiles
            .iter()
            .map(|tile| (tile.unwrapped_x(), tile.canonical.y))
            .collect()
    }

    #[test]
    fn test_world_cover() {
        let world = LatLngBounds::world();
        assert_eq!(xy(&cover_bounds(&world, 0)), vec![(0, 0)]);
        assert_eq!(cover_bounds(&world, 1).len(), 4);
        assert_eq!(tile_count(&world, 0), 1);
        assert_eq!(tile_count(&world, 1), 4);
    }

    #[test]
    fn test_bounds_inside_single_tile() {
        let bounds = LatLngBounds::from_coords(-30.0, 10.0, -10.0, 30.0);
        assert_eq!(xy(&cover_bounds(&bounds, 3)), vec![(4, 4)]);
        assert_eq!(tile_count(&bounds, 3), 1);
    }

    #[test]
    fn test_san_francisco() {
        let bounds = LatLngBounds::from_coords(37.6609, -122.5744, 37.8271, -122.3204);
        let mut tiles = xy(&cover_bounds(&bounds, 10));
        tiles.sort();
        assert_eq!(tiles, vec![(163, 395), (163, 396), (164, 395), (164, 396)]);
        assert_eq!(tile_count(&bounds, 10), 4);
        assert_eq!(cover_bounds(&bounds, 12).len(), 12);
        assert_eq!(xy(&cover_bounds(&bounds, 5)), vec![(5, 12)]);
    }

    #[test]
    fn test_invalid_bounds_cover_nothing() {
        let inverted = LatLngBounds::from_coords(10.0, 0.0, -10.0, 5.0);
        assert!(cover_bounds(&inverted, 4).is_empty());
        assert_eq!(tile_count(&inverted, 4), 0);

        let polar = LatLngBounds::from_coords(86.0, -10.0, 89.0, 10.0);
        assert!(cover_bounds(&polar, 4).is_empty());
        assert_eq!(tile_count(&polar, 4), 0);
    }

    #[test]
    fn test_sorted_by_distance_to_center() {
        let bounds = LatLngBounds::from_coords(37.6609, -122.5744, 37.8271, -122.3204);
        let center = bounds.center().to_tile_point(12);
        let distances: Vec<f64> = cover_bounds(&bounds, 12)
            .iter()
            .map(|tile| {
                let dx = tile.unwrapped_x() as f64 + 0.5 - center.x;
                let dy = tile.canonical.y as f64 + 0.5 - center.y;
                dx * dx + dy * dy
            })
            .collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_zero_area_bounds() {
        // Zero width on the prime meridian, a column boundary at every zoom
        let meridian = LatLngBounds::from_coords(-10.0, 0.0, 10.0, 0.0);
        assert!(cover_bounds(&meridian, 4).is_empty());
        assert_eq!(tile_count(&meridian, 4), 0);

        // Zero height
        let parallel = LatLngBounds::from_coords(10.0, -20.0, 10.0, 20.0);
        assert!(cover_bounds(&parallel, 3).is_empty());
        assert_eq!(tile_count(&parallel, 3), 0);

        // Zero width inside a column: one tile per row
        let line = LatLngBounds::from_coords(-30.0, 5.0, 30.0, 5.0);
        let tiles = cover_bounds(&line, 3);
        assert_eq!(tile_count(&line, 3), tiles.len() as u64);
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|tile| tile.unwrapped_x() == 4));
    }
}
