//! Level-of-detail tile cover of a camera frustum
//!
//! The tile quadtree is walked from the zoom 0 root of every nearby world
//! copy. Nodes outside the frustum are culled; nodes far enough from the
//! view center stop splitting early, so detail drops with distance when the
//! camera is pitched.

use crate::core::config::{TileLodOptions, TileLodProfile};
use crate::core::constants::{MAX_ZOOM, WORLD_COPIES};
use crate::core::geo::Point;
use crate::core::tile_id::OverscaledTileId;
use crate::core::viewport::ViewportMode;
use crate::spatial::aabb::Aabb;
use crate::spatial::frustum::{Frustum, IntersectionResult};
use crate::traits::ViewState;
use nalgebra::Vector3;

/// Inputs of [`cover_frustum`]: a borrowed camera and LOD tuning
#[derive(Debug, Clone)]
pub struct TileCoverParameters<'a, V: ViewState + ?Sized> {
    pub view: &'a V,
    pub lod: TileLodOptions,
}

impl<'a, V: ViewState + ?Sized> TileCoverParameters<'a, V> {
    pub fn new(view: &'a V) -> Self {
        Self {
            view,
            lod: TileLodOptions::default(),
        }
    }

    pub fn with_profile(view: &'a V, profile: &TileLodProfile) -> Self {
        Self {
            view,
            lod: profile.resolve(),
        }
    }

    pub fn with_options(view: &'a V, lod: TileLodOptions) -> Self {
        Self { view, lod }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    aabb: Aabb,
    zoom: u8,
    x: u32,
    y: u32,
    wrap: i32,
    fully_visible: bool,
}

impl Node {
    fn root(wrap: i32, world: f64) -> Self {
        Self {
            aabb: Aabb::new(
                Vector3::new(f64::from(wrap) * world, 0.0, 0.0),
                Vector3::new(f64::from(wrap + 1) * world, world, 0.0),
            ),
            zoom: 0,
            x: 0,
            y: 0,
            wrap,
            fully_visible: false,
        }
    }

    fn child(&self, index: usize) -> Self {
        Self {
            aabb: self.aabb.quadrant(index),
            zoom: self.zoom + 1,
            x: (self.x << 1) + (index % 2) as u32,
            y: (self.y << 1) + (index >> 1) as u32,
            ..*self
        }
    }
}

/// Tiles visible through the camera, nearest to the view center first.
///
/// Tiles at the maximum `zoom` are reported with `overscaled_zoom` (when
/// larger) as their overscaled zoom; coarser distant tiles keep their own
/// zoom. Below the pitch threshold every tile is at `zoom`.
///
/// # Panics
///
/// Panics when `params.lod.min_radius < 1` or `zoom > MAX_ZOOM`.
pub fn cover_frustum<V: ViewState + ?Sized>(
    params: &TileCoverParameters<'_, V>,
    zoom: u8,
    overscaled_zoom: Option<u8>,
) -> Vec<OverscaledTileId> {
    assert!(
        params.lod.min_radius >= 1.0,
        "tile LOD min radius must be at least 1, got {}",
        params.lod.min_radius
    );
    assert!(zoom <= MAX_ZOOM, "zoom {} exceeds {}", zoom, MAX_ZOOM);

    let view = params.view;
    let lod = &params.lod;
    let world = 2_f64.powi(i32::from(zoom));
    let min_zoom = if view.pitch() <= lod.pitch_threshold {
        zoom
    } else {
        0
    };
    let max_zoom = zoom;
    let overscaled_zoom = overscaled_zoom.unwrap_or(zoom).max(zoom);

    let size = view.size();
    let center_point = view.screen_to_tile_point(size.multiply(0.5), zoom);
    let center = Vector3::new(center_point.x, center_point.y, 0.0);
    let frustum = Frustum::from_inv_proj_matrix(
        &view.inv_projection_matrix(),
        view.world_size(),
        f64::from(zoom),
        view.viewport_mode() == ViewportMode::FlippedY,
    );

    // Nearest world copies are popped first
    let mut stack = Vec::with_capacity(64);
    for offset in 1..=WORLD_COPIES {
        stack.push(Node::root(-offset, world));
        stack.push(Node::root(offset, world));
    }
    stack.push(Node::root(0, world));

    let mut results: Vec<(OverscaledTileId, f64)> = Vec::new();
    let mut culled = 0usize;

    while let Some(mut node) = stack.pop() {
        if !node.fully_visible {
            match frustum.intersects(&node.aabb) {
                IntersectionResult::Separate => {
                    culled += 1;
                    continue;
                }
                IntersectionResult::Contains => node.fully_visible = true,
                IntersectionResult::Intersects => {}
            }
        }

        let distance = node.aabb.distance_xyz(&center).max();
        let dist_to_split =
            lod.min_radius + 2_f64.powi(i32::from(max_zoom - node.zoom) + 1) - 2.0;

        let far_enough = distance * lod.scale > dist_to_split && node.zoom >= min_zoom;
        if node.zoom == max_zoom || far_enough {
            // The plane test admits some boxes near the frustum edges
            if node.fully_visible
                || frustum.intersects_precise(&node.aabb, true) != IntersectionResult::Separate
            {
                let tile_zoom = if node.zoom == max_zoom {
                    overscaled_zoom
                } else {
                    node.zoom
                };
                let tile_center = Point::new(
                    f64::from(node.wrap) * world + f64::from(node.x) + 0.5,
                    f64::from(node.y) + 0.5,
                );
                results.push((
                    OverscaledTileId::new(tile_zoom, node.wrap, node.zoom, node.x, node.y),
                    tile_center.distance_squared_to(&center_point),
                ));
            } else {
                culled += 1;
            }
            continue;
        }

        for index in 0..4 {
            stack.push(node.child(index));
        }
    }

    results.sort_by(|a, b| a.1.total_cmp(&b.1));
    log::debug!(
        "cover_frustum z{} (zooms {}..={}): {} tiles, {} nodes culled",
        zoom,
        min_zoom,
        max_zoom,
        results.len(),
        culled
    );
    results.into_iter().map(|(tile, _)| tile).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::core::viewport::Viewport;

    fn viewport(lng: f64, zoom: f64) -> Viewport {
        Viewport::new(LatLng::new(0.0, lng), zoom, Point::new(1024.0, 768.0))
    }

    fn options(min_radius: f64) -> TileLodOptions {
        TileLodOptions {
            min_radius,
            ..TileLodOptions::default()
        }
    }

    fn sorted(mut tiles: Vec<OverscaledTileId>) -> Vec<OverscaledTileId> {
        tiles.sort();
        tiles
    }

    #[test]
    fn test_top_down_min_radius() {
        let view = viewport(0.0, 10.0);
        let params = TileCoverParameters::with_options(&view, options(2.0));
        let expected = sorted(vec![
            OverscaledTileId::new(10, 0, 10, 511, 511),
            OverscaledTileId::new(10, 0, 10, 512, 511),
            OverscaledTileId::new(10, 0, 10, 511, 512),
            OverscaledTileId::new(10, 0, 10, 512, 512),
        ]);
        assert_eq!(sorted(cover_frustum(&params, 10, None)), expected);

        let flipped = view.clone().with_mode(ViewportMode::FlippedY);
        let params = TileCoverParameters::with_options(&flipped, options(2.0));
        assert_eq!(sorted(cover_frustum(&params, 10, None)), expected);
    }

    #[test]
    fn test_overscaled_zoom() {
        let view = viewport(0.0, 10.0);
        let params = TileCoverParameters::with_options(&view, options(2.0));
        let tiles = cover_frustum(&params, 10, Some(12));
        assert_eq!(tiles.len(), 4);
        assert!(tiles
            .iter()
            .all(|tile| tile.overscaled_z == 12 && tile.canonical.z == 10));

        // A requested zoom below the cover zoom is ignored
        let tiles = cover_frustum(&params, 10, Some(8));
        assert!(tiles.iter().all(|tile| tile.overscaled_z == 10));
    }

    #[test]
    fn test_pitch_below_threshold_keeps_max_zoom() {
        for (degrees, count) in [(45.0_f64, 11), (60.0, 24)] {
            let view = viewport(0.0, 10.0).with_pitch(degrees.to_radians());
            let tiles = cover_frustum(&TileCoverParameters::new(&view), 10, None);
            assert_eq!(tiles.len(), count, "pitch {}", degrees);
            assert!(tiles.iter().all(|tile| tile.canonical.z == 10));
        }
    }

    #[test]
    fn test_steep_pitch_mixes_zooms() {
        let view = viewport(0.0, 10.0).with_pitch(75_f64.to_radians());
        let tiles = cover_frustum(&TileCoverParameters::new(&view), 10, None);
        assert!(tiles.len() > 50);
        assert!(tiles.iter().any(|tile| tile.canonical.z < 10));
        assert!(tiles.iter().all(|tile| tile.overscaled_z >= tile.canonical.z));
        assert_eq!(tiles[0].canonical.z, 10);
    }

    #[test]
    fn test_antimeridian_view_wraps() {
        let view = viewport(179.9, 3.0);
        let tiles = cover_frustum(&TileCoverParameters::new(&view), 3, None);
        let expected = sorted(vec![
            OverscaledTileId::new(3, 0, 3, 6, 3),
            OverscaledTileId::new(3, 0, 3, 6, 4),
            OverscaledTileId::new(3, 0, 3, 7, 3),
            OverscaledTileId::new(3, 0, 3, 7, 4),
            OverscaledTileId::new(3, 1, 3, 0, 3),
            OverscaledTileId::new(3, 1, 3, 0, 4),
        ]);
        assert_eq!(sorted(tiles.clone()), expected);
        assert_eq!(tiles[0].canonical.x, 7);
    }

    #[test]
    fn test_empty_viewport_covers_nothing() {
        let view = Viewport::new(LatLng::new(0.0, 0.0), 4.0, Point::new(0.0, 0.0));
        assert!(cover_frustum(&TileCoverParameters::new(&view), 4, None).is_empty());
    }

    #[test]
    #[should_panic(expected = "min radius")]
    fn test_min_radius_below_one_panics() {
        let view = viewport(0.0, 4.0);
        let params = TileCoverParameters::with_options(&view, options(0.5));
        cover_frustum(&params, 4, None);
    }
}
