//! Trait abstractions for the collaborators the cover engines consume
//!
//! The surrounding engine owns the camera; the cover engines only need a
//! narrow, read-only view of it for the duration of one call.

use crate::core::{constants::TILE_SIZE, geo::Point, viewport::ViewportMode};
use nalgebra::{Matrix4, Vector4};

/// Read-only camera/view state queried by [`crate::tiles::frustum::cover_frustum`]
pub trait ViewState {
    /// Zoom scale factor, `2^zoom`
    fn scale(&self) -> f64;

    /// Camera pitch in radians, 0 when looking straight down
    fn pitch(&self) -> f64;

    /// Viewport size in pixels
    fn size(&self) -> Point;

    /// Inverse of the matrix mapping world pixels to clip space
    fn inv_projection_matrix(&self) -> Matrix4<f64>;

    fn viewport_mode(&self) -> ViewportMode;

    /// Width of the world in pixels at the current zoom
    fn world_size(&self) -> f64 {
        TILE_SIZE * self.scale()
    }

    /// Casts a ray through a screen pixel and intersects it with the ground plane.
    ///
    /// The result is in tile units at `zoom`. Degenerate cameras yield NaN
    /// coordinates.
    fn screen_to_tile_point(&self, screen: Point, zoom: u8) -> Point {
        let size = self.size();
        let ndc_x = screen.x / size.x * 2.0 - 1.0;
        let ndc_y = match self.viewport_mode() {
            ViewportMode::Default => 1.0 - screen.y / size.y * 2.0,
            ViewportMode::FlippedY => screen.y / size.y * 2.0 - 1.0,
        };

        let inv = self.inv_projection_matrix();
        let near = inv * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inv * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;

        let t = if far.z == near.z {
            0.0
        } else {
            -near.z / (far.z - near.z)
        };
        let ground = near + (far - near) * t;
        let to_tiles = 2_f64.powi(zoom as i32) / self.world_size();
        Point::new(ground.x * to_tiles, ground.y * to_tiles)
    }
}
