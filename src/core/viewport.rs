use crate::core::constants::{
    DEFAULT_FIELD_OF_VIEW, MAX_PITCH, MAX_ZOOM, NEAR_CLIP_DISTANCE,
};
use crate::core::geo::{LatLng, Point};
use crate::traits::ViewState;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Orientation of the framebuffer's y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportMode {
    /// Screen y grows downwards, clip-space y grows upwards
    Default,
    /// Screen and clip-space y point the same way (offscreen targets)
    FlippedY,
}

impl Default for ViewportMode {
    fn default() -> Self {
        Self::Default
    }
}

/// Perspective camera over a Web Mercator map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// Tilt away from straight down, in radians
    pub pitch: f64,
    /// Rotation around the view center, in radians
    pub bearing: f64,
    /// Vertical field of view, in radians
    pub field_of_view: f64,
    pub mode: ViewportMode,
}

impl Viewport {
    /// Creates a new viewport looking straight down at `center`
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM as f64),
            size,
            pitch: 0.0,
            bearing: 0.0,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            mode: ViewportMode::Default,
        }
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.set_pitch(pitch);
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_mode(mut self, mode: ViewportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the pitch, clamping to `[0, MAX_PITCH]`
    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch.clamp(0.0, MAX_PITCH);
    }

    /// A viewport without area sees nothing
    pub fn is_empty(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Distance from the camera to the view center, in pixels
    pub fn camera_to_center_distance(&self) -> f64 {
        0.5 / (self.field_of_view / 2.0).tan() * self.size.y
    }

    /// Matrix mapping world pixels (`z` up) to clip space.
    ///
    /// The far plane sits just behind the furthest ground point visible at the
    /// top edge of the screen.
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        if self.is_empty() {
            return Matrix4::from_element(f64::NAN);
        }

        let distance = self.camera_to_center_distance();
        let half_fov = self.field_of_view / 2.0;
        let ground_angle = FRAC_PI_2 + self.pitch;
        let top_half_surface_distance = half_fov.sin() * distance
            / (PI - ground_angle - half_fov).clamp(0.01, PI - 0.01).sin();
        let furthest_distance =
            (FRAC_PI_2 - self.pitch).cos() * top_half_surface_distance + distance;
        let far = (furthest_distance * 1.01).max(NEAR_CLIP_DISTANCE * 2.0);

        let y_flip = match self.mode {
            ViewportMode::Default => -1.0,
            ViewportMode::FlippedY => 1.0,
        };
        let center = self.center.project(self.world_size());

        Matrix4::new_perspective(
            self.size.x / self.size.y,
            self.field_of_view,
            NEAR_CLIP_DISTANCE,
            far,
        ) * Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, y_flip, 1.0))
            * Matrix4::new_translation(&Vector3::new(0.0, 0.0, -distance))
            * Matrix4::from_axis_angle(&Vector3::x_axis(), self.pitch)
            * Matrix4::from_axis_angle(&Vector3::z_axis(), self.bearing)
            * Matrix4::new_translation(&Vector3::new(-center.x, -center.y, 0.0))
    }
}

impl ViewState for Viewport {
    fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn size(&self) -> Point {
        self.size
    }

    fn inv_projection_matrix(&self) -> Matrix4<f64> {
        self.projection_matrix()
            .try_inverse()
            .unwrap_or_else(|| Matrix4::from_element(f64::NAN))
    }

    fn viewport_mode(&self) -> ViewportMode {
        self.mode
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
