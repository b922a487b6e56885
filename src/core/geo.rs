use crate::core::constants::{MAX_LATITUDE, MAX_LONGITUDE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Clamps latitude to the Web Mercator range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Projects to Web Mercator in a world that is `world_size` units wide.
    ///
    /// With `world_size = 2^z` the result is in tile units at zoom `z`; with
    /// `TILE_SIZE * 2^z` it is in world pixels. Longitude is not wrapped, so
    /// points east of the antimeridian land past the right edge of the world.
    pub fn project(&self, world_size: f64) -> Point {
        let lat = Self::clamp_lat(self.lat);
        let x = (MAX_LONGITUDE + self.lng) / 360.0 * world_size;
        let mercator_y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln().to_degrees();
        let y = (MAX_LONGITUDE - mercator_y) / 360.0 * world_size;
        Point::new(x, y)
    }

    /// Projects into tile space at an integer zoom level
    pub fn to_tile_point(&self, zoom: u8) -> Point {
        self.project(2_f64.powi(zoom as i32))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen, world-pixel or tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_squared_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Inverse of [`LatLng::project`] for the same `world_size`
    pub fn unproject(&self, world_size: f64) -> LatLng {
        let lng = self.x * 360.0 / world_size - MAX_LONGITUDE;
        let mercator_y = MAX_LONGITUDE - self.y * 360.0 / world_size;
        let lat = 360.0 / PI * mercator_y.to_radians().exp().atan() - 90.0;
        LatLng::new(lat, lng)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Bounds of the whole projected world
    pub fn world() -> Self {
        Self::from_coords(-90.0, -MAX_LONGITUDE, 90.0, MAX_LONGITUDE)
    }

    /// Smallest bounds containing both points, regardless of their order
    pub fn hull(a: LatLng, b: LatLng) -> Self {
        Self::from_coords(
            a.lat.min(b.lat),
            a.lng.min(b.lng),
            a.lat.max(b.lat),
            a.lng.max(b.lng),
        )
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north(), self.west())
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south(), self.east())
    }

    /// Bounds are empty when their corners are inverted on either axis
    pub fn is_empty(&self) -> bool {
        self.south() > self.north() || self.west() > self.east()
    }

    /// Bounds that do not reach into the Web Mercator latitude range at all
    pub fn is_outside_mercator(&self) -> bool {
        self.south() > MAX_LATITUDE || self.north() < -MAX_LATITUDE
    }

    /// Returns these bounds with latitudes clamped to the Web Mercator range
    pub fn clamped(&self) -> LatLngBounds {
        LatLngBounds::hull(
            LatLng::new(self.south().max(-MAX_LATITUDE), self.west()),
            LatLng::new(self.north().min(MAX_LATITUDE), self.east()),
        )
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert_eq!(LatLng::default(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_project_world_corners() {
        let nw = LatLng::new(MAX_LATITUDE, -180.0).to_tile_point(2);
        let se = LatLng::new(-MAX_LATITUDE, 180.0).to_tile_point(2);
        assert!(nw.x.abs() < 1e-9 && nw.y.abs() < 1e-9);
        assert!((se.x - 4.0).abs() < 1e-9 && (se.y - 4.0).abs() < 1e-9);

        let center = LatLng::new(0.0, 0.0).to_tile_point(3);
        assert!((center.x - 4.0).abs() < 1e-12);
        assert!((center.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_clamps_poles() {
        let pole = LatLng::new(90.0, 0.0).to_tile_point(1);
        assert!(pole.y.abs() < 1e-9);
    }

    #[test]
    fn test_projection_round_trip() {
        let lat_lng = LatLng::new(37.7749, -122.4194);
        let back = lat_lng.project(512.0 * 1024.0).unproject(512.0 * 1024.0);
        assert!((back.lat - lat_lng.lat).abs() < 1e-9);
        assert!((back.lng - lat_lng.lng).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_hull_and_empty() {
        let bounds = LatLngBounds::hull(LatLng::new(41.0, -73.0), LatLng::new(40.0, -75.0));
        assert_eq!(bounds.south(), 40.0);
        assert_eq!(bounds.west(), -75.0);
        assert!(!bounds.is_empty());

        let inverted = LatLngBounds::from_coords(41.0, -75.0, 40.0, -73.0);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_bounds_clamped() {
        let clamped = LatLngBounds::world().clamped();
        assert_eq!(clamped.south(), -MAX_LATITUDE);
        assert_eq!(clamped.north(), MAX_LATITUDE);
        assert!(LatLngBounds::from_coords(86.0, 0.0, 89.0, 10.0).is_outside_mercator());
    }

    #[test]
    fn test_bounds_center() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);
        assert_eq!(bounds.center(), LatLng::new(40.5, -74.0));
        assert_eq!(bounds.north_west(), LatLng::new(41.0, -75.0));
        assert_eq!(bounds.south_east(), LatLng::new(40.0, -73.0));
    }

    #[test]
    fn test_distance_squared() {
        let a = Point::new(1.0, 2.0);
        assert_eq!(a.distance_squared_to(&Point::new(4.0, 6.0)), 25.0);
        assert_eq!(a.distance_squared_to(&a), 0.0);
    }
}
