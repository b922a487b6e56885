use crate::spatial::aabb::Aabb;
use nalgebra::{Matrix4, Vector3, Vector4};

/// Outcome of testing a box against a frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionResult {
    Separate,
    Intersects,
    Contains,
}

// Corner order: near top-left, near top-right, near bottom-right, near
// bottom-left, then the same four on the far plane.
const CLIP_CORNERS: [[f64; 3]; 8] = [
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
];

const NEAR_TL: usize = 0;
const NEAR_TR: usize = 1;
const NEAR_BR: usize = 2;
const NEAR_BL: usize = 3;
const FAR_TL: usize = 4;
const FAR_TR: usize = 5;
const FAR_BR: usize = 6;
const FAR_BL: usize = 7;

// near, far, left, right, bottom, top
const PLANE_CORNERS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [6, 5, 4],
    [0, 3, 7],
    [2, 1, 5],
    [3, 2, 6],
    [0, 4, 5],
];

/// Projection of the frustum onto a separating axis candidate
#[derive(Debug, Clone, Copy, PartialEq)]
struct Projection {
    axis: Vector3<f64>,
    min: f64,
    max: f64,
}

/// Camera frustum expressed in tile units of a fixed zoom level.
///
/// Plane normals point inwards: a point is inside a plane when
/// `dot(plane, (x, y, z, 1)) >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    pub points: [Vector3<f64>; 8],
    pub planes: [Vector4<f64>; 6],
    pub bounds: Aabb,
    projections: [Projection; 12],
}

impl Frustum {
    /// Builds the frustum from the inverse of a world-pixel to clip-space matrix.
    ///
    /// Corners are rescaled from world pixels (`world_size` wide) into tile
    /// units at `zoom`. `flipped_y` must match the y orientation baked into
    /// the matrix so that plane normals keep pointing inwards.
    pub fn from_inv_proj_matrix(
        inv_proj: &Matrix4<f64>,
        world_size: f64,
        zoom: f64,
        flipped_y: bool,
    ) -> Self {
        let scale = 2_f64.powf(zoom) / world_size;
        let points = CLIP_CORNERS.map(|[x, y, z]| {
            let corner = inv_proj * Vector4::new(x, y, z, 1.0);
            corner.xyz() / corner.w * scale
        });

        let planes = PLANE_CORNERS.map(|[a, b, c]| {
            let (a, b, c) = if flipped_y { (a, c, b) } else { (a, b, c) };
            let normal = (points[a] - points[b])
                .cross(&(points[c] - points[b]))
                .normalize();
            Vector4::new(normal.x, normal.y, normal.z, -normal.dot(&points[b]))
        });

        let edges = [
            points[NEAR_BR] - points[NEAR_BL],
            points[NEAR_TL] - points[NEAR_BL],
            points[FAR_TL] - points[NEAR_TL],
            points[FAR_TR] - points[NEAR_TR],
            points[FAR_BR] - points[NEAR_BR],
            points[FAR_BL] - points[NEAR_BL],
        ];
        let projections = std::array::from_fn(|i| {
            let edge = edges[i / 2];
            let axis = if i % 2 == 0 {
                Vector3::new(0.0, -edge.z, edge.y)
            } else {
                Vector3::new(edge.z, 0.0, -edge.x)
            };
            let (min, max) = project_points(&axis, points.iter());
            Projection { axis, min, max }
        });

        Self {
            bounds: Aabb::from_points(points.iter()),
            points,
            planes,
            projections,
        }
    }

    /// Approximate classification of a flat box (`z = 0`).
    ///
    /// Only the box corners are tested against the planes, so a large box
    /// straddling a frustum edge may be reported as intersecting even though
    /// it is separate. Use [`Frustum::intersects_precise`] to refine.
    pub fn intersects(&self, aabb: &Aabb) -> IntersectionResult {
        if !self.bounds.intersects(aabb) {
            return IntersectionResult::Separate;
        }

        let corners = flat_corners(aabb);
        let mut fully_inside = true;
        for plane in &self.planes {
            let inside = corners
                .iter()
                .filter(|c| plane.dot(&Vector4::new(c.x, c.y, c.z, 1.0)) >= 0.0)
                .count();
            if inside == 0 {
                return IntersectionResult::Separate;
            }
            if inside != corners.len() {
                fully_inside = false;
            }
        }

        if fully_inside {
            IntersectionResult::Contains
        } else {
            IntersectionResult::Intersects
        }
    }

    /// Separating-axis refinement over the cross products of the frustum edges
    /// with the coordinate axes.
    ///
    /// With `edge_cases_only` the cheap plane test is skipped, for boxes
    /// already known to pass it. Never reports `Contains`.
    pub fn intersects_precise(&self, aabb: &Aabb, edge_cases_only: bool) -> IntersectionResult {
        if !edge_cases_only && self.intersects(aabb) == IntersectionResult::Separate {
            return IntersectionResult::Separate;
        }

        let corners = flat_corners(aabb);
        for projection in &self.projections {
            let (min, max) = project_points(&projection.axis, corners.iter());
            if projection.max < min || projection.min > max {
                return IntersectionResult::Separate;
            }
        }
        IntersectionResult::Intersects
    }
}

fn flat_corners(aabb: &Aabb) -> [Vector3<f64>; 4] {
    [
        Vector3::new(aabb.min.x, aabb.min.y, 0.0),
        Vector3::new(aabb.max.x, aabb.min.y, 0.0),
        Vector3::new(aabb.max.x, aabb.max.y, 0.0),
        Vector3::new(aabb.min.x, aabb.max.y, 0.0),
    ]
}

fn project_points<'a>(
    axis: &Vector3<f64>,
    points: impl Iterator<Item = &'a Vector3<f64>>,
) -> (f64, f64) {
    points.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), point| {
        let d = axis.dot(point);
        (min.min(d), max.max(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};
    use crate::core::viewport::{Viewport, ViewportMode};
    use crate::traits::ViewState;

    fn frustum_for(viewport: &Viewport, zoom: u8) -> Frustum {
        Frustum::from_inv_proj_matrix(
            &viewport.inv_projection_matrix(),
            viewport.world_size(),
            zoom as f64,
            viewport.mode == ViewportMode::FlippedY,
        )
    }

    fn square(x: f64, y: f64, size: f64) -> Aabb {
        Aabb::new(Vector3::new(x, y, 0.0), Vector3::new(x + size, y + size, 0.0))
    }

    fn top_down() -> Viewport {
        Viewport::new(LatLng::new(0.0, 0.0), 10.0, Point::new(1024.0, 768.0))
    }

    #[test]
    fn test_center_point_inside_all_planes() {
        for mode in [ViewportMode::Default, ViewportMode::FlippedY] {
            let frustum = frustum_for(&top_down().with_mode(mode), 10);
            let center = Vector4::new(512.0, 512.0, 0.0, 1.0);
            for plane in &frustum.planes {
                assert!(plane.dot(&center) >= 0.0, "{:?} {:?}", mode, plane);
            }
        }
    }

    #[test]
    fn test_classification() {
        let frustum = frustum_for(&top_down(), 10);
        // A 1024x768 view at z10 spans two tiles by 1.5 tiles around (512, 512)
        assert_eq!(frustum.intersects(&square(511.5, 511.5, 1.0)), IntersectionResult::Contains);
        assert_eq!(frustum.intersects(&square(512.5, 512.5, 1.0)), IntersectionResult::Intersects);
        assert_eq!(frustum.intersects(&square(600.0, 512.0, 1.0)), IntersectionResult::Separate);

        let world = Aabb::new(Vector3::zeros(), Vector3::new(1024.0, 1024.0, 0.0));
        assert_eq!(frustum.intersects(&world), IntersectionResult::Intersects);
    }

    #[test]
    fn test_precise_rejects_corner_of_rotated_view() {
        let viewport = top_down().with_bearing(std::f64::consts::FRAC_PI_4);
        let frustum = frustum_for(&viewport, 10);
        // Inside the axis-aligned bounds of the rotated view, outside the view itself
        let far_corner = square(513.1, 513.1, 0.1);
        assert!(frustum.bounds.intersects(&far_corner));
        assert_eq!(
            frustum.intersects_precise(&far_corner, false),
            IntersectionResult::Separate
        );
        let center = square(511.5, 511.5, 1.0);
        assert_eq!(
            frustum.intersects_precise(&center, false),
            IntersectionResult::Intersects
        );
    }

    #[test]
    fn test_nan_frustum_is_separate() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 3.0, Point::new(0.0, 0.0));
        let frustum = frustum_for(&viewport, 3);
        let world = Aabb::new(Vector3::zeros(), Vector3::new(8.0, 8.0, 0.0));
        assert_eq!(frustum.intersects(&world), IntersectionResult::Separate);
        assert_eq!(frustum.intersects_precise(&world, false), IntersectionResult::Separate);
    }
}
