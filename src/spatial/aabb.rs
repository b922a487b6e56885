use nalgebra::Vector3;

/// Axis-aligned box in tile space.
///
/// Map tiles are flat, so the `z` extent of tile boxes is zero; frustum
/// bounds use all three axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Aabb {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vector3<f64>>) -> Self {
        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);
        for point in points {
            min = min.zip_map(point, f64::min);
            max = max.zip_map(point, f64::max);
        }
        Self { min, max }
    }

    /// Splits the box in the xy plane.
    ///
    /// Quadrants 0..4 are top-left, top-right, bottom-left and bottom-right,
    /// matching the child order of the tile quadtree.
    pub fn quadrant(&self, index: usize) -> Aabb {
        assert!(index < 4, "quadrant index {} out of range", index);
        let center = (self.min + self.max) * 0.5;
        let mut min = self.min;
        let mut max = self.max;

        if index % 2 == 0 {
            max.x = center.x;
        } else {
            min.x = center.x;
        }
        if index < 2 {
            max.y = center.y;
        } else {
            min.y = center.y;
        }
        Aabb { min, max }
    }

    /// Per-axis distance from `point` to the box, zero on axes where the point is inside
    pub fn distance_xyz(&self, point: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            0f64.max(self.min.x - point.x).max(point.x - self.max.x),
            0f64.max(self.min.y - point.y).max(point.y - self.max.y),
            0f64.max(self.min.z - point.z).max(point.z - self.max.z),
        )
    }

    /// Overlap test; boxes sharing only a face still intersect.
    /// Any NaN coordinate makes the test fail.
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && self.max[axis] >= other.min[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(size: f64) -> Aabb {
        Aabb::new(Vector3::zeros(), Vector3::new(size, size, 0.0))
    }

    #[test]
    fn test_quadrants_follow_tile_order() {
        let aabb = unit_square(4.0);
        let expected = [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)];
        for (index, (x, y)) in expected.iter().enumerate() {
            let quadrant = aabb.quadrant(index);
            assert_eq!(quadrant.min, Vector3::new(*x, *y, 0.0));
            assert_eq!(quadrant.max, Vector3::new(x + 2.0, y + 2.0, 0.0));
        }
    }

    #[test]
    fn test_distance_xyz() {
        let aabb = unit_square(4.0);
        assert_eq!(aabb.distance_xyz(&Vector3::new(1.0, 1.0, 0.0)), Vector3::zeros());
        assert_eq!(
            aabb.distance_xyz(&Vector3::new(-2.0, 7.0, 0.0)),
            Vector3::new(2.0, 3.0, 0.0)
        );
    }

    #[test]
    fn test_intersects() {
        let aabb = unit_square(4.0);
        let touching = Aabb::new(Vector3::new(4.0, 0.0, 0.0), Vector3::new(5.0, 1.0, 0.0));
        let apart = Aabb::new(Vector3::new(5.0, 0.0, 0.0), Vector3::new(6.0, 1.0, 0.0));
        assert!(aabb.intersects(&touching));
        assert!(!aabb.intersects(&apart));

        let nan = Aabb::new(Vector3::repeat(f64::NAN), Vector3::repeat(f64::NAN));
        assert!(!aabb.intersects(&nan));
    }

    #[test]
    fn test_from_points() {
        let points = [
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(-1.0, 5.0, 0.0),
        ];
        let aabb = Aabb::from_points(points.iter());
        assert_eq!(aabb.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 5.0, 3.0));
    }
}
