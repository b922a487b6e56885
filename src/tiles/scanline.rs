//! Edge-pair scanline conversion of triangles into tile rows
//!
//! Each triangle is split at its middle vertex into two trapezoids; every
//! integer row between the pair of edges bounding a trapezoid yields a
//! half-open column range.

use crate::core::geo::Point;

/// Triangle side with endpoints ordered by increasing `y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Edge {
    pub fn new(a: Point, b: Point) -> Self {
        let (a, b) = if a.y > b.y { (b, a) } else { (a, b) };
        Self {
            x0: a.x,
            y0: a.y,
            x1: b.x,
            y1: b.y,
            dx: b.x - a.x,
            dy: b.y - a.y,
        }
    }
}

/// Emits `(x0, x1, y)` for every row between two edges, where `[x0, x1)` is
/// the column range touched by the trapezoid in row `y`.
///
/// `e1` is the shorter edge; rows are limited to its span and to `[ymin, ymax)`.
pub fn scan_spans<F>(e0: Edge, e1: Edge, ymin: i64, ymax: i64, scan_line: &mut F)
where
    F: FnMut(i64, i64, i64),
{
    let y0 = ymin.max(e1.y0.floor() as i64);
    let y1 = ymax.min(e1.y1.ceil() as i64);

    // Put the left edge first
    let shares_top = e0.x0 == e1.x0 && e0.y0 == e1.y0;
    let swap = if shares_top {
        e0.x0 + e1.dy / e0.dy * e0.dx < e1.x1
    } else {
        e0.x1 - e1.dy / e0.dy * e0.dx < e1.x0
    };
    let (e0, e1) = if swap { (e1, e0) } else { (e0, e1) };

    let m0 = e0.dx / e0.dy;
    let m1 = e1.dx / e1.dy;
    let d0 = if e0.dx > 0.0 { 1.0 } else { 0.0 };
    let d1 = if e1.dx < 0.0 { 1.0 } else { 0.0 };

    for y in y0..y1 {
        let row = y as f64;
        let x0 = m0 * 0f64.max(e0.dy.min(row + d0 - e0.y0)) + e0.x0;
        let x1 = m1 * 0f64.max(e1.dy.min(row + d1 - e1.y0)) + e1.x0;
        scan_line(x1.floor() as i64, x0.ceil() as i64, y);
    }
}

/// Scan-converts triangle `abc`; edges without vertical extent are skipped.
pub fn scan_triangle<F>(a: Point, b: Point, c: Point, ymin: i64, ymax: i64, scan_line: &mut F)
where
    F: FnMut(i64, i64, i64),
{
    let mut ab = Edge::new(a, b);
    let mut bc = Edge::new(b, c);
    let mut ca = Edge::new(c, a);

    // Sort so that `ca` is the edge with the largest vertical extent
    if ab.dy > bc.dy {
        std::mem::swap(&mut ab, &mut bc);
    }
    if ab.dy > ca.dy {
        std::mem::swap(&mut ab, &mut ca);
    }
    if bc.dy > ca.dy {
        std::mem::swap(&mut bc, &mut ca);
    }

    if ab.dy != 0.0 {
        scan_spans(ca, ab, ymin, ymax, scan_line);
    }
    if bc.dy != 0.0 {
        scan_spans(ca, bc, ymin, ymax, scan_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(a: Point, b: Point, c: Point, ymax: i64) -> Vec<(i64, i64, i64)> {
        let mut rows = Vec::new();
        scan_triangle(a, b, c, 0, ymax, &mut |x0, x1, y| rows.push((x0, x1, y)));
        rows
    }

    #[test]
    fn test_edge_orders_by_y() {
        let edge = Edge::new(Point::new(3.0, 5.0), Point::new(1.0, 2.0));
        assert_eq!((edge.x0, edge.y0, edge.x1, edge.y1), (1.0, 2.0, 3.0, 5.0));
        assert_eq!((edge.dx, edge.dy), (2.0, 3.0));
    }

    #[test]
    fn test_axis_aligned_triangle_rows() {
        let rows = collect(
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            8,
        );
        assert_eq!(rows, vec![(1, 3, 1), (2, 3, 2)]);
    }

    #[test]
    fn test_flat_triangle_emits_nothing() {
        let rows = collect(
            Point::new(0.5, 2.5),
            Point::new(4.5, 2.5),
            Point::new(6.5, 2.5),
            8,
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rows_clipped_to_range() {
        let rows = collect(
            Point::new(0.5, -3.5),
            Point::new(2.5, -3.5),
            Point::new(0.5, 3.5),
            2,
        );
        assert!(rows.iter().all(|&(_, _, y)| (0..2).contains(&y)));
        assert_eq!(rows.len(), 2);
    }
}
