//! Lazy tile cover of arbitrary geometries
//!
//! Geometries are flattened into edges in tile space and swept row by row.
//! A tile is covered when an edge passes through its open square, or, for
//! polygons, when its center lies inside under the even-odd rule. Polygon
//! edges lying exactly on tile boundaries therefore never spill into the
//! neighbouring tile, while points and lines on a boundary select the tile
//! to their right or below.

use crate::core::constants::{MAX_LATITUDE, MAX_LONGITUDE};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::tile_id::{tiles_per_axis, UnwrappedTileId};
use geo::MapCoords;
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use std::iter::FusedIterator;
use std::ops::Range;

/// Largest coordinate magnitude, in tiles, kept when building edges
const COORD_LIMIT: f64 = (1u64 << 61) as f64;

/// Rings of one geometry part; closed rings are filled
#[derive(Debug, Default)]
struct Shape {
    rings: Vec<Vec<Point>>,
    closed: bool,
}

/// Edge with endpoints ordered by increasing `y`, active on rows `first..=last`
#[derive(Debug, Clone, Copy)]
struct SweepEdge {
    a: Point,
    b: Point,
    first: i64,
    last: i64,
    shape: usize,
    closed: bool,
}

impl SweepEdge {
    fn is_horizontal(&self) -> bool {
        self.a.y == self.b.y
    }

    fn x_at(&self, y: f64) -> f64 {
        self.a.x + (y - self.a.y) * (self.b.x - self.a.x) / (self.b.y - self.a.y)
    }

    /// Columns of row `y` whose open square the edge passes through
    fn touched_columns(&self, y: i64) -> Option<Range<i64>> {
        let (lo, hi) = if self.is_horizontal() {
            (self.a.x.min(self.b.x), self.a.x.max(self.b.x))
        } else {
            let top = self.x_at(self.a.y.max(y as f64));
            let bottom = self.x_at(self.b.y.min((y + 1) as f64));
            (top.min(bottom), top.max(bottom))
        };

        let start = lo.floor() as i64;
        let end = hi.ceil() as i64;
        if end > start {
            Some(start..end)
        } else if self.closed && lo == lo.floor() {
            // Vertical polygon edge on a column boundary
            None
        } else {
            Some(start..start + 1)
        }
    }
}

/// Lazy, single-pass sequence of the tiles covered by a geometry.
///
/// Tiles are produced in row-major order: rows from north to south, and
/// columns from west to east within a row. Each tile is produced once. Only
/// the spans of the current row are held in memory.
#[derive(Debug)]
pub struct TileCover {
    zoom: u8,
    edges: Vec<SweepEdge>,
    next_edge: usize,
    active: Vec<SweepEdge>,
    next_row: i64,
    last_row: i64,
    row: i64,
    spans: Vec<Range<i64>>,
    span: usize,
    column: i64,
}

impl TileCover {
    /// Prepares the cover of `geometry` at `zoom`.
    ///
    /// With `project`, coordinates are longitude (`x`) and latitude (`y`)
    /// and are projected to tile space first; otherwise they are taken to
    /// be in tile units at `zoom` already.
    pub fn new(geometry: &Geometry<f64>, zoom: u8, project: bool) -> Self {
        let mut shapes = Vec::new();
        if project {
            let projected = geometry.map_coords(|coord| {
                let point = LatLng::new(coord.y, coord.x).to_tile_point(zoom);
                Coord {
                    x: point.x,
                    y: point.y,
                }
            });
            collect_shapes(&projected, &mut shapes);
        } else {
            collect_shapes(geometry, &mut shapes);
        }

        let mut edges = build_edges(&shapes);
        edges.sort_by_key(|edge| edge.first);

        let tiles = tiles_per_axis(zoom) as i64;
        let next_row = edges.first().map_or(0, |edge| edge.first.max(0));
        let last_row = edges
            .iter()
            .map(|edge| edge.last)
            .max()
            .map_or(-1, |last| last.min(tiles - 1));

        log::debug!(
            "cover_geometry z{}: {} edges over rows {}..={}",
            zoom,
            edges.len(),
            next_row,
            last_row
        );

        Self {
            zoom,
            edges,
            next_edge: 0,
            active: Vec::new(),
            next_row,
            last_row,
            row: next_row,
            spans: Vec::new(),
            span: 0,
            column: 0,
        }
    }

    /// Prepares the cover of a lat/lng rectangle.
    ///
    /// Latitudes are clamped to the Web Mercator range; bounds with nothing
    /// left after clamping cover the whole world. Bounds without height
    /// cover nothing, as in [`crate::tiles::cover_bounds`].
    pub fn from_bounds(bounds: &LatLngBounds, zoom: u8) -> Self {
        let mut clamped = bounds.clamped();
        if bounds.is_empty() || bounds.is_outside_mercator() {
            clamped = LatLngBounds::from_coords(
                -MAX_LATITUDE,
                -MAX_LONGITUDE,
                MAX_LATITUDE,
                MAX_LONGITUDE,
            );
        }

        let north = LatLng::new(clamped.north(), clamped.west()).to_tile_point(zoom);
        let south = LatLng::new(clamped.south(), clamped.west()).to_tile_point(zoom);
        if north.y == south.y {
            return Self::new(&Geometry::MultiPolygon(MultiPolygon(Vec::new())), zoom, false);
        }

        let ring = [
            (clamped.west(), clamped.south()),
            (clamped.west(), clamped.north()),
            (clamped.east(), clamped.north()),
            (clamped.east(), clamped.south()),
            (clamped.west(), clamped.south()),
        ];
        let polygon = Polygon::new(LineString::from(ring.to_vec()), Vec::new());
        Self::new(&Geometry::Polygon(polygon), zoom, true)
    }

    /// Sweeps forward to the next row with covered tiles
    fn advance_row(&mut self) -> bool {
        while self.next_row <= self.last_row {
            let y = self.next_row;
            self.next_row += 1;

            while self.next_edge < self.edges.len() && self.edges[self.next_edge].first <= y {
                self.active.push(self.edges[self.next_edge]);
                self.next_edge += 1;
            }
            self.active.retain(|edge| edge.last >= y);

            self.spans = row_spans(&self.active, y);
            log::trace!("row {}: {} spans", y, self.spans.len());
            if let Some(first) = self.spans.first() {
                self.row = y;
                self.span = 0;
                self.column = first.start;
                return true;
            }
        }
        self.spans.clear();
        false
    }

    fn remaining_in_row(&self) -> usize {
        self.spans
            .get(self.span)
            .map_or(0, |span| (span.end - self.column) as usize)
            + self.spans.iter().skip(self.span + 1).map(span_len).sum::<usize>()
    }
}

impl Iterator for TileCover {
    type Item = UnwrappedTileId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(span) = self.spans.get(self.span) {
                if self.column < span.end {
                    let x = self.column;
                    self.column += 1;
                    return Some(UnwrappedTileId::new(self.zoom, x, self.row));
                }
                self.span += 1;
                if let Some(next) = self.spans.get(self.span) {
                    self.column = next.start;
                }
                continue;
            }
            if !self.advance_row() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_in_row();
        if self.next_row > self.last_row {
            (remaining, Some(remaining))
        } else {
            (remaining, None)
        }
    }

    /// Counts the remaining tiles span by span, without producing them
    fn count(mut self) -> usize {
        let mut total = self.remaining_in_row();
        while self.advance_row() {
            total = total.saturating_add(self.spans.iter().map(span_len).sum::<usize>());
        }
        total
    }
}

impl FusedIterator for TileCover {}

/// Lazy cover of `geometry` at `zoom`; see [`TileCover::new`]
pub fn cover_geometry(geometry: &Geometry<f64>, zoom: u8, project: bool) -> TileCover {
    TileCover::new(geometry, zoom, project)
}

/// Number of tiles covered by a geographic `geometry` at `zoom`
pub fn geometry_tile_count(geometry: &Geometry<f64>, zoom: u8) -> u64 {
    TileCover::new(geometry, zoom, true).count() as u64
}

fn span_len(span: &Range<i64>) -> usize {
    (span.end - span.start) as usize
}

fn ring_points(line: &LineString<f64>) -> Vec<Point> {
    line.coords().map(|coord| Point::new(coord.x, coord.y)).collect()
}

fn polygon_shape(polygon: &Polygon<f64>) -> Shape {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_points)
        .collect();
    Shape {
        rings,
        closed: true,
    }
}

fn collect_shapes(geometry: &Geometry<f64>, shapes: &mut Vec<Shape>) {
    match geometry {
        Geometry::Point(point) => shapes.push(Shape {
            rings: vec![vec![Point::new(point.x(), point.y())]],
            closed: false,
        }),
        Geometry::MultiPoint(points) => shapes.push(Shape {
            rings: points
                .iter()
                .map(|point| vec![Point::new(point.x(), point.y())])
                .collect(),
            closed: false,
        }),
        Geometry::Line(line) => shapes.push(Shape {
            rings: vec![vec![
                Point::new(line.start.x, line.start.y),
                Point::new(line.end.x, line.end.y),
            ]],
            closed: false,
        }),
        Geometry::LineString(line) => shapes.push(Shape {
            rings: vec![ring_points(line)],
            closed: false,
        }),
        Geometry::MultiLineString(lines) => shapes.push(Shape {
            rings: lines.iter().map(ring_points).collect(),
            closed: false,
        }),
        Geometry::Polygon(polygon) => shapes.push(polygon_shape(polygon)),
        Geometry::MultiPolygon(polygons) => shapes.extend(polygons.iter().map(polygon_shape)),
        Geometry::Rect(rect) => shapes.push(polygon_shape(&rect.to_polygon())),
        Geometry::Triangle(triangle) => shapes.push(polygon_shape(&triangle.to_polygon())),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                collect_shapes(geometry, shapes);
            }
        }
    }
}

fn build_edges(shapes: &[Shape]) -> Vec<SweepEdge> {
    let mut edges = Vec::new();
    for (index, shape) in shapes.iter().enumerate() {
        for ring in &shape.rings {
            let mut segments: Vec<(Point, Point)> = match ring.as_slice() {
                [] => continue,
                [point] => vec![(*point, *point)],
                _ => ring.windows(2).map(|pair| (pair[0], pair[1])).collect(),
            };
            if shape.closed && ring.len() > 1 && ring.first() != ring.last() {
                segments.push((ring[ring.len() - 1], ring[0]));
            }

            for (a, b) in segments {
                if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
                    continue;
                }
                let (a, b) = (clamp_coord(a), clamp_coord(b));
                let (a, b) = if a.y > b.y { (b, a) } else { (a, b) };
                let (first, last) = if a.y == b.y {
                    // Polygon edges on a row boundary touch no row interior
                    if shape.closed && a.y == a.y.floor() {
                        continue;
                    }
                    (a.y.floor() as i64, a.y.floor() as i64)
                } else {
                    (a.y.floor() as i64, b.y.ceil() as i64 - 1)
                };
                edges.push(SweepEdge {
                    a,
                    b,
                    first,
                    last,
                    shape: index,
                    closed: shape.closed,
                });
            }
        }
    }
    edges
}

fn clamp_coord(point: Point) -> Point {
    Point::new(
        point.x.clamp(-COORD_LIMIT, COORD_LIMIT),
        point.y.clamp(-COORD_LIMIT, COORD_LIMIT),
    )
}

/// Merged column spans covered in row `y` by the active edges
fn row_spans(active: &[SweepEdge], y: i64) -> Vec<Range<i64>> {
    let mut spans: Vec<Range<i64>> = active
        .iter()
        .filter_map(|edge| edge.touched_columns(y))
        .collect();

    // Even-odd fill at the row's center line, per shape
    let center = y as f64 + 0.5;
    let mut crossings: Vec<(usize, f64)> = active
        .iter()
        .filter(|edge| edge.closed && !edge.is_horizontal())
        .filter(|edge| edge.a.y <= center && center < edge.b.y)
        .map(|edge| (edge.shape, edge.x_at(center)))
        .collect();
    crossings.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut start = 0;
    while start < crossings.len() {
        let shape = crossings[start].0;
        let end = crossings[start..]
            .iter()
            .position(|crossing| crossing.0 != shape)
            .map_or(crossings.len(), |offset| start + offset);
        for pair in crossings[start..end].chunks_exact(2) {
            let from = (pair[0].1 - 0.5).ceil() as i64;
            let to = (pair[1].1 - 0.5).floor() as i64 + 1;
            if to > from {
                spans.push(from..to);
            }
        }
        start = end;
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    let mut merged: Vec<Range<i64>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}
