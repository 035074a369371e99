// shape.rs - Origin-normalized patterns of live cells

use serde::{Deserialize, Serialize};

use crate::error::LifeError;
use crate::geometry::Point;

/// A pattern of live-cell offsets, translated so its minimum x and y are 0.
///
/// Shapes are value objects: rotating produces a new shape and nothing ever
/// refers back to the grid a shape was recorded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord", into = "ShapeRecord")]
pub struct Shape {
    points: Vec<Point>,
    center: Point,
}

/// Stored form. `middle` is written for older shape files and ignored on read.
#[derive(Serialize, Deserialize)]
struct ShapeRecord {
    points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    middle: Option<Point>,
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = LifeError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        Shape::try_new(record.points)
    }
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        ShapeRecord { middle: Some(shape.center), points: shape.points }
    }
}

impl Shape {
    pub const EMPTY: Shape = Shape { points: Vec::new(), center: Point::ZERO };

    /// Normalize arbitrary coordinates into a shape. Points too far apart to
    /// normalize give the empty shape; see [`Shape::try_new`].
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self::try_new(points).unwrap_or_default()
    }

    /// Normalize arbitrary coordinates, failing when the bounding box is
    /// wider or taller than `i32::MAX`.
    pub fn try_new(points: impl IntoIterator<Item = Point>) -> Result<Self, LifeError> {
        let points: Vec<Point> = points.into_iter().collect();
        let Some(first) = points.first().copied() else {
            return Ok(Self::EMPTY);
        };

        let (mut min, mut max) = (first, first);
        for p in &points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let span = |lo: i32, hi: i32| i64::from(hi) - i64::from(lo);
        let (span_x, span_y) = (span(min.x, max.x), span(min.y, max.y));
        let (Ok(extent_x), Ok(extent_y)) = (i32::try_from(span_x), i32::try_from(span_y)) else {
            return Err(LifeError::ShapeOutOfRange { span: span_x.max(span_y) });
        };

        // every offset lies in 0..=extent, which fits
        let points = points
            .into_iter()
            .map(|p| Point::new(span(min.x, p.x) as i32, span(min.y, p.y) as i32))
            .collect();
        Ok(Self { points, center: Point::new(extent_x / 2, extent_y / 2) })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounding-box max halved; the anchor used when stamping.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Largest x and y over all points. `(0, 0)` for the empty shape.
    pub fn extent(&self) -> Point {
        self.points.iter().fold(Point::ZERO, |acc, p| Point::new(acc.x.max(p.x), acc.y.max(p.y)))
    }

    /// Quarter turn: `(x, y) -> (maxY - y, x - maxX)`, then renormalized.
    pub fn rotated(&self) -> Shape {
        let max = self.extent();
        Shape::new(self.points.iter().map(|p| Point::new(max.y - p.y, p.x - max.x)))
    }

    /// Same cells regardless of point order.
    pub fn same_cells(&self, other: &Shape) -> bool {
        let mut a = self.points.clone();
        let mut b = other.points.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::EMPTY
    }
}
