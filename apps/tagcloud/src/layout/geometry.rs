//! Pixel geometry shared by the placer, the collision index and the auto-fitter.
//!
//! All coordinates are container-local pixels with the origin at the top-left
//! corner and `y` growing downwards. Values are `f64` because measured text
//! boxes may be fractional; spiral candidates are always floored to whole pixels.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Primitive types
// ────────────────────────────────────────────────────────────────────────────

/// Width and height of a box or container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The smaller of the two dimensions.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle stored as `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// True when the rectangle lies strictly inside a container of `size`,
    /// leaving at least one pixel of margin on every side.
    pub fn is_strictly_inside(&self, size: Size) -> bool {
        self.left > 0.0 && self.top > 0.0 && self.right < size.width && self.bottom < size.height
    }

    /// Coarse overlap test: projections overlap on both axes. Touching edges count.
    pub fn box_intersects(&self, other: &Rect) -> bool {
        self.right >= other.left
            && self.left <= other.right
            && self.bottom >= other.top
            && self.top <= other.bottom
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

impl From<[f64; 4]> for Rect {
    fn from(v: [f64; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Segment intersection
// ────────────────────────────────────────────────────────────────────────────

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            a: Point::new(x1, y1),
            b: Point::new(x2, y2),
        }
    }

    fn contains_projection(&self, p: Point) -> bool {
        let (min_x, max_x) = (self.a.x.min(self.b.x), self.a.x.max(self.b.x));
        let (min_y, max_y) = (self.a.y.min(self.b.y), self.a.y.max(self.b.y));
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }

    /// Intersection point of the two supporting lines (determinant form), if it
    /// lies within both segments. Parallel and collinear pairs never intersect here.
    ///
    /// The point must fall inside the x and the y extent of each segment. Checking
    /// the x extent alone would let a left or right probe hit a stored vertical
    /// edge anywhere along its line, however far above or below the box it is.
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        let (x1, y1, x2, y2) = (self.a.x, self.a.y, self.b.x, self.b.y);
        let (x3, y3, x4, y4) = (other.a.x, other.a.y, other.b.x, other.b.y);

        let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if d == 0.0 {
            return None;
        }

        let cross_a = x1 * y2 - y1 * x2;
        let cross_b = x3 * y4 - y3 * x4;
        let p = Point::new(
            ((x3 - x4) * cross_a - (x1 - x2) * cross_b) / d,
            ((y3 - y4) * cross_a - (y1 - y2) * cross_b) / d,
        );

        if self.contains_projection(p) && other.contains_projection(p) {
            Some(p)
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        self.intersection(other).is_some()
    }
}

/// Probe segments for each side of a candidate box, ordered top, right, bottom, left.
///
/// Each probe runs along its side and is skewed one pixel past the side on
/// both ends, so it crosses a stored edge lying on (or next to) that side.
pub fn probe_edges(r: &Rect) -> [Segment; 4] {
    [
        Segment::new(r.left, r.top + 1.0, r.right, r.top - 1.0),
        Segment::new(r.right + 1.0, r.top, r.right - 1.0, r.bottom),
        Segment::new(r.right, r.bottom + 1.0, r.left, r.bottom - 1.0),
        Segment::new(r.left + 1.0, r.bottom, r.left - 1.0, r.top),
    ]
}

/// The four sides of a stored box, ordered top, right, bottom, left.
pub fn edges(r: &Rect) -> [Segment; 4] {
    [
        Segment::new(r.left, r.top, r.right, r.top),
        Segment::new(r.right, r.top, r.right, r.bottom),
        Segment::new(r.right, r.bottom, r.left, r.bottom),
        Segment::new(r.left, r.bottom, r.left, r.top),
    ]
}

/// Full overlap test between a candidate and a stored rectangle: box overlap,
/// or any candidate probe edge crossing the matching stored edge.
pub fn overlaps(candidate: &Rect, stored: &Rect) -> bool {
    if candidate.box_intersects(stored) {
        return true;
    }
    probe_edges(candidate)
        .iter()
        .zip(edges(stored).iter())
        .any(|(probe, edge)| probe.intersects(edge))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
