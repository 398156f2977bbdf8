//! Spiral Placer: walks an outward spiral from the container center and
//! claims the first in-bounds, collision-free slot for a box.
//!
//! # Geometry
//! At step `i` the angle is `angle_step * i` radians and the candidate's
//! top-left corner is
//!
//! ```text
//! x = floor(cx + radius * angle * cos(angle) * aspect - width / 2)
//! y = floor(cy + radius * angle * sin(angle))
//! ```
//!
//! where `(cx, cy)` is the floored container center. The horizontal term is
//! stretched by the container's aspect ratio so wide containers fill sideways.
//! Steps run from `start_offset` up to (excluding) `max_steps`.

use serde::{Deserialize, Serialize};

use crate::layout::collision::CollisionIndex;
use crate::layout::geometry::{Point, Rect, Size};

// ────────────────────────────────────────────────────────────────────────────
// Parameters
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralParams {
    /// Radius growth per radian.
    pub radius: f64,
    /// Angle advanced per step, in radians.
    pub angle_step: f64,
    /// Exclusive upper bound on the step index.
    pub max_steps: usize,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            radius: 6.0,
            angle_step: 0.1,
            max_steps: 360,
        }
    }
}

/// Container geometry captured once at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub size: Size,
    pub aspect_ratio: f64,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            aspect_ratio: size.width / size.height,
        }
    }

    /// Floored center, the spiral's origin.
    pub fn center(&self) -> Point {
        Point::new(
            (self.size.width / 2.0).floor(),
            (self.size.height / 2.0).floor(),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

/// Result of one spiral search.
///
/// `probes` counts candidates that were inside the container and therefore
/// checked against the collision index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpiralSearch {
    Placed { rect: Rect, step: usize, probes: usize },
    Exhausted { probes: usize },
}

impl SpiralSearch {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            SpiralSearch::Placed { rect, .. } => Some(*rect),
            SpiralSearch::Exhausted { .. } => None,
        }
    }

    pub fn probes(&self) -> usize {
        match self {
            SpiralSearch::Placed { probes, .. } | SpiralSearch::Exhausted { probes } => *probes,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpiralPlacer {
    viewport: Viewport,
    params: SpiralParams,
}

impl SpiralPlacer {
    pub fn new(viewport: Viewport, params: SpiralParams) -> Self {
        Self { viewport, params }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Candidate rectangle for `size` at spiral step `step`.
    pub fn candidate(&self, size: Size, step: usize) -> Rect {
        let center = self.viewport.center();
        let angle = self.params.angle_step * step as f64;
        let reach = self.params.radius * angle;
        let x = (center.x + reach * angle.cos() * self.viewport.aspect_ratio - size.width / 2.0)
            .floor();
        let y = (center.y + reach * angle.sin()).floor();
        Rect::from_origin_size(Point::new(x, y), size)
    }

    /// Finds the first free slot for `size`, starting at `start_offset`, and
    /// records it in `index`. The index is left untouched on exhaustion.
    pub fn place(&self, index: &mut CollisionIndex, size: Size, start_offset: usize) -> SpiralSearch {
        let mut probes = 0usize;

        for step in start_offset..self.params.max_steps {
            let rect = self.candidate(size, step);
            if !rect.is_strictly_inside(self.viewport.size) {
                continue;
            }
            probes += 1;
            if index.is_available(&rect) {
                index.insert(rect);
                return SpiralSearch::Placed { rect, step, probes };
            }
        }

        SpiralSearch::Exhausted { probes }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::overlaps;

    fn placer(width: f64, height: f64) -> SpiralPlacer {
        SpiralPlacer::new(Viewport::new(Size::new(width, height)), SpiralParams::default())
    }

    fn rect(v: [f64; 4]) -> Rect {
        Rect::from(v)
    }

    #[test]
    fn test_viewport_aspect_and_center() {
        let vp = Viewport::new(Size::new(501.0, 678.0));
        assert_eq!(vp.center(), Point::new(250.0, 339.0));
        let wide = Viewport::new(Size::new(400.0, 200.0));
        assert_eq!(wide.aspect_ratio, 2.0);
    }

    #[test]
    fn test_placer_keeps_viewport() {
        let p = placer(400.0, 200.0);
        assert_eq!(p.viewport().size, Size::new(400.0, 200.0));
        assert_eq!(p.viewport().center(), Point::new(200.0, 100.0));
    }

    #[test]
    fn test_first_box_lands_at_center() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        let result = p.place(&mut index, Size::new(10.0, 10.0), 0);
        assert_eq!(result.rect(), Some(rect([95.0, 100.0, 105.0, 110.0])));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_unit_box_placement() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        p.place(&mut index, Size::new(1.0, 1.0), 0);
        assert_eq!(index.as_slice(), &[rect([99.0, 100.0, 100.0, 101.0])]);
    }

    #[test]
    fn test_spirals_outwards_with_zero_offset() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        let size = Size::new(10.0, 10.0);

        let first = p.place(&mut index, size, 0);
        let second = p.place(&mut index, size, 0);
        let third = p.place(&mut index, size, 0);

        assert_eq!(first.rect(), Some(rect([95.0, 100.0, 105.0, 110.0])));
        assert_eq!(second.rect(), Some(rect([84.0, 109.0, 94.0, 119.0])));
        assert_eq!(third.rect(), Some(rect([75.0, 98.0, 85.0, 108.0])));
        assert_eq!(
            [first.probes(), second.probes(), third.probes()],
            [1, 25, 33]
        );
    }

    #[test]
    fn test_start_offset_skips_known_taken_steps() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        let size = Size::new(10.0, 10.0);

        let first = p.place(&mut index, size, 0);
        let second = p.place(&mut index, size, 1);
        let third = p.place(&mut index, size, 2);

        assert_eq!(second.rect(), Some(rect([84.0, 109.0, 94.0, 119.0])));
        assert_eq!(third.rect(), Some(rect([75.0, 98.0, 85.0, 108.0])));
        assert_eq!(
            [first.probes(), second.probes(), third.probes()],
            [1, 24, 31]
        );
    }

    #[test]
    fn test_accepted_rects_stay_inside_and_disjoint() {
        let p = placer(320.0, 180.0);
        let mut index = CollisionIndex::new();
        let sizes = [
            Size::new(80.0, 30.0),
            Size::new(50.0, 20.0),
            Size::new(64.0, 18.0),
            Size::new(30.0, 14.0),
            Size::new(42.0, 14.0),
            Size::new(25.0, 12.0),
        ];
        for (i, size) in sizes.iter().enumerate() {
            p.place(&mut index, *size, i);
        }
        let rects = index.as_slice();
        assert!(!rects.is_empty());
        for (i, a) in rects.iter().enumerate() {
            assert!(a.left > 0.0 && a.top > 0.0 && a.right < 320.0 && a.bottom < 180.0);
            for b in &rects[i + 1..] {
                assert!(!overlaps(b, a), "{b:?} overlaps earlier {a:?}");
            }
        }
    }

    #[test]
    fn test_oversized_box_is_exhausted() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        let result = p.place(&mut index, Size::new(250.0, 10.0), 0);
        assert_eq!(result, SpiralSearch::Exhausted { probes: 0 });
        assert!(index.is_empty());
    }

    #[test]
    fn test_offset_past_limit_is_exhausted() {
        let p = placer(200.0, 200.0);
        let mut index = CollisionIndex::new();
        let result = p.place(&mut index, Size::new(1.0, 1.0), 360);
        assert!(matches!(result, SpiralSearch::Exhausted { probes: 0 }));
    }

    #[test]
    fn test_aspect_ratio_stretches_horizontal_reach() {
        let square = placer(200.0, 200.0);
        let wide = placer(400.0, 200.0);
        let size = Size::new(2.0, 2.0);
        let a = square.candidate(size, 10);
        let b = wide.candidate(size, 10);
        // angle 1.0: 6 * cos(1) ≈ 3.24, doubled for the wide container
        assert_eq!(a.left, 102.0);
        assert_eq!(b.left, 205.0);
        assert_eq!(a.top, b.top);
    }
}
