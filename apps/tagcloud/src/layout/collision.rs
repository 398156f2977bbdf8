//! Collision index: the rectangles already claimed during the current pass.

use crate::layout::geometry::{overlaps, Rect};

/// Ordered set of accepted rectangles.
///
/// Entries are only ever appended; an accepted rectangle is never revisited.
/// The orchestrator clears the index at the start of each pass.
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    taken: Vec<Rect>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.taken.clear();
    }

    /// True when `candidate` overlaps none of the stored rectangles.
    pub fn is_available(&self, candidate: &Rect) -> bool {
        !self.taken.iter().any(|stored| overlaps(candidate, stored))
    }

    pub fn insert(&mut self, rect: Rect) {
        self.taken.push(rect);
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.taken.iter()
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Index holding the 1x1 box a 200x200 container places first.
    fn index_with_unit_box() -> CollisionIndex {
        let mut index = CollisionIndex::new();
        index.insert(Rect::from([99.0, 100.0, 100.0, 101.0]));
        index
    }

    #[test]
    fn test_empty_index_accepts_anything() {
        let index = CollisionIndex::new();
        assert!(index.is_available(&Rect::from([0.0, 0.0, 1000.0, 1000.0])));
        assert!(index.is_empty());
    }

    #[test]
    fn test_available_when_clear_of_stored_box() {
        let index = index_with_unit_box();
        assert!(index.is_available(&Rect::from([97.0, 98.0, 98.0, 100.0])));
    }

    #[test]
    fn test_rejects_top_edge_crossing() {
        let index = index_with_unit_box();
        assert!(!index.is_available(&Rect::from([99.0, 98.0, 101.0, 100.0])));
    }

    #[test]
    fn test_rejects_left_edge_crossing() {
        let index = index_with_unit_box();
        assert!(!index.is_available(&Rect::from([97.0, 99.0, 101.0, 100.0])));
    }

    #[test]
    fn test_rejects_right_edge_crossing() {
        let index = index_with_unit_box();
        assert!(!index.is_available(&Rect::from([97.0, 98.0, 101.0, 101.0])));
    }

    #[test]
    fn test_rejects_bottom_edge_crossing() {
        let index = index_with_unit_box();
        assert!(!index.is_available(&Rect::from([97.0, 98.0, 100.0, 100.0])));
    }

    #[test]
    fn test_rejects_intersecting_box() {
        let index = index_with_unit_box();
        assert!(!index.is_available(&Rect::from([98.0, 98.0, 101.0, 101.0])));
    }

    #[test]
    fn test_rejects_thin_box_below_stored_edge() {
        let mut index = CollisionIndex::new();
        index.insert(Rect::from([10.0, 10.0, 20.0, 20.0]));
        let candidate = Rect::from([12.0, 20.2, 18.0, 20.7]);
        assert!(!candidate.box_intersects(&index.as_slice()[0]));
        assert!(!index.is_available(&candidate));
    }

    #[test]
    fn test_clear_resets() {
        let mut index = index_with_unit_box();
        assert_eq!(index.len(), 1);
        index.clear();
        assert!(index.is_empty());
        assert!(index.is_available(&Rect::from([99.0, 100.0, 100.0, 101.0])));
    }

    #[test]
    fn test_checks_every_stored_rect() {
        let mut index = index_with_unit_box();
        index.insert(Rect::from([10.0, 10.0, 20.0, 20.0]));
        assert!(!index.is_available(&Rect::from([15.0, 15.0, 30.0, 30.0])));
        assert_eq!(index.iter().count(), 2);
    }
}
