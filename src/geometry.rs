//! Axis-aligned box primitives for detection fusion.
//!
//! All overlap math uses the inclusive-pixel convention inherited from the
//! legacy system: a box covers `x1..=x2` and `y1..=y2`, so two boxes sharing
//! a single edge pixel still intersect with area >= 1.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in integer pixel coordinates.
///
/// Invariant: `x1 < x2` and `y1 < y2`. Boxes are immutable once produced by
/// a detector for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        debug_assert!(x1 < x2 && y1 < y2, "degenerate bounding box");
        Self { x1, y1, x2, y2 }
    }

    /// Inclusive-pixel area of the box itself.
    pub fn area(&self) -> i64 {
        (self.x2 - self.x1 + 1) as i64 * (self.y2 - self.y1 + 1) as i64
    }
}

/// Area of the intersection rectangle of two boxes, inclusive-pixel
/// convention. Returns 0 when the boxes are disjoint.
pub fn overlap_area(a: &BoundingBox, b: &BoundingBox) -> i64 {
    let w = (a.x2.min(b.x2) - a.x1.max(b.x1) + 1).max(0) as i64;
    let h = (a.y2.min(b.y2) - a.y1.max(b.y1) + 1).max(0) as i64;
    w * h
}

/// Association overlap policy: any positive overlap counts.
///
/// The legacy system compared the raw pixel area against the constant 0.1,
/// which any 1-px overlap satisfies. That permissive semantics is load-bearing
/// for parity and is kept here as a named predicate rather than a fixed
/// normalized-ratio threshold.
pub fn has_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    overlap_area(a, b) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_overlap_equals_inclusive_area() {
        let a = BoundingBox::new(10, 20, 30, 50);
        assert_eq!(overlap_area(&a, &a), a.area());
        assert_eq!(a.area(), 21 * 31);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = BoundingBox::new(0, 0, 100, 100);
        let b = BoundingBox::new(50, 60, 150, 160);
        assert_eq!(overlap_area(&a, &b), overlap_area(&b, &a));
        assert_eq!(overlap_area(&a, &b), 51 * 41);
    }

    #[test]
    fn disjoint_boxes_have_zero_overlap() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(12, 0, 20, 10);
        assert_eq!(overlap_area(&a, &b), 0);
        assert!(!has_overlap(&a, &b));
    }

    #[test]
    fn edge_sharing_boxes_overlap_inclusively() {
        // x2 == b.x1: the shared column counts under the inclusive convention.
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(10, 0, 20, 10);
        assert_eq!(overlap_area(&a, &b), 11);
        assert!(has_overlap(&a, &b));
    }
}
