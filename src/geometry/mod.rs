//! Geometric primitives for layout analysis.
//!
//! Coordinates are page-relative with the origin at the top-left corner and
//! y growing downwards, matching the word records handed in by page sources.

pub mod clustering;
pub mod stats;

pub use clustering::{cluster_positions, AdaptiveClusterer};

/// An axis-aligned box in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub left: f64,
    /// Top edge y-coordinate
    pub top: f64,
    /// Right edge x-coordinate
    pub right: f64,
    /// Bottom edge y-coordinate
    pub bottom: f64,
}

impl BoundingBox {
    /// Create a box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.height(), 12.0);
    /// ```
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Smallest box containing both boxes.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::geometry::BoundingBox;
    ///
    /// let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    /// let b = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
    /// let u = a.union(&b);
    /// assert_eq!(u, BoundingBox::new(0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Vertical position relative to a page height, in `[0, 1]` for boxes on the page.
    pub fn relative_top(&self, page_height: f64) -> f64 {
        self.top / page_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let b = BoundingBox::new(5.0, 10.0, 105.0, 60.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 50.0);
    }

    #[test]
    fn test_bbox_union() {
        let a = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        let b = BoundingBox::new(0.0, 15.0, 15.0, 40.0);
        let u = a.union(&b);
        assert_eq!(u.left, 0.0);
        assert_eq!(u.top, 10.0);
        assert_eq!(u.right, 20.0);
        assert_eq!(u.bottom, 40.0);
    }

    #[test]
    fn test_relative_top() {
        let b = BoundingBox::new(0.0, 79.2, 10.0, 90.0);
        assert!((b.relative_top(792.0) - 0.1).abs() < 1e-9);
    }
}
