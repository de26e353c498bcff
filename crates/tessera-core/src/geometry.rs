//! Geometric primitives for block layout and positioning.
//!
//! This module provides the geometric types used throughout Tessera for
//! calculating the sizes and positions of blocks and the routes of edges.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Tessera uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Blocks are positioned by their **center**. The root block of a diagram is
//! centered at the origin, so laid-out coordinates are frequently negative.

use serde::Serialize;

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Returns true when both coordinates are neither NaN nor infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// A 2D size with width and height.
///
/// ```
/// # use tessera_core::geometry::Size;
/// let cell = Size::new(40.0, 20.0).max(Size::new(10.0, 30.0));
/// assert_eq!(cell, Size::new(40.0, 30.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified width and height
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.height
    }

    /// Creates a new size with the specified width
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Returns a size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Checks if both dimensions are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns true when both dimensions are neither NaN nor infinite.
    pub fn is_finite(self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// An axis-aligned rectangle stored as its minimum and maximum corners.
///
/// ```
/// # use tessera_core::geometry::{Bounds, Point, Size};
/// let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(20.0, 10.0));
/// assert_eq!(bounds.min_x(), -10.0);
/// assert_eq!(bounds.max_y(), 5.0);
/// assert_eq!(bounds.center(), Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds centered on `center` with the given size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the smallest bounds that contain both `self` and `other`
    pub fn merge(self, other: Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns true when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(self, other: Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Returns true when every corner coordinate is finite.
    pub fn is_finite(self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_midpoint() {
        let mid = Point::new(0.0, 0.0).midpoint(Point::new(10.0, -4.0));
        assert_eq!(mid, Point::new(5.0, -2.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_approx_eq!(f32, Point::new(3.0, 4.0).hypot(), 5.0);
    }

    #[test]
    fn test_size_max() {
        let size = Size::new(10.0, 40.0).max(Size::new(30.0, 5.0));
        assert_eq!(size, Size::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_merge_and_contains() {
        let a = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_center(Point::new(20.0, 5.0), Size::new(4.0, 4.0));
        let merged = a.merge(b);

        assert!(merged.contains(a));
        assert!(merged.contains(b));
        assert_approx_eq!(f32, merged.width(), 27.0);
        assert_approx_eq!(f32, merged.height(), 12.0);
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Size::new(0.0, f32::INFINITY).is_finite());
        assert!(Bounds::default().is_finite());
    }

    proptest! {
        #[test]
        fn prop_merge_contains_both(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            w in 0.0f32..200.0, h in 0.0f32..200.0,
        ) {
            let a = Bounds::new_from_center(Point::new(ax, ay), Size::new(w, h));
            let b = Bounds::new_from_center(Point::new(bx, by), Size::new(h, w));
            let merged = a.merge(b);
            prop_assert!(merged.contains(a));
            prop_assert!(merged.contains(b));
        }
    }
}
