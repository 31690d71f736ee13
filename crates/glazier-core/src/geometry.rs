#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing normalized coordinates.
///
/// Children of a split are considered to tile their parent when every
/// offset and extent agrees within this bound.
pub const TILING_EPSILON: f64 = 1e-9;

/// Layout axis in normalized frame space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Left to right.
    X,
    /// Top to bottom.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// A point in normalized frame space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in normalized frame coordinates.
///
/// Every component lies in `[0, 1]` and is expressed relative to the whole
/// frame, not to the parent section. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width as a fraction of the frame width.
    pub w: f64,
    /// Height as a fraction of the frame height.
    pub h: f64,
}

impl Rect {
    /// The whole frame.
    pub const UNIT: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Leading edge along `axis`.
    #[inline]
    pub const fn offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Size along `axis`.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }

    /// Trailing edge along `axis`.
    #[inline]
    pub fn end(&self, axis: Axis) -> f64 {
        self.offset(axis) + self.extent(axis)
    }

    /// Copy of this rectangle with a new offset and extent along `axis`.
    ///
    /// The cross-axis span is left untouched.
    #[inline]
    #[must_use]
    pub const fn with_span(self, axis: Axis, offset: f64, extent: f64) -> Self {
        match axis {
            Axis::X => Self::new(offset, self.y, extent, self.h),
            Axis::Y => Self::new(self.x, offset, self.w, extent),
        }
    }

    /// Normalized area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Zero or negative width or height.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Rect, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.w - other.w).abs() <= epsilon
            && (self.h - other.h).abs() <= epsilon
    }

    /// Map a rectangle expressed inside `from` to the same relative position
    /// inside `to`.
    ///
    /// Used to carry a subtree along when its container is resized or moved.
    /// A degenerate `from` yields `to` unchanged.
    #[must_use]
    pub fn remap(&self, from: &Rect, to: &Rect) -> Rect {
        if from.is_degenerate() {
            return *to;
        }
        let sx = to.w / from.w;
        let sy = to.h / from.h;
        Rect::new(
            to.x + (self.x - from.x) * sx,
            to.y + (self.y - from.y) * sy,
            self.w * sx,
            self.h * sy,
        )
    }

    /// Split into `count` equal parts along `axis`.
    ///
    /// The last part absorbs floating residue so the parts end exactly on
    /// this rectangle's trailing edge. `count == 0` yields no parts.
    pub fn split_even(&self, axis: Axis, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let start = self.offset(axis);
        let end = self.end(axis);
        let step = self.extent(axis) / count as f64;
        (0..count)
            .map(|i| {
                let offset = start + step * i as f64;
                let extent = if i + 1 == count { end - offset } else { step };
                self.with_span(axis, offset, extent)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Rect, TILING_EPSILON};

    #[test]
    fn unit_rect_spans_frame() {
        assert_eq!(Rect::UNIT.right(), 1.0);
        assert_eq!(Rect::UNIT.bottom(), 1.0);
        assert_eq!(Rect::UNIT.area(), 1.0);
    }

    #[test]
    fn span_accessors_follow_axis() {
        let rect = Rect::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(rect.offset(Axis::X), 0.1);
        assert_eq!(rect.offset(Axis::Y), 0.2);
        assert_eq!(rect.extent(Axis::X), 0.3);
        assert_eq!(rect.extent(Axis::Y), 0.4);
        assert_eq!(Axis::X.cross(), Axis::Y);
    }

    #[test]
    fn with_span_keeps_cross_axis() {
        let rect = Rect::new(0.0, 0.25, 0.5, 0.5).with_span(Axis::X, 0.2, 0.3);
        assert_eq!(rect, Rect::new(0.2, 0.25, 0.3, 0.5));
    }

    #[test]
    fn degenerate_detects_zero_and_negative() {
        assert!(Rect::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 1.0, -0.1).is_degenerate());
        assert!(!Rect::UNIT.is_degenerate());
    }

    #[test]
    fn split_even_tiles_exactly() {
        let parts = Rect::new(0.1, 0.0, 0.7, 1.0).split_even(Axis::X, 3);
        assert_eq!(parts.len(), 3);
        let total: f64 = parts.iter().map(|r| r.w).sum();
        assert!((total - 0.7).abs() < TILING_EPSILON);
        assert_eq!(parts[2].right(), 0.1 + 0.7);
        assert!((parts[1].x - parts[0].right()).abs() < TILING_EPSILON);
    }

    #[test]
    fn remap_scales_into_target() {
        let from = Rect::new(0.0, 0.0, 0.5, 1.0);
        let to = Rect::new(0.5, 0.0, 0.25, 1.0);
        let inner = Rect::new(0.25, 0.5, 0.25, 0.5);
        let mapped = inner.remap(&from, &to);
        assert!(mapped.approx_eq(&Rect::new(0.625, 0.5, 0.125, 0.5), TILING_EPSILON));
    }

    #[test]
    fn remap_from_degenerate_returns_target() {
        let to = Rect::new(0.2, 0.2, 0.2, 0.2);
        let mapped = Rect::UNIT.remap(&Rect::new(0.0, 0.0, 0.0, 1.0), &to);
        assert_eq!(mapped, to);
    }
}
