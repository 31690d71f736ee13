#![forbid(unsafe_code)]

//! Physical frame dimensions and millimeter/fraction conversion.
//!
//! Sections keep their geometry as fractions of the frame. Millimeters are
//! derived on demand and rounded only for display and editing, so repeated
//! edits never compound rounding error in the stored tree.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Rect};

/// Overall outer size of the frame in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl FrameSize {
    #[inline]
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Both sides finite and strictly positive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width_mm.is_finite()
            && self.height_mm.is_finite()
            && self.width_mm > 0.0
            && self.height_mm > 0.0
    }

    /// Physical size of the whole frame along `axis`.
    #[inline]
    pub const fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width_mm,
            Axis::Y => self.height_mm,
        }
    }

    /// Physical width of a normalized rectangle.
    #[inline]
    pub fn width_of(&self, rect: &Rect) -> f64 {
        fraction_to_mm(rect.w, self.width_mm)
    }

    /// Physical height of a normalized rectangle.
    #[inline]
    pub fn height_of(&self, rect: &Rect) -> f64 {
        fraction_to_mm(rect.h, self.height_mm)
    }

    /// Physical extent of a normalized rectangle along `axis`.
    #[inline]
    pub fn extent_of(&self, rect: &Rect, axis: Axis) -> f64 {
        fraction_to_mm(rect.extent(axis), self.along(axis))
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(1500.0, 1200.0)
    }
}

/// Physical length of a normalized extent `fraction` along a side of
/// `total_mm`.
#[inline]
pub fn fraction_to_mm(fraction: f64, total_mm: f64) -> f64 {
    fraction * total_mm
}

/// Normalized extent of `mm` along a side of `total_mm`.
///
/// A non-positive total maps everything to `0.0`.
#[inline]
pub fn mm_to_fraction(mm: f64, total_mm: f64) -> f64 {
    if total_mm > 0.0 { mm / total_mm } else { 0.0 }
}

/// Round to whole millimeters for display and editing.
///
/// Negative and non-finite inputs saturate to `0`.
#[inline]
pub fn round_mm(mm: f64) -> u32 {
    if !mm.is_finite() || mm <= 0.0 {
        return 0;
    }
    let rounded = mm.round();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
