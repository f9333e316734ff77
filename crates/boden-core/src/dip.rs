//! Device-independent pixel comparison and physical pixel alignment.
//!
//! Coordinates are computed in floating point, so two mathematically equal
//! calculations can land on either side of a pixel boundary. Values closer
//! than [`SIGNIFICANCE_BOUNDARY`] are treated as equal, both by the
//! comparisons on [`Dip`] and by [`Dip::pixel_align`].

use std::cmp::Ordering;

use crate::geometry::Rect;

/// Differences smaller than this (in DIPs) are insignificant.
pub const SIGNIFICANCE_BOUNDARY: f64 = 0.0001;

/// Rounding policy used when aligning to physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundType {
    /// Round to the closest pixel boundary.
    #[default]
    Nearest,
    /// Never smaller, never earlier.
    Up,
    /// Never bigger, never later.
    Down,
}

/// A DIP value with tolerant comparison semantics.
///
/// ```
/// use boden_core::dip::Dip;
///
/// assert!(Dip(10.00001) == 10.0);
/// assert!(Dip(10.1) > 10.0);
/// assert!(Dip(10.0) < f64::INFINITY);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dip(pub f64);

impl Dip {
    /// Compare two DIP values, ignoring insignificant differences.
    ///
    /// Infinite values compare as expected. Returns `None` if either value
    /// is NaN.
    pub fn compare(a: f64, b: f64) -> Option<Ordering> {
        if a.is_finite() && b.is_finite() {
            let diff = a - b;
            if diff < -SIGNIFICANCE_BOUNDARY {
                Some(Ordering::Less)
            } else if diff > SIGNIFICANCE_BOUNDARY {
                Some(Ordering::Greater)
            } else {
                Some(Ordering::Equal)
            }
        } else {
            a.partial_cmp(&b)
        }
    }

    /// Whether two values are insignificantly different.
    #[inline]
    pub fn equal(a: f64, b: f64) -> bool {
        Self::compare(a, b) == Some(Ordering::Equal)
    }

    /// Align a DIP value to a physical pixel boundary.
    ///
    /// `pixels_per_dip` is the number of physical pixels per DIP and does not
    /// have to be an integer. Values insignificantly close to a boundary snap
    /// to it regardless of `round`. With [`RoundType::Nearest`] a value on
    /// the halfway point rounds away from zero. Non-finite values are
    /// returned unchanged.
    pub fn pixel_align(value: f64, pixels_per_dip: f64, round: RoundType) -> f64 {
        if !value.is_finite() {
            return value;
        }

        let below = (value * pixels_per_dip).floor() / pixels_per_dip;
        let above = (value * pixels_per_dip).ceil() / pixels_per_dip;

        if Self::equal(value, below) {
            return below;
        }
        if Self::equal(value, above) {
            return above;
        }

        match round {
            RoundType::Nearest => {
                let halfway = (above + below) / 2.0;
                if Self::equal(value, halfway) {
                    if value < 0.0 { below } else { above }
                } else {
                    (value * pixels_per_dip).round() / pixels_per_dip
                }
            }
            RoundType::Up => above,
            RoundType::Down => below,
        }
    }

    /// Align a rectangle; position and size are rounded independently.
    pub fn pixel_align_rect(
        rect: Rect,
        pixels_per_dip: f64,
        position_round: RoundType,
        size_round: RoundType,
    ) -> Rect {
        Rect::new(
            Self::pixel_align(rect.x, pixels_per_dip, position_round),
            Self::pixel_align(rect.y, pixels_per_dip, position_round),
            Self::pixel_align(rect.width, pixels_per_dip, size_round),
            Self::pixel_align(rect.height, pixels_per_dip, size_round),
        )
    }
}

impl PartialEq<f64> for Dip {
    fn eq(&self, other: &f64) -> bool {
        Self::equal(self.0, *other)
    }
}

impl PartialOrd<f64> for Dip {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        Self::compare(self.0, *other)
    }
}

impl PartialEq for Dip {
    fn eq(&self, other: &Dip) -> bool {
        Self::equal(self.0, other.0)
    }
}

impl PartialOrd for Dip {
    fn partial_cmp(&self, other: &Dip) -> Option<Ordering> {
        Self::compare(self.0, other.0)
    }
}
