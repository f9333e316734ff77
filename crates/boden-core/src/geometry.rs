//! Geometry primitives in device-independent pixels (DIPs).
//!
//! All components are `f64`. A component equal to [`COMPONENT_NONE`] means
//! "unconstrained" and behaves like positive infinity in comparisons. Code
//! combining a possibly unconstrained component with a finite value checks
//! `is_finite()` first.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// The sentinel component value meaning "unconstrained".
pub const COMPONENT_NONE: f64 = f64::INFINITY;

/// A 2D point in DIPs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D size in DIPs. Either component may be [`COMPONENT_NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// A zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// A size that is unconstrained on both axes.
    pub const NONE: Self = Self {
        width: COMPONENT_NONE,
        height: COMPONENT_NONE,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }

    /// Whether either component is NaN.
    #[inline]
    pub fn has_nan(&self) -> bool {
        self.width.is_nan() || self.height.is_nan()
    }

    /// Raise each component to the corresponding finite component of
    /// `minimum`. Unconstrained components of `minimum` are ignored; a
    /// non-finite component of `self` is replaced by the finite minimum.
    pub fn apply_minimum(&mut self, minimum: Size) {
        self.width = apply_minimum_component(self.width, minimum.width);
        self.height = apply_minimum_component(self.height, minimum.height);
    }

    /// Lower each component to the corresponding finite component of
    /// `maximum`. Unconstrained components of `maximum` are ignored; a
    /// non-finite component of `self` is replaced by the finite maximum.
    pub fn apply_maximum(&mut self, maximum: Size) {
        self.width = apply_maximum_component(self.width, maximum.width);
        self.height = apply_maximum_component(self.height, maximum.height);
    }

    /// Returns a copy with [`Size::apply_minimum`] applied.
    #[must_use]
    pub fn with_minimum(mut self, minimum: Size) -> Self {
        self.apply_minimum(minimum);
        self
    }

    /// Returns a copy with [`Size::apply_maximum`] applied.
    #[must_use]
    pub fn with_maximum(mut self, maximum: Size) -> Self {
        self.apply_maximum(maximum);
        self
    }

    /// Component-wise check that `self` fits into `space`. Unconstrained
    /// components of `space` accept any value.
    pub fn fits_into(&self, space: Size) -> bool {
        self.width <= space.width && self.height <= space.height
    }
}

fn apply_minimum_component(value: f64, minimum: f64) -> f64 {
    if !minimum.is_finite() {
        value
    } else if !value.is_finite() || value < minimum {
        minimum
    } else {
        value
    }
}

fn apply_maximum_component(value: f64, maximum: f64) -> f64 {
    if !maximum.is_finite() {
        value
    } else if !value.is_finite() || value > maximum {
        maximum
    } else {
        value
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}

impl Add<Margin> for Size {
    type Output = Size;

    /// Grow the size by the margin sums. Unconstrained components stay
    /// unconstrained.
    fn add(self, m: Margin) -> Size {
        Size::new(self.width + m.horizontal(), self.height + m.vertical())
    }
}

impl Sub<Margin> for Size {
    type Output = Size;

    fn sub(self, m: Margin) -> Size {
        Size::new(self.width - m.horizontal(), self.height - m.vertical())
    }
}

impl AddAssign<Margin> for Size {
    fn add_assign(&mut self, m: Margin) {
        *self = *self + m;
    }
}

impl SubAssign<Margin> for Size {
    fn sub_assign(&mut self, m: Margin) {
        *self = *self - m;
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle in DIPs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from a position and a size.
    #[inline]
    pub const fn from_position_size(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl Add<Margin> for Rect {
    type Output = Rect;

    /// Grow the rectangle outward by the margin.
    fn add(self, m: Margin) -> Rect {
        Rect::new(
            self.x - m.left,
            self.y - m.top,
            self.width + m.horizontal(),
            self.height + m.vertical(),
        )
    }
}

impl Sub<Margin> for Rect {
    type Output = Rect;

    /// Shrink the rectangle inward by the margin.
    fn sub(self, m: Margin) -> Rect {
        Rect::new(
            self.x + m.left,
            self.y + m.top,
            self.width - m.horizontal(),
            self.height - m.vertical(),
        )
    }
}

impl SubAssign<Margin> for Rect {
    fn sub_assign(&mut self, m: Margin) {
        *self = *self - m;
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Distances on the four sides of a rectangle, in DIPs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    /// A margin of zero on every side.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Create a margin from explicit side values.
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a margin with the same value on all sides.
    #[inline]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create a margin from a horizontal and a vertical value.
    #[inline]
    pub const fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Total horizontal margin (left + right).
    #[inline]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical margin (top + bottom).
    #[inline]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Add for Margin {
    type Output = Margin;

    fn add(self, rhs: Margin) -> Margin {
        Margin::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}
