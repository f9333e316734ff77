//! Orientation independent geometry.
//!
//! Linear layouts run the same algorithm along either axis. The types here
//! name the axes *primary* (the direction children are stacked in) and
//! *secondary* (across it) and convert from and to real geometry for a given
//! [`Orientation`].

use boden_core::{Margin, Point, Rect, Size};

use crate::view::alignment::{HorizontalAlignment, VerticalAlignment};

/// Direction children are stacked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        self == Self::Horizontal
    }

    /// The perpendicular orientation.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualPoint {
    pub primary: f64,
    pub secondary: f64,
}

impl VirtualPoint {
    pub const fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }

    pub fn from_point(point: Point, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::new(point.x, point.y),
            Orientation::Vertical => Self::new(point.y, point.x),
        }
    }

    pub fn to_point(self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::Horizontal => Point::new(self.primary, self.secondary),
            Orientation::Vertical => Point::new(self.secondary, self.primary),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualSize {
    pub primary: f64,
    pub secondary: f64,
}

impl VirtualSize {
    pub const fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }

    pub fn from_size(size: Size, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::new(size.width, size.height),
            Orientation::Vertical => Self::new(size.height, size.width),
        }
    }

    pub fn to_size(self, orientation: Orientation) -> Size {
        match orientation {
            Orientation::Horizontal => Size::new(self.primary, self.secondary),
            Orientation::Vertical => Size::new(self.secondary, self.primary),
        }
    }

    /// Lower each component to the matching finite component of `maximum`.
    pub fn apply_maximum(&mut self, maximum: VirtualSize) {
        if maximum.primary.is_finite() && !(self.primary.is_finite() && self.primary <= maximum.primary) {
            self.primary = maximum.primary;
        }
        if maximum.secondary.is_finite()
            && !(self.secondary.is_finite() && self.secondary <= maximum.secondary)
        {
            self.secondary = maximum.secondary;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualRect {
    pub primary: f64,
    pub secondary: f64,
    pub primary_size: f64,
    pub secondary_size: f64,
}

impl VirtualRect {
    pub fn from_position_size(position: VirtualPoint, size: VirtualSize) -> Self {
        Self {
            primary: position.primary,
            secondary: position.secondary,
            primary_size: size.primary,
            secondary_size: size.secondary,
        }
    }

    pub fn from_rect(rect: Rect, orientation: Orientation) -> Self {
        Self::from_position_size(
            VirtualPoint::from_point(rect.position(), orientation),
            VirtualSize::from_size(rect.size(), orientation),
        )
    }

    pub fn to_rect(self, orientation: Orientation) -> Rect {
        Rect::from_position_size(
            self.position().to_point(orientation),
            self.size().to_size(orientation),
        )
    }

    pub fn position(&self) -> VirtualPoint {
        VirtualPoint::new(self.primary, self.secondary)
    }

    pub fn size(&self) -> VirtualSize {
        VirtualSize::new(self.primary_size, self.secondary_size)
    }

    /// The far edge on the primary axis.
    pub fn primary_end(&self) -> f64 {
        self.primary + self.primary_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualMargin {
    pub primary_near: f64,
    pub primary_far: f64,
    pub secondary_near: f64,
    pub secondary_far: f64,
}

impl VirtualMargin {
    pub fn from_margin(margin: Margin, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self {
                primary_near: margin.left,
                primary_far: margin.right,
                secondary_near: margin.top,
                secondary_far: margin.bottom,
            },
            Orientation::Vertical => Self {
                primary_near: margin.top,
                primary_far: margin.bottom,
                secondary_near: margin.left,
                secondary_far: margin.right,
            },
        }
    }

    pub fn to_margin(self, orientation: Orientation) -> Margin {
        match orientation {
            Orientation::Horizontal => Margin::new(
                self.primary_near,
                self.secondary_near,
                self.primary_far,
                self.secondary_far,
            ),
            Orientation::Vertical => Margin::new(
                self.secondary_near,
                self.primary_near,
                self.secondary_far,
                self.primary_far,
            ),
        }
    }

    #[inline]
    pub fn primary(&self) -> f64 {
        self.primary_near + self.primary_far
    }

    #[inline]
    pub fn secondary(&self) -> f64 {
        self.secondary_near + self.secondary_far
    }
}

/// Alignment along one virtual axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VirtualAlignment {
    #[default]
    Near,
    Middle,
    Far,
    Expand,
}

impl VirtualAlignment {
    /// Fraction of the free space placed before the element.
    pub fn offset_factor(self) -> f64 {
        match self {
            Self::Near | Self::Expand => 0.0,
            Self::Middle => 0.5,
            Self::Far => 1.0,
        }
    }

    /// The alignment of a view along each axis of `orientation`, as
    /// `(primary, secondary)`.
    pub fn of_view(
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
        orientation: Orientation,
    ) -> (Self, Self) {
        let (h, v) = (Self::from(horizontal), Self::from(vertical));
        match orientation {
            Orientation::Horizontal => (h, v),
            Orientation::Vertical => (v, h),
        }
    }
}

impl From<HorizontalAlignment> for VirtualAlignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Self::Near,
            HorizontalAlignment::Center => Self::Middle,
            HorizontalAlignment::Right => Self::Far,
            HorizontalAlignment::Expand => Self::Expand,
        }
    }
}

impl From<VerticalAlignment> for VirtualAlignment {
    fn from(alignment: VerticalAlignment) -> Self {
        match alignment {
            VerticalAlignment::Top => Self::Near,
            VerticalAlignment::Middle => Self::Middle,
            VerticalAlignment::Bottom => Self::Far,
            VerticalAlignment::Expand => Self::Expand,
        }
    }
}
