//! Unit-tagged lengths.
//!
//! A [`UiLength`] is resolved into DIPs by the backend, since `em` and `sem`
//! depend on font metrics. The results must be recomputed whenever the
//! backend's font or scale changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BodenError, Result};

/// Units a [`UiLength`] can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum UiUnit {
    /// No length. Always resolves to zero.
    #[default]
    None,
    /// Device-independent pixels.
    Dip,
    /// Multiples of the current font size.
    Em,
    /// Semantic em: multiples of the system's default UI font size.
    Sem,
}

impl UiUnit {
    /// The suffix used in the text form.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dip => "dip",
            Self::Em => "em",
            Self::Sem => "sem",
        }
    }
}

/// A length together with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UiLength {
    pub unit: UiUnit,
    pub value: f64,
}

impl UiLength {
    /// The "no length" value.
    pub const NONE: Self = Self {
        unit: UiUnit::None,
        value: 0.0,
    };

    pub const fn new(unit: UiUnit, value: f64) -> Self {
        Self { unit, value }
    }

    pub const fn dip(value: f64) -> Self {
        Self::new(UiUnit::Dip, value)
    }

    pub const fn em(value: f64) -> Self {
        Self::new(UiUnit::Em, value)
    }

    pub const fn sem(value: f64) -> Self {
        Self::new(UiUnit::Sem, value)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.unit == UiUnit::None
    }
}

impl fmt::Display for UiLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            UiUnit::None => f.write_str("none"),
            unit => write!(f, "{}{}", self.value, unit.suffix()),
        }
    }
}

impl FromStr for UiLength {
    type Err = BodenError;

    /// Parse the text form: `none`, or a number followed by `dip`, `em` or
    /// `sem`. A bare number is taken as DIPs.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Ok(Self::NONE);
        }

        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);
        let value: f64 = number.trim().parse().map_err(|_| {
            BodenError::invalid_argument(format!("'{s}' does not start with a number"))
        })?;

        let unit = match suffix.to_ascii_lowercase().as_str() {
            "" | "dip" => UiUnit::Dip,
            "em" => UiUnit::Em,
            "sem" => UiUnit::Sem,
            other => {
                return Err(BodenError::invalid_argument(format!(
                    "unknown length unit '{other}' in '{s}'"
                )));
            }
        };
        Ok(Self::new(unit, value))
    }
}

/// Four unit-tagged lengths, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UiMargin {
    pub top: UiLength,
    pub right: UiLength,
    pub bottom: UiLength,
    pub left: UiLength,
}

impl UiMargin {
    /// A margin of "no length" on every side.
    pub const NONE: Self = Self::uniform(UiLength::NONE);

    pub const fn new(top: UiLength, right: UiLength, bottom: UiLength, left: UiLength) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(length: UiLength) -> Self {
        Self::new(length, length, length, length)
    }

    /// A margin where the vertical sides share one length and the horizontal
    /// sides share another.
    pub const fn symmetric(vertical: UiLength, horizontal: UiLength) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// A margin in DIPs, with the side order of [`crate::Margin::new`].
    pub const fn dips(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(
            UiLength::dip(top),
            UiLength::dip(right),
            UiLength::dip(bottom),
            UiLength::dip(left),
        )
    }
}
