use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A color in the OKLCH model, the only color model theme documents use.
///
/// - `l`: perceptual lightness, 0.0 – 1.0
/// - `c`: chroma, 0.0 – 0.5
/// - `h`: hue angle in degrees, 0.0 – 360.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Oklch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Whether every channel lies inside the ranges accepted by the schema.
    pub fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.l) && (0.0..=0.5).contains(&self.c) && (0.0..=360.0).contains(&self.h)
    }

    /// CSS `oklch()` function text. Channels are clamped and the hue is
    /// normalized so the output is always a valid CSS color.
    pub fn to_css(&self) -> String {
        let l = self.l.clamp(0.0, 1.0);
        let c = self.c.clamp(0.0, 0.5);
        let h = self.h.rem_euclid(360.0);
        format!("oklch({l} {c} {h})")
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// CSS length units accepted for spacing, radius, size and font-size tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Px,
    Rem,
    Em,
    Percent,
    Vw,
    Vh,
    Ch,
}

impl LengthUnit {
    const ALL: [LengthUnit; 7] = [
        LengthUnit::Px,
        LengthUnit::Rem,
        LengthUnit::Em,
        LengthUnit::Percent,
        LengthUnit::Vw,
        LengthUnit::Vh,
        LengthUnit::Ch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
            Self::Em => "em",
            Self::Percent => "%",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Ch => "ch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthError {
    #[error("empty length")]
    Empty,
    #[error("unknown or missing unit in `{0}`")]
    UnknownUnit(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("`{0}` is negative")]
    Negative(String),
}

/// A non-negative CSS length. A bare `0` is the only unitless length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: Option<LengthUnit>,
}

impl Dimension {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self {
            value,
            unit: Some(unit),
        }
    }

    pub const fn zero() -> Self {
        Self {
            value: 0.0,
            unit: None,
        }
    }
}

impl FromStr for Dimension {
    type Err = LengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LengthError::Empty);
        }
        if s == "0" {
            return Ok(Self::zero());
        }

        let Some(unit) = LengthUnit::ALL
            .into_iter()
            .find(|unit| s.ends_with(unit.as_str()))
        else {
            return Err(LengthError::UnknownUnit(s.to_string()));
        };
        let number = &s[..s.len() - unit.as_str().len()];
        let value: f64 = number
            .parse()
            .map_err(|_| LengthError::NotANumber(s.to_string()))?;
        if !value.is_finite() {
            return Err(LengthError::NotANumber(s.to_string()));
        }
        if value < 0.0 {
            return Err(LengthError::Negative(s.to_string()));
        }
        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}{}", self.value, unit.as_str()),
            None => write!(f, "{}", self.value),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
