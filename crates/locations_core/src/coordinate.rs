use std::fmt;
use std::str::FromStr;

use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

/// DynamoDB `N` attributes hold up to 38 significant digits with the leading
/// digit between 10^-130 and 10^125.
const MAX_SIGNIFICANT_DIGITS: usize = 38;
const MIN_LEADING_POWER: i64 = -130;
const MAX_LEADING_POWER: i64 = 125;

/// Which geographic axis a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    const LAT_DEG_MAX: u32 = 90;
    const LNG_DEG_MAX: u32 = 180;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }

    fn degree_bound(self) -> u32 {
        match self {
            Self::Latitude => Self::LAT_DEG_MAX,
            Self::Longitude => Self::LNG_DEG_MAX,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("'{0}' is not a decimal number")]
    NotNumeric(String),
    #[error("'{0}' has more than 38 significant digits")]
    TooPrecise(String),
    #[error("'{0}' is too large or too small to store")]
    Unstorable(String),
    #[error("{axis} must be a number or numeric string")]
    WrongType { axis: Axis },
    #[error("{axis} must be between -{bound} and {bound}", bound = .axis.degree_bound())]
    OutOfRange { axis: Axis },
}

/// A coordinate in decimal degrees, kept as its exact decimal text.
///
/// The text never passes through `f64` on its way to storage or to the wire:
/// it is written to DynamoDB as an `N` attribute and serialized as a raw JSON
/// number, so `40.712776000000001` comes back exactly as it went in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate(String);

impl Coordinate {
    /// Parses decimal text that a DynamoDB `N` attribute can hold, without
    /// any range check.
    pub fn parse(text: &str) -> Result<Self, CoordinateError> {
        let trimmed = text.trim();
        let number = Number::from_str(trimmed)
            .map_err(|_| CoordinateError::NotNumeric(trimmed.to_string()))?;
        let text = number.to_string();

        let magnitude = Magnitude::from_json_number(&text);
        if magnitude.digits.len() > MAX_SIGNIFICANT_DIGITS {
            return Err(CoordinateError::TooPrecise(text));
        }
        if let Some(power) = magnitude.leading_power() {
            if !(MIN_LEADING_POWER..=MAX_LEADING_POWER).contains(&power) {
                return Err(CoordinateError::Unstorable(text));
            }
        }
        Ok(Self(text))
    }

    /// Accepts a JSON number or a numeric string and checks the axis range.
    pub fn from_json(axis: Axis, value: &Value) -> Result<Self, CoordinateError> {
        let coordinate = match value {
            Value::Number(number) => Self::parse(&number.to_string())?,
            Value::String(text) => Self::parse(text)?,
            _ => return Err(CoordinateError::WrongType { axis }),
        };
        coordinate.within(axis)
    }

    /// Checks `|self| <= bound` on the decimal digits themselves.
    pub fn within(self, axis: Axis) -> Result<Self, CoordinateError> {
        let bound = Magnitude::from_integer(axis.degree_bound());
        if Magnitude::from_json_number(&self.0) <= bound {
            Ok(self)
        } else {
            Err(CoordinateError::OutOfRange { axis })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute value of a decimal as `digits × 10^exponent`, with no leading or
/// trailing zeros in `digits`. Zero has no digits.
#[derive(Debug, PartialEq, Eq)]
struct Magnitude {
    digits: String,
    exponent: i64,
}

impl Magnitude {
    /// `text` must follow the JSON number grammar. Exponents past the `i64`
    /// range saturate, which keeps them outside every storable range.
    fn from_json_number(text: &str) -> Self {
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, saturating_exponent(exponent)),
            None => (unsigned, 0),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        Self::normalized(
            &format!("{integer}{fraction}"),
            exponent.saturating_sub(fraction.len() as i64),
        )
    }

    fn from_integer(value: u32) -> Self {
        Self::normalized(&value.to_string(), 0)
    }

    fn normalized(raw_digits: &str, exponent: i64) -> Self {
        let significant = raw_digits.trim_start_matches('0');
        let digits = significant.trim_end_matches('0');
        if digits.is_empty() {
            return Self {
                digits: String::new(),
                exponent: 0,
            };
        }
        let trailing_zeros = (significant.len() - digits.len()) as i64;
        Self {
            digits: digits.to_string(),
            exponent: exponent.saturating_add(trailing_zeros),
        }
    }

    /// Power of ten of the leading digit; `None` for zero.
    fn leading_power(&self) -> Option<i64> {
        if self.digits.is_empty() {
            return None;
        }
        Some(self.exponent.saturating_add(self.digits.len() as i64 - 1))
    }
}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Magnitude {
    /// With equal leading powers, digit strings compare like the values they
    /// spell: a strict prefix is the smaller number.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.leading_power()
            .cmp(&other.leading_power())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

fn saturating_exponent(text: &str) -> i64 {
    text.parse().unwrap_or(if text.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = Number::from_str(&self.0).map_err(ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Self::parse(&number.to_string()).map_err(de::Error::custom),
            Value::String(text) => Self::parse(&text).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a decimal coordinate, found {other}"
            ))),
        }
    }
}
