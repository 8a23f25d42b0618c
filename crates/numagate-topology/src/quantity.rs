//! Fixed-point resource quantities.
//!
//! The resource manager mirrored here reports amounts as decimal strings
//! with optional suffixes: whole units (`"4"`), milli-units (`"500m"`),
//! and binary byte multiples (`"2Gi"`). `Quantity` stores everything as
//! signed milli-units so container-scope subtraction can detect (and log)
//! negative leftovers instead of silently wrapping.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A resource amount in milli-units.
///
/// One CPU core is `1000` millis, one byte of memory is `1000` millis.
/// Quantities only ever compare against quantities of the same resource,
/// so the shared scale is safe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(i64);

impl Quantity {
    /// A zero amount.
    pub const ZERO: Self = Self(0);

    /// Quantity of `units` whole units (cores, bytes, devices).
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(1000))
    }

    /// Quantity of `millis` milli-units.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

/// Addition saturates at the i64 range; quantities near the boundary are
/// far beyond anything a node can report.
impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// Subtraction may go negative; callers check [`Quantity::is_negative`]
/// where that matters.
impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}", self.0 / 1000)
        } else {
            write!(f, "{}m", self.0)
        }
    }
}

impl FromStr for Quantity {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, ParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseError::InvalidQuantity(value.to_string()));
        }

        let split = value
            .find(|c: char| c.is_alphabetic())
            .unwrap_or(value.len());
        let (numeric, suffix) = value.split_at(split);

        let amount: i64 = numeric
            .parse()
            .map_err(|_| ParseError::InvalidQuantity(value.to_string()))?;

        // "m" scales down to millis; the binary suffixes scale whole bytes up.
        let millis = match suffix {
            "m" => Some(amount),
            "" => amount.checked_mul(1000),
            "Ki" => amount.checked_mul(1000 * 1024),
            "Mi" => amount.checked_mul(1000 * 1024 * 1024),
            "Gi" => amount.checked_mul(1000 * 1024 * 1024 * 1024),
            "Ti" => amount.checked_mul(1000 * 1024 * 1024 * 1024 * 1024),
            other => return Err(ParseError::UnsupportedSuffix(other.to_string())),
        };

        millis
            .map(Self)
            .ok_or_else(|| ParseError::OutOfRange(value.to_string()))
    }
}

impl TryFrom<String> for Quantity {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, ParseError> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> String {
        quantity.to_string()
    }
}
