//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 × 12.35 = 1.2350000000000001                                     │
//! │    19.99 × 100 = 1998.9999999999998                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    The backend speaks 2-decimal numbers. We convert them to cents ONCE │
//! │    at the wire boundary (round-half-up with an epsilon nudge) and do   │
//! │    every sum, threshold and percentage on integers afterwards.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharmacy_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2u32;          // $21.98
//! let wire = Money::from_decimal(19.99);
//! assert_eq!(wire.cents(), 1999);
//! assert_eq!(doubled.cents(), 2198);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Wire Format
/// Serialized as a JSON number with two decimals (`12.5`, `130`), which is
/// what the backend stores and returns. Internally always cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a 2-decimal wire amount into cents.
    ///
    /// Rounds half up at the second decimal after an `f64::EPSILON` nudge,
    /// the same `round(x * 100 + EPSILON) / 100` the backend applies.
    ///
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(19.99).cents(), 1999);
    /// assert_eq!(Money::from_decimal(0.125).cents(), 13);
    /// assert_eq!(Money::from_decimal(10.0).cents(), 1000);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0 + f64::EPSILON + 0.5).floor() as i64)
    }

    /// Returns the value as a 2-decimal number for the wire.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }

    /// Returns `bps` basis points of this amount, rounded half up.
    ///
    /// ## Implementation
    /// `(amount × bps + 5000) / 10000` with a floor division, so halves
    /// always move towards positive infinity, the same way the storefront
    /// rounds on the backend.
    ///
    /// ```rust
    /// use pharmacy_core::money::Money;
    ///
    /// // 10% of 12.35 = 1.235 → 1.24
    /// assert_eq!(Money::from_cents(1235).percentage(1000).cents(), 124);
    /// // 10% of 130.00 = 13.00
    /// assert_eq!(Money::from_cents(13000).percentage(1000).cents(), 1300);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 so a large cart cannot overflow the intermediate product
        let scaled = self.0 as i128 * bps as i128 + 5000;
        Money(scaled.div_euclid(10000) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. User-facing formatting lives in the storefront
/// config so the currency symbol can change.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Serde (2-decimal JSON numbers)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a monetary amount as a number or numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("monetary amount must be finite"));
        }
        Ok(Money::from_decimal(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money::from_cents(v * 100))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map(|v| Money::from_cents(v * 100))
            .map_err(|_| E::custom("monetary amount out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid monetary amount: {v}")))
            .and_then(|f| self.visit_f64(f))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
