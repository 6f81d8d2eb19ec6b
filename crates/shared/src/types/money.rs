//! Monetary amount type with fixed two-decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal`, which carries 28 significant
//! digits for intermediate arithmetic. Every `MonetaryAmount` is stored at
//! exactly [`AMOUNT_SCALE`] fractional digits.
//!
//! Rounding never depends on ambient state: every conversion from a raw
//! `Decimal` names its [`Rounding`] explicitly.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by every monetary amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Errors raised when constructing an amount from an arbitrary decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The value has more fractional digits than the amount grid allows.
    #[error("Amount {0} has more than 2 fractional digits")]
    ExcessPrecision(Decimal),

    /// The text could not be parsed as a decimal number.
    #[error("Invalid amount: {0}")]
    Parse(String),
}

/// Rounding direction used when projecting a decimal onto the cent grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round half away from zero (half-up for non-negative values).
    HalfUp,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceiling,
}

impl Rounding {
    const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
        }
    }
}

/// An exact decimal amount with two fractional digits.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, AMOUNT_SCALE));

    /// The smallest representable step, 0.01.
    pub const CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, AMOUNT_SCALE));

    /// Creates an amount from a decimal that already lies on the cent grid.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::ExcessPrecision`] if `value` has non-zero digits
    /// beyond the second decimal place.
    pub fn try_new(value: Decimal) -> Result<Self, AmountError> {
        let normalized = value.normalize();
        if normalized.scale() > AMOUNT_SCALE {
            return Err(AmountError::ExcessPrecision(value));
        }
        Ok(Self::rescaled(normalized))
    }

    /// Projects an arbitrary decimal onto the cent grid.
    #[must_use]
    pub fn round(value: Decimal, rounding: Rounding) -> Self {
        Self::rescaled(value.round_dp_with_strategy(AMOUNT_SCALE, rounding.strategy()))
    }

    /// Quantizes to two decimals, rounding half-up.
    #[must_use]
    pub fn quantize(value: Decimal) -> Self {
        Self::round(value, Rounding::HalfUp)
    }

    /// Creates an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, AMOUNT_SCALE))
    }

    /// Creates an amount from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self::rescaled(Decimal::from(units))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Returns the amount as a whole number of cents, if it fits in `i64`.
    #[must_use]
    pub fn cents(self) -> Option<i64> {
        self.0.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is an exact multiple of `step`.
    ///
    /// A zero step never divides anything.
    #[must_use]
    pub fn is_multiple_of(self, step: Decimal) -> bool {
        !step.is_zero() && (self.0 % step).is_zero()
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Multiplies by a whole count, e.g. `base × N`.
    #[must_use]
    pub fn times(self, count: usize) -> Self {
        Self(self.0 * Decimal::from(count))
    }

    /// Multiplies by an arbitrary factor at full precision, without rounding.
    #[must_use]
    pub fn scaled(self, factor: Decimal) -> Decimal {
        self.0 * factor
    }

    /// The fraction `self / whole` at full precision, or `None` if `whole` is zero.
    #[must_use]
    pub fn ratio_of(self, whole: Self) -> Option<Decimal> {
        self.0.checked_div(whole.0)
    }

    fn rescaled(mut value: Decimal) -> Self {
        value.rescale(AMOUNT_SCALE);
        Self(value)
    }
}

impl Default for MonetaryAmount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for MonetaryAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<MonetaryAmount> for Decimal {
    fn from(amount: MonetaryAmount) -> Self {
        amount.0
    }
}

impl FromStr for MonetaryAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| AmountError::Parse(e.to_string()))?;
        Self::try_new(value)
    }
}

impl std::fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl Add for MonetaryAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for MonetaryAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for MonetaryAmount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for MonetaryAmount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for MonetaryAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MonetaryAmount> for MonetaryAmount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
