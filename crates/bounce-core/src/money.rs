//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In a float-based checkout:                                             │
//! │    199.95 × 0.0825 = 16.495874999999998  → rounds to 16.50 or 16.49?   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + explicit half-up rounding                │
//! │    19995 cents × 825 bps = 16_495_875 / 10_000 = 1649.5875 → 1650      │
//! │    Every rounding point is a named method call, never an accident.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bounce_core::money::Money;
//! use bounce_core::types::Rate;
//!
//! let subtotal = Money::from_cents(19995);           // $199.95
//! let tax = subtotal.apply_rate(Rate::from_bps(825)); // 8.25%
//! assert_eq!(tax.cents(), 1650);                     // $16.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::Rate;

/// Basis points in 100%.
pub const BPS_SCALE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts can push a total below zero and that has to
///   stay observable rather than saturate
/// - **Serialized as an integer number of cents**
///
/// ## Where Money Flows
/// ```text
/// RentalItem.price ──► discounted_price ──► × day multiplier ──┐
/// ExtraItem.price × quantity ──────────────► × day multiplier ──┤
/// MixerSelection.price ────────────────────► × day multiplier ──┤
/// delivery / specific-time / overnight fees (never multiplied) ─┤
///                                                               ▼
///                                 subtotal ──► tax ──► processing ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use bounce_core::money::Money;
    ///
    /// let price = Money::from_cents(4995); // $49.95
    /// assert_eq!(price.cents(), 4995);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage rate and rounds half-up to the cent.
    ///
    /// This is the `round2(amount × rate)` step used for tax and the
    /// processing fee. Ties round away from zero, so `$0.825` becomes
    /// `$0.83` and `-$0.825` becomes `-$0.83`.
    ///
    /// ## Example
    /// ```rust
    /// use bounce_core::money::Money;
    /// use bounce_core::types::Rate;
    ///
    /// let base = Money::from_cents(21645);              // $216.45
    /// let fee = base.apply_rate(Rate::from_bps(300));   // 3%
    /// assert_eq!(fee.cents(), 649);                     // $6.49
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        self.scale_bps(rate.bps())
    }

    /// Multiplies by `bps / 10000` with half-up rounding to the cent.
    ///
    /// Used by the discount allocator: 10000 bps keeps the full price,
    /// 5000 bps halves it.
    pub fn scale_bps(&self, bps: u32) -> Money {
        // i128 so large carts can't overflow the intermediate product
        let scaled = round_half_up(self.0 as i128 * bps as i128, BPS_SCALE as i128);
        Money::from_cents(scaled as i64)
    }

    /// Multiplies money by a quantity or day multiplier.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Integer division rounding half away from zero.
fn round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        -((-numerator + half) / denominator)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Parses `"$20"`, `"20.5"`, `"49.95"` or `"-5.00"`.
///
/// More than two decimal places is rejected rather than rounded.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidMoney {
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);

        let (whole, frac) = match rest.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (rest, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let dollars: i64 = whole.parse().map_err(|_| invalid())?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_dollars() {
        let money = Money::from_cents(4995);
        assert_eq!(money.cents(), 4995);
        assert_eq!(money.dollars(), 49);
        assert_eq!(money.cents_part(), 95);
        assert_eq!(Money::from_dollars(20).cents(), 2000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(22294).to_string(), "$222.94");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("$20".parse::<Money>().unwrap(), Money::from_dollars(20));
        assert_eq!("49.95".parse::<Money>().unwrap(), Money::from_cents(4995));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("-5.00".parse::<Money>().unwrap(), Money::from_cents(-500));
        assert_eq!(" 0 ".parse::<Money>().unwrap(), Money::zero());

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("$".parse::<Money>().is_err());
        assert!("1.2x".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);
        assert_eq!((a * 2_u32).cents(), 2000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // $199.95 at 8.25% = 16.495875 → $16.50
        let tax = Money::from_cents(19995).apply_rate(Rate::from_bps(825));
        assert_eq!(tax.cents(), 1650);

        // $10.00 at 8.25% = 0.825 → $0.83 (tie goes up)
        let tax = Money::from_cents(1000).apply_rate(Rate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // $216.45 at 3% = 6.4935 → $6.49
        let fee = Money::from_cents(21645).apply_rate(Rate::from_bps(300));
        assert_eq!(fee.cents(), 649);
    }

    #[test]
    fn test_apply_rate_negative_is_symmetric() {
        let tax = Money::from_cents(-1000).apply_rate(Rate::from_bps(825));
        assert_eq!(tax.cents(), -83);
    }

    #[test]
    fn test_scale_bps() {
        assert_eq!(Money::from_cents(10000).scale_bps(5000).cents(), 5000);
        assert_eq!(Money::from_cents(10000).scale_bps(10_000).cents(), 10000);
        // $49.95 / 2 = 24.975 → $24.98
        assert_eq!(Money::from_cents(4995).scale_bps(5000).cents(), 2498);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-550).abs().cents(), 550);
    }
}
