//! # Money Module
//!
//! Provides the `Money` and `Price` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing thousands of sale totals as f64 drifts away from the          │
//! │  cent-exact sum of the line items.                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents for totals                                 │
//! │    Every line total, sale total and revenue is an i64 number of cents. │
//! │    Sums are exact and checked for overflow.                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Prices vs. Totals
//! ```text
//! Price (exact decimal)          Money (cents)
//! ─────────────────────          ─────────────
//! Product.price                  SaleItem.total_price = round(unit_price × qty, 2)
//! SaleItem.unit_price            Sale.total_amount    = Σ total_price
//!                                revenue, average order value
//! ```
//! A price keeps whatever precision it was given (`8.333` stays `8.333`).
//! Only a line total is rounded to cents, so a sale total is the exact sum
//! of already-rounded lines.
//!
//! ## Rounding
//! Every rounding is half away from zero: [`Money::from_decimal`] for line
//! totals and [`Money::divide_rounded`] for the average order value.
//!
//! ## Usage
//! ```rust
//! use backoffice_core::money::{Money, Price};
//! use rust_decimal_macros::dec;
//!
//! let unit_price = Price::new(dec!(8.333));
//! let line_total = unit_price.line_total(3).unwrap(); // 24.999 → 25.00
//! assert_eq!(line_total.cents(), 2500);
//!
//! let total = line_total.checked_add(Money::from_cents(500)).unwrap();
//! assert_eq!(total.to_string(), "30.00");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

fn overflow(field: &str) -> CoreError {
    CoreError::AmountOverflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  SaleItem.total_price ──► Sale.total_amount                             │
/// │                                 │                                       │
/// │        ┌────────────────────────┼──────────────┐                        │
/// │        ▼                        ▼              ▼                        │
/// │  summary.total_revenue   revenue buckets   average order value          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a decimal amount to cents, half away from zero.
    ///
    /// ## Errors
    /// [`CoreError::AmountOverflow`] when the result does not fit an i64
    /// number of cents.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_decimal(dec!(19.99), "price").unwrap().cents(), 1999);
    /// assert_eq!(Money::from_decimal(dec!(24.999), "total_price").unwrap().cents(), 2500);
    /// assert_eq!(Money::from_decimal(dec!(0.125), "total_price").unwrap().cents(), 13);
    /// ```
    pub fn from_decimal(amount: Decimal, field: &str) -> CoreResult<Self> {
        amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or_else(|| overflow(field))
    }

    /// Returns the amount as a two-decimal `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1500).to_decimal().to_string(), "15.00");
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let parts = [Money::from_cents(101), Money::from_cents(202)];
    /// assert_eq!(Money::checked_sum(parts).unwrap().cents(), 303);
    /// assert!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]).is_none());
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Divides by a count and rounds to the nearest cent, half away from zero.
    ///
    /// A zero divisor yields zero rather than a division fault; this is what
    /// the average order value of an empty corpus is defined as.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// // 10.00 / 3 = 3.333... → 3.33
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// // 0.05 / 2 = 0.025 → 0.03
    /// assert_eq!(Money::from_cents(5).divide_rounded(2).cents(), 3);
    /// assert_eq!(Money::from_cents(1000).divide_rounded(0).cents(), 0);
    /// ```
    pub fn divide_rounded(&self, divisor: i64) -> Money {
        if divisor == 0 {
            return Money::zero();
        }

        let numerator = self.0 as i128;
        let divisor = divisor as i128;
        let quotient = numerator / divisor;
        let remainder = numerator % divisor;

        let rounded = if remainder.abs() * 2 >= divisor.abs() {
            quotient + numerator.signum() * divisor.signum()
        } else {
            quotient
        };

        Money(rounded as i64)
    }
}

/// Two fractional digits, no currency symbol (single-currency system).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Price Type
// =============================================================================

/// An exact decimal price: a product's list price or a sale line's unit price.
///
/// Stored as decimal text so no precision is lost between write and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Wraps a decimal amount (trailing zeros are dropped).
    #[inline]
    pub fn new(amount: Decimal) -> Self {
        Price(amount.normalize())
    }

    /// Creates a price from cents.
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Price::new(Decimal::new(cents, 2))
    }

    /// Returns the exact amount.
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the price is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Line total `round(price × quantity, 2)`.
    ///
    /// The product is exact; the single rounding step is half away from zero.
    ///
    /// ## Errors
    /// [`CoreError::AmountOverflow`] when the total leaves the representable
    /// range.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Price;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Price::new(dec!(2.99)).line_total(3).unwrap().cents(), 897);
    /// assert_eq!(Price::new(dec!(0.125)).line_total(1).unwrap().cents(), 13);
    /// assert!(Price::new(dec!(7922816251426433759354395033)).line_total(10).is_err());
    /// ```
    pub fn line_total(&self, quantity: i64) -> CoreResult<Money> {
        let exact = self
            .0
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| overflow("total_price"))?;
        Money::from_decimal(exact, "total_price")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Price::new)
    }
}

/// Decoding from the stored decimal text.
impl TryFrom<String> for Price {
    type Error = rust_decimal::Error;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
