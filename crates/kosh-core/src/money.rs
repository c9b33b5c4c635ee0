//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Full-Precision Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE ROUND-THEN-SUM PROBLEM                                             │
//! │                                                                         │
//! │  Three lines, each 0.005 above a paisa boundary:                        │
//! │    round(0.005) + round(0.005) + round(0.005) = 0.03                    │
//! │    round(0.005 + 0.005 + 0.005)               = 0.02                    │
//! │                                                                         │
//! │  If the document rounds per line but the export sums raw values,       │
//! │  the two artifacts disagree by a paisa.                                 │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 decimals                                   │
//! │    Every figure is carried unrounded through summation and only        │
//! │    rounded (half-up) when it is formatted for display.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kosh_core::money::{CurrencyFormat, Money};
//! use rust_decimal::Decimal;
//!
//! let amount = Money::new(Decimal::new(531000, 2)); // 5310.00
//! assert_eq!(CurrencyFormat::rupee().format(amount), "₹5,310.00");
//! assert_eq!(amount.to_fixed(2), "5310.00");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::RUPEE_SYMBOL;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in rupees, carried at full precision.
///
/// ## Design Decisions
/// - **Decimal, not f64**: `0.1 + 0.2` must equal `0.3`
/// - **No implicit rounding**: arithmetic never rounds; only
///   [`Money::rounded`] and the formatters do
/// - **Signed**: credit notes and corrections may be negative
///
/// ## Where Money is Used
/// ```text
/// LineItem.quantity × LineItem.rate ──► LineFigures.amount ──┐
///                                       LineFigures.tax    ──┼──► InvoiceTotals
///                                       LineFigures.total  ──┘        │
///                                                                     ▼
///                                        document / export / QR payload (rounded)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount (unrounded).
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to `dp` decimal places, half-up (midpoint away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use kosh_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::new(Decimal::new(15, 3)); // 0.015
    /// assert_eq!(m.rounded(2).amount(), Decimal::new(2, 2)); // 0.02
    /// ```
    pub fn rounded(&self, dp: u32) -> Self {
        Money(round_half_up(self.0, dp))
    }

    /// Multiplies by a rate fraction without rounding.
    ///
    /// ## Example
    /// ```rust
    /// use kosh_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Money::new(Decimal::from(4500));
    /// let tax = amount.apply_rate(Decimal::new(18, 2)); // 18%
    /// assert_eq!(tax.amount(), Decimal::from(810));
    /// ```
    #[inline]
    pub fn apply_rate(&self, fraction: Decimal) -> Self {
        Money(self.0 * fraction)
    }

    /// Plain fixed-point text: rounded half-up, no symbol, no separators.
    ///
    /// This is the form used for tabular exports.
    pub fn to_fixed(&self, dp: u32) -> String {
        fixed(self.0, dp)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Digit grouping for the integer part of an amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// 1,234,567.89
    #[default]
    Western,
    /// 12,34,567.89 (lakh/crore)
    Indian,
}

/// How an amount is rendered for people.
///
/// One format value is shared by the document, the verification payload
/// and the on-screen summaries, so the same totals always print the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Prefix glyph, e.g. `₹`.
    pub symbol: String,
    /// Put a space between glyph and digits (`₹ 4,500.00`).
    pub spaced: bool,
    /// Decimal places after rounding.
    pub precision: u32,
    /// Thousands grouping style.
    pub grouping: Grouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::rupee()
    }
}

impl CurrencyFormat {
    /// `₹1,234.50` - rupee glyph, two decimals, western grouping.
    pub fn rupee() -> Self {
        CurrencyFormat {
            symbol: RUPEE_SYMBOL.to_string(),
            spaced: false,
            precision: 2,
            grouping: Grouping::Western,
        }
    }

    /// Returns a copy with another glyph.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Returns a copy with another precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Returns a copy with the glyph separated from the digits.
    pub fn spaced(mut self, spaced: bool) -> Self {
        self.spaced = spaced;
        self
    }

    /// Formats money with glyph, grouping and half-up rounding.
    ///
    /// ## Example
    /// ```rust
    /// use kosh_core::money::{CurrencyFormat, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let fmt = CurrencyFormat::rupee();
    /// assert_eq!(fmt.format(Money::new(Decimal::new(-125, 2))), "-₹1.25");
    /// ```
    pub fn format(&self, money: Money) -> String {
        self.format_decimal(money.amount())
    }

    /// Formats a bare decimal (e.g. a unit rate) the same way as money.
    pub fn format_decimal(&self, value: Decimal) -> String {
        let text = fixed(value, self.precision);
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(text.len() + self.symbol.len() + 6);
        if negative {
            out.push('-');
        }
        out.push_str(&self.symbol);
        if self.spaced && !self.symbol.is_empty() {
            out.push(' ');
        }
        out.push_str(&group_digits(int_part, self.grouping));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }
}

/// Rounds half-up and prints exactly `dp` decimals.
///
/// Negative zero after rounding prints without a sign.
///
/// ## Example
/// ```rust
/// use kosh_core::money::fixed;
/// use rust_decimal::Decimal;
///
/// assert_eq!(fixed(Decimal::new(1005, 3), 2), "1.01");
/// assert_eq!(fixed(Decimal::from(100), 1), "100.0");
/// ```
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(dp);
    rounded.to_string()
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn group_digits(int_part: &str, grouping: Grouping) -> String {
    let digits: Vec<char> = int_part.chars().collect();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);

    for (i, c) in digits.iter().enumerate() {
        let remaining = len - i;
        let boundary = match grouping {
            Grouping::Western => remaining % 3 == 0,
            // last group of three, then groups of two
            Grouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
        };
        if i > 0 && boundary {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows rupees with two decimals (`₹5,310.00`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CurrencyFormat::rupee().format(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

/// Multiplication by a decimal quantity.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Decimal) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
