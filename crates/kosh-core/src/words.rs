//! # Amount in Words
//!
//! Phrases a rupee amount the way it is printed on Indian tax invoices.
//!
//! ## Indian Numbering
//! ```text
//!   1,23,45,678.50
//!   │ │  │  │   └── 50 paise
//!   │ │  │  └────── 678      → Six Hundred And Seventy-Eight
//!   │ │  └───────── 45       → Forty-Five Thousand
//!   │ └──────────── 23       → Twenty-Three Lakh
//!   └────────────── 1        → One Crore
//! ```
//!
//! The document layout only depends on the [`AmountPhraser`] trait, so
//! another locale can be plugged in without touching the engine.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::money::Money;

/// Turns an amount into a canonical phrase.
pub trait AmountPhraser: Send + Sync {
    fn phrase(&self, amount: Money) -> String;
}

/// English words with lakh/crore grouping: `"Five Thousand Three Hundred
/// And Ten Rupees Only"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndianEnglish;

impl AmountPhraser for IndianEnglish {
    fn phrase(&self, amount: Money) -> String {
        let rounded = amount.rounded(2).amount();
        let abs = rounded.abs();
        let rupees = abs.trunc();
        let paise = ((abs - rupees) * Decimal::ONE_HUNDRED).trunc();

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push_str("Minus ");
        }
        out.push_str(&number_words(rupees.to_u128().unwrap_or_default()));
        out.push_str(" Rupees");

        let paise = paise.to_u128().unwrap_or_default();
        if paise > 0 {
            out.push_str(" and ");
            out.push_str(&number_words(paise));
            out.push_str(" Paise");
        }
        out.push_str(" Only");
        out
    }
}

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

/// Title-cased words for a whole number using Indian grouping.
pub fn number_words(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let crores = n / CRORE;
    let mut rest = n % CRORE;

    if crores > 0 {
        // beyond 99 crore the count itself is phrased recursively
        parts.push(format!("{} Crore", number_words(crores)));
    }
    for (unit, name) in [(LAKH, "Lakh"), (THOUSAND, "Thousand")] {
        let count = rest / unit;
        rest %= unit;
        if count > 0 {
            parts.push(format!("{} {}", below_hundred(count), name));
        }
    }
    let hundreds = rest / 100;
    rest %= 100;
    if hundreds > 0 {
        parts.push(format!("{} Hundred", below_hundred(hundreds)));
    }
    if rest > 0 {
        if parts.is_empty() {
            parts.push(below_hundred(rest));
        } else {
            parts.push(format!("And {}", below_hundred(rest)));
        }
    }
    parts.join(" ")
}

fn below_hundred(n: u128) -> String {
    debug_assert!(n < 100);
    let n = n as usize;
    match n {
        0..=19 => ONES[n].to_string(),
        _ if n % 10 == 0 => TENS[n / 10].to_string(),
        _ => format!("{}-{}", TENS[n / 10], ONES[n % 10]),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
