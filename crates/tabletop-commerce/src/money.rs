//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Czech koruna.
    #[default]
    CZK,
    EUR,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "CZK").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CZK => "CZK",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "Kč").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CZK => "K\u{010d}",
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
        }
    }

    /// Whether the symbol is written after the amount.
    pub fn symbol_after(&self) -> bool {
        matches!(self, Currency::CZK)
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Minor units per major unit (100 for all supported currencies).
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "CZK" => Some(Currency::CZK),
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., haléře for CZK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from whole major units.
    ///
    /// Saturates instead of overflowing.
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(units.saturating_mul(currency.minor_per_major()), currency)
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use tabletop_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(499.90, Currency::CZK);
    /// assert_eq!(price.amount_cents, 49990);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Parse a decimal amount typed by a person.
    ///
    /// Accepts `.` or `,` as the decimal separator and ignores spaces.
    /// Returns `None` for anything that is not a finite number or does not
    /// fit in minor units.
    pub fn parse(input: &str, currency: Currency) -> Option<Self> {
        let cleaned: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        let amount: f64 = cleaned.parse().ok()?;
        let minor = (amount * currency.minor_per_major() as f64).round();
        if !minor.is_finite() || minor < i64::MIN as f64 || minor >= i64::MAX as f64 {
            return None;
        }
        Some(Self::new(minor as i64, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "499.90 Kč" or "$49.99").
    pub fn display(&self) -> String {
        let amount = self.display_amount();
        if self.currency.symbol_after() {
            format!("{} {}", amount, self.currency.symbol())
        } else {
            format!("{}{}", self.currency.symbol(), amount)
        }
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let per = self.currency.minor_per_major();
        let places = self.currency.decimal_places() as usize;
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!(
            "{}{}.{:0places$}",
            sign,
            abs / per as u64,
            abs % per as u64,
            places = places
        )
    }

    /// Try to add another Money value, returning None if currencies don't match
    /// or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Price after taking `percent` off, rounded to the nearest minor unit.
    pub fn discounted(&self, percent: f64) -> Money {
        let factor = 1.0 - percent / 100.0;
        Money::new(
            (self.amount_cents as f64 * factor).round() as i64,
            self.currency,
        )
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major() {
        let m = Money::from_major(499, Currency::CZK);
        assert_eq!(m.amount_cents, 49900);
    }

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_cents, 4999);
    }

    #[test]
    fn test_money_parse() {
        assert_eq!(
            Money::parse("1 299,50", Currency::CZK),
            Some(Money::new(129950, Currency::CZK))
        );
        assert_eq!(
            Money::parse("12.5", Currency::EUR),
            Some(Money::new(1250, Currency::EUR))
        );
        assert_eq!(Money::parse("abc", Currency::CZK), None);
        assert_eq!(Money::parse("NaN", Currency::CZK), None);
        assert_eq!(Money::parse("inf", Currency::CZK), None);
    }

    #[test]
    fn test_money_parse_out_of_range() {
        assert_eq!(Money::parse("1e300", Currency::CZK), None);
        assert_eq!(Money::parse("-1e300", Currency::CZK), None);
        assert_eq!(Money::parse("92233720368547758.08", Currency::CZK), None);
        assert_eq!(
            Money::parse("1000000", Currency::CZK),
            Some(Money::new(100_000_000, Currency::CZK))
        );
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(49990, Currency::CZK).display(), "499.90 K\u{010d}");
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(-5, Currency::EUR).display(), "\u{20ac}-0.05");
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let a = Money::new(1000, Currency::CZK);
        let b = Money::new(300, Currency::CZK);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_cents, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::CZK).try_multiply(2).is_none());
    }

    #[test]
    fn test_money_currency_mismatch() {
        let czk = Money::new(1000, Currency::CZK);
        let eur = Money::new(1000, Currency::EUR);
        assert!(czk.try_add(&eur).is_none());
    }

    #[test]
    fn test_money_discounted() {
        let m = Money::new(99900, Currency::CZK);
        assert_eq!(m.discounted(10.0).amount_cents, 89910);
        assert_eq!(m.discounted(0.0), m);
        // 333.33 * 0.85 = 283.3305 -> 283.33
        assert_eq!(Money::new(33333, Currency::CZK).discounted(15.0).amount_cents, 28333);
    }

    #[test]
    fn test_money_try_sum() {
        let items = [Money::new(100, Currency::CZK), Money::new(250, Currency::CZK)];
        let total = Money::try_sum(items.iter(), Currency::CZK).unwrap();
        assert_eq!(total.amount_cents, 350);

        let overflow = [Money::new(i64::MAX, Currency::CZK), Money::new(1, Currency::CZK)];
        assert!(Money::try_sum(overflow.iter(), Currency::CZK).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("czk"), Some(Currency::CZK));
        assert_eq!(Currency::from_code("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
