//! Time-boxed percentage discounts on single games.

use crate::error::CommerceError;
use crate::ids::{DiscountId, GameId};
use crate::money::Money;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest percentage a discount may take off.
pub const MAX_DISCOUNT_PERCENT: f64 = 90.0;

/// A percentage discount on one game, valid inside `[starts_at, ends_at]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceDiscount {
    pub id: DiscountId,
    pub game_id: GameId,
    /// Percentage off, 0 to 90.
    pub percent: f64,
    /// UTC start of the window.
    pub starts_at: NaiveDateTime,
    /// UTC end of the window, inclusive.
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
}

impl PriceDiscount {
    /// Check the percentage and window before the discount is stored.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if !(0.0..=MAX_DISCOUNT_PERCENT).contains(&self.percent) {
            return Err(CommerceError::validation(format!(
                "discount must be between 0 and {}%",
                MAX_DISCOUNT_PERCENT
            )));
        }
        if self.ends_at < self.starts_at {
            return Err(CommerceError::validation(
                "discount ends before it starts",
            ));
        }
        Ok(())
    }

    /// Whether the discount applies at `now`.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }

    /// Whether the discount applies right now.
    pub fn is_current_now(&self) -> bool {
        self.is_current(Utc::now().naive_utc())
    }
}

/// Apply the largest current discount to `price`.
///
/// Returns `None` when no discount is current, or the best one is 0%.
pub fn best_sale_price<'a>(
    price: Money,
    discounts: impl IntoIterator<Item = &'a PriceDiscount>,
    now: NaiveDateTime,
) -> Option<Money> {
    discounts
        .into_iter()
        .filter(|d| d.is_current(now))
        .map(|d| d.percent.clamp(0.0, MAX_DISCOUNT_PERCENT))
        .fold(None, |best: Option<f64>, p| Some(best.map_or(p, |b| b.max(p))))
        .filter(|p| *p > 0.0)
        .map(|p| price.discounted(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn discount(percent: f64, from: u32, to: u32) -> PriceDiscount {
        PriceDiscount {
            id: DiscountId::new(1),
            game_id: GameId::new(1),
            percent,
            starts_at: at(from),
            ends_at: at(to),
            is_active: true,
        }
    }

    #[test]
    fn test_is_current_window() {
        let d = discount(10.0, 5, 10);
        assert!(!d.is_current(at(4)));
        assert!(d.is_current(at(5)));
        assert!(d.is_current(at(10)));
        assert!(!d.is_current(at(11)));

        let inactive = PriceDiscount {
            is_active: false,
            ..d
        };
        assert!(!inactive.is_current(at(7)));
    }

    #[test]
    fn test_best_sale_price_picks_largest_current() {
        let price = Money::new(100000, Currency::CZK);
        let discounts = vec![
            discount(10.0, 1, 20),
            discount(25.0, 1, 20),
            discount(50.0, 21, 25),
        ];
        let sale = best_sale_price(price, &discounts, at(10)).unwrap();
        assert_eq!(sale.amount_cents, 75000);
    }

    #[test]
    fn test_best_sale_price_none() {
        let price = Money::new(100000, Currency::CZK);
        assert!(best_sale_price(price, &Vec::<PriceDiscount>::new(), at(10)).is_none());
        assert!(best_sale_price(price, &[discount(0.0, 1, 20)], at(10)).is_none());
        assert!(best_sale_price(price, &[discount(30.0, 1, 2)], at(10)).is_none());
    }

    #[test]
    fn test_validate() {
        assert!(discount(90.0, 1, 2).validate().is_ok());
        assert!(discount(91.0, 1, 2).validate().is_err());
        assert!(discount(-1.0, 1, 2).validate().is_err());
        assert!(discount(10.0, 5, 2).validate().is_err());
    }
}
