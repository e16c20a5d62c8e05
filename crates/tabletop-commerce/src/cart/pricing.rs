//! Cart pricing calculations.

use crate::ids::GameId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Subtotal at list prices.
    pub subtotal: Money,
    /// Amount taken off by running sales.
    pub savings: Money,
    /// What the customer pays.
    pub grand_total: Money,
    /// Sum of quantities.
    pub item_count: i64,
    /// Per-line pricing breakdown.
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    /// Check if any sale prices applied.
    pub fn has_savings(&self) -> bool {
        self.savings.is_positive()
    }

    /// Get savings as a percentage of the subtotal.
    pub fn savings_percentage(&self) -> f64 {
        if self.subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.savings.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }
}

/// Pricing breakdown for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    pub game_id: GameId,
    pub name: String,
    /// Price charged per unit.
    pub unit_price: Money,
    pub quantity: i64,
    /// List price * quantity.
    pub subtotal: Money,
    /// Sale discount on this line.
    pub savings: Money,
    /// Unit price * quantity.
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_savings_percentage() {
        let pricing = CartPricing {
            subtotal: Money::new(10000, Currency::CZK),
            savings: Money::new(1000, Currency::CZK),
            grand_total: Money::new(9000, Currency::CZK),
            item_count: 1,
            line_items: vec![],
        };

        assert!(pricing.has_savings());
        assert!((pricing.savings_percentage() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_pricing_has_no_savings() {
        let pricing = CartPricing {
            subtotal: Money::zero(Currency::CZK),
            savings: Money::zero(Currency::CZK),
            grand_total: Money::zero(Currency::CZK),
            item_count: 0,
            line_items: vec![],
        };
        assert!(!pricing.has_savings());
        assert_eq!(pricing.savings_percentage(), 0.0);
    }
}
