//! # Cart Pricing
//!
//! Turns an ordered list of cart lines into the four totals shown at
//! checkout and recorded on the order.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Pricing Calculation                           │
//! │                                                                         │
//! │  lines ──► items_price    = Σ (price × quantity)                        │
//! │                 │                                                       │
//! │                 ├──► shipping_price = 0      if items_price > 100.00    │
//! │                 │                     10.00  otherwise                  │
//! │                 │                                                       │
//! │                 └──► discount_price = 10% of items_price (half up)      │
//! │                                                                         │
//! │  total_price = items_price + shipping_price - discount_price            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every amount is already whole cents, so each one is "rounded to two
//! decimals" on its own before the total is formed, which is exactly what
//! the backend records.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::CartItem;

/// Shipping is free strictly above this subtotal (100.00).
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(10_000);

/// Flat shipping fee at or below the threshold (10.00).
pub const SHIPPING_FEE: Money = Money::from_cents(1_000);

/// Discount in basis points (10%).
pub const DISCOUNT_BPS: u32 = 1_000;

/// The four totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartPricing {
    pub items_price: Money,
    pub shipping_price: Money,
    pub discount_price: Money,
    pub total_price: Money,
}

impl CartPricing {
    /// Computes the totals for `items`.
    ///
    /// Pure: safe to call on every render. An empty cart yields all zeros
    /// (no shipping is charged on nothing).
    pub fn calculate(items: &[CartItem]) -> Self {
        if items.is_empty() {
            return CartPricing::default();
        }

        let items_price: Money = items.iter().map(CartItem::line_total).sum();
        Self::from_items_price(items_price)
    }

    /// Derives shipping, discount and total from a subtotal.
    pub fn from_items_price(items_price: Money) -> Self {
        let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
            Money::zero()
        } else {
            SHIPPING_FEE
        };
        let discount_price = items_price.percentage(DISCOUNT_BPS);

        CartPricing {
            items_price,
            shipping_price,
            discount_price,
            total_price: items_price + shipping_price - discount_price,
        }
    }

    /// Total number of units across all lines.
    pub fn item_count(items: &[CartItem]) -> u32 {
        items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(price_cents: i64, quantity: u32) -> CartItem {
        CartItem::new("p", "Product", Money::from_cents(price_cents), quantity, 999)
    }

    #[test]
    fn test_free_shipping_example() {
        let pricing = CartPricing::calculate(&[line(5000, 2), line(3000, 1)]);

        assert_eq!(pricing.items_price.cents(), 13_000);
        assert_eq!(pricing.shipping_price.cents(), 0);
        assert_eq!(pricing.discount_price.cents(), 1_300);
        assert_eq!(pricing.total_price.cents(), 11_700);
    }

    #[test]
    fn test_paid_shipping_example() {
        let pricing = CartPricing::calculate(&[line(2000, 2)]);

        assert_eq!(pricing.items_price.cents(), 4_000);
        assert_eq!(pricing.shipping_price.cents(), 1_000);
        assert_eq!(pricing.discount_price.cents(), 400);
        assert_eq!(pricing.total_price.cents(), 4_600);
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        assert_eq!(CartPricing::calculate(&[]), CartPricing::default());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // exactly 100.00 still pays shipping
        let at = CartPricing::calculate(&[line(10_000, 1)]);
        assert_eq!(at.shipping_price, SHIPPING_FEE);

        let above = CartPricing::calculate(&[line(10_001, 1)]);
        assert!(above.shipping_price.is_zero());
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 10% of 12.35 is 1.235
        let pricing = CartPricing::calculate(&[line(1_235, 1)]);
        assert_eq!(pricing.discount_price.cents(), 124);
        assert_eq!(pricing.total_price.cents(), 1_235 + 1_000 - 124);
    }

    #[test]
    fn test_item_count() {
        assert_eq!(CartPricing::item_count(&[line(1, 2), line(1, 3)]), 5);
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_parts(
            lines in prop::collection::vec((0i64..1_000_000, 1u32..50), 0..20)
        ) {
            let items: Vec<CartItem> = lines.iter().map(|&(p, q)| line(p, q)).collect();
            let pricing = CartPricing::calculate(&items);

            prop_assert_eq!(
                pricing.total_price,
                pricing.items_price + pricing.shipping_price - pricing.discount_price
            );
        }

        #[test]
        fn prop_shipping_follows_threshold(cents in 1i64..100_000_000) {
            let pricing = CartPricing::from_items_price(Money::from_cents(cents));

            if cents > 10_000 {
                prop_assert!(pricing.shipping_price.is_zero());
            } else {
                prop_assert_eq!(pricing.shipping_price.cents(), 1_000);
            }
        }

        #[test]
        fn prop_discount_is_rounded_tenth(cents in 0i64..100_000_000) {
            let pricing = CartPricing::from_items_price(Money::from_cents(cents));
            // round2(0.10 × x) in cents, half up
            let expected = (cents * 10 + 50) / 100;
            prop_assert_eq!(pricing.discount_price.cents(), expected);
        }

        #[test]
        fn prop_calculate_is_idempotent(
            lines in prop::collection::vec((0i64..100_000, 1u32..20), 0..10)
        ) {
            let items: Vec<CartItem> = lines.iter().map(|&(p, q)| line(p, q)).collect();
            prop_assert_eq!(CartPricing::calculate(&items), CartPricing::calculate(&items));
        }
    }
}
