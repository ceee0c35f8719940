//! Shopping cart arithmetic.
//!
//! A [`Cart`] holds one line per product. Adding a product that is already in
//! the cart bumps its quantity instead of creating a second line. Totals use
//! the discounted unit price of each line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{clamp_discount, discounted_price};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// List price before discount.
    pub list_price: Decimal,
    /// Discount percentage, clamped on insertion.
    pub discount_percent: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price after discount.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        discounted_price(self.list_price, self.discount_percent)
    }

    /// Unit price times quantity, or `None` if it overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price().checked_mul(Decimal::from(self.quantity))
    }
}

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product.
    ///
    /// A zero quantity is ignored. When the product is already present its
    /// quantity is increased and the existing name and price are kept.
    pub fn add(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        list_price: Decimal,
        discount_percent: Decimal,
        quantity: u32,
    ) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.lines.push(CartLine {
            product_id,
            name: name.into(),
            list_price,
            discount_percent: clamp_discount(discount_percent),
            quantity,
        });
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of discounted line subtotals, or `None` if it overflows.
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reef() -> ProductId {
        ProductId::new("reef-33")
    }

    fn officer() -> ProductId {
        ProductId::new("officer-1")
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(reef(), "REEF 33", Decimal::from(3500), Decimal::ZERO, 1);
        cart.add(reef(), "REEF 33", Decimal::from(3500), Decimal::ZERO, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Some(Decimal::from(10_500)));
    }

    #[test]
    fn test_zero_quantity_add_is_ignored() {
        let mut cart = Cart::new();
        cart.add(reef(), "REEF 33", Decimal::from(3500), Decimal::ZERO, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_uses_discounted_price() {
        let mut cart = Cart::new();
        cart.add(reef(), "REEF 33", Decimal::from(3500), Decimal::from(10), 2);
        cart.add(officer(), "OFFICER", Decimal::from(1500), Decimal::from(200), 1);

        // 3150 * 2 + 150 (discount clamped to 90%)
        assert_eq!(cart.total_price(), Some(Decimal::from(6450)));
        assert_eq!(cart.lines()[1].discount_percent, Decimal::from(90));
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        assert_eq!(Cart::new().total_price(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_overflow_is_none() {
        let mut cart = Cart::new();
        cart.add(reef(), "REEF 33", Decimal::MAX, Decimal::from(10), 2);
        assert_eq!(cart.lines()[0].subtotal(), None);
        assert_eq!(cart.total_price(), None);

        let mut cart = Cart::new();
        cart.add(reef(), "REEF 33", Decimal::MAX, Decimal::ZERO, 1);
        cart.add(officer(), "OFFICER", Decimal::MAX, Decimal::ZERO, 1);
        assert!(cart.lines()[0].subtotal().is_some());
        assert_eq!(cart.total_price(), None);
    }
}
