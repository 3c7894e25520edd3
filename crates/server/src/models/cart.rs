//! The session-owned shopping cart.
//!
//! A cart lives only inside one session and has no identity outside it.
//! Prices and names are snapshotted onto lines when they are added; later
//! catalog edits do not reach back into an open cart.

use serde::{Deserialize, Serialize};

use apotheca_core::{Money, ProductId};

/// One product-quantity selection pending checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Product name snapshot from add time.
    pub name: String,
    /// Unit price snapshot from add time.
    pub unit_price: Money,
    /// Units selected; always positive.
    pub quantity: u32,
}

impl CartLine {
    /// The line total: unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// An ordered collection of cart lines.
///
/// Insertion order is display and checkout order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Append a line at the end.
    pub fn push_line(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Remove every line with the given product name.
    ///
    /// Returns the number of lines removed; removing an absent name is a
    /// no-op, not an error.
    pub fn remove(&mut self, product_name: &str) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.name != product_name);
        before - self.lines.len()
    }

    /// Sum of line totals; zero for the empty cart.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn money(s: &str) -> Money {
        Money::cedis(s.parse::<Decimal>().unwrap())
    }

    fn line(name: &str, price: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            name: name.to_owned(),
            unit_price: money(price),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::default().total(), Money::zero());
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let mut cart = Cart::default();
        cart.push_line(line("Paracetamol", "5.00", 2));
        cart.push_line(line("Gauze", "1.25", 4));
        assert_eq!(cart.total(), money("15.00"));
    }

    #[test]
    fn test_remove_drops_all_matching_lines() {
        let mut cart = Cart::default();
        cart.push_line(line("Paracetamol", "5.00", 1));
        cart.push_line(line("Gauze", "1.25", 1));
        cart.push_line(line("Paracetamol", "5.00", 3));

        assert_eq!(cart.remove("Paracetamol"), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), money("1.25"));

        // Absent name is a no-op.
        assert_eq!(cart.remove("Paracetamol"), 0);
    }

    #[test]
    fn test_line_price_is_a_snapshot() {
        let mut cart = Cart::default();
        cart.push_line(line("Paracetamol", "5.00", 2));

        // A later catalog price change has no handle on the line.
        let stored = &cart.lines()[0];
        assert_eq!(stored.unit_price, money("5.00"));
        assert_eq!(stored.line_total(), money("10.00"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::default();
        cart.push_line(line("Paracetamol", "5.00", 2));

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
