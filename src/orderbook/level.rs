//! Aggregated quantity at a single price.
//!
//! ## Design
//!
//! A `PriceLevel` groups every collected order at one price. Price discovery
//! only needs the aggregate quantity per price, so the level keeps a running
//! total alongside the slab keys of its orders (in arrival order).

use crate::error::{AuctionError, AuctionResult};
use crate::types::{Price, Quantity};
use rust_decimal::Decimal;

/// Orders at a single price.
///
/// The order data lives in the book's slab; the level only holds keys.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level
    pub price: Price,

    /// Sum of the quantities of all orders at this level
    pub total_quantity: Quantity,

    /// Number of orders at this price level
    pub order_count: usize,

    /// Slab keys in arrival order
    keys: Vec<usize>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            total_quantity: Decimal::ZERO,
            order_count: 0,
            keys: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order's key. The level is unchanged if the total overflows.
    pub fn push_back(&mut self, key: usize, quantity: Quantity) -> AuctionResult<()> {
        self.total_quantity = self
            .total_quantity
            .checked_add(quantity)
            .ok_or(AuctionError::ArithmeticOverflow("price level quantity"))?;
        self.keys.push(key);
        self.order_count += 1;
        Ok(())
    }

    /// Remove an order's key. Returns false if the key is not at this level.
    pub fn remove(&mut self, key: usize, quantity: Quantity) -> bool {
        let Some(pos) = self.keys.iter().position(|&k| k == key) else {
            return false;
        };
        self.keys.remove(pos);
        self.order_count -= 1;
        self.total_quantity -= quantity;
        true
    }

    /// Slab keys in arrival order
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    /// `(price, total_quantity)` for price discovery
    #[inline]
    pub fn to_pair(&self) -> (Price, Quantity) {
        (self.price, self.total_quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
