//! Fill records produced by the allocator.
//!
//! A [`Fill`] is an immutable record of how much of one order transacted at
//! the clearing price. The caller's orders are never modified.

use crate::types::order::{Order, OrderId, Side, UserId};
use crate::types::price::{Price, Quantity};

/// The executed portion of one order.
///
/// Invariant: `0 <= quantity_final <= quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub side: Side,

    /// The order's limit price (not the clearing price)
    pub limit_price: Price,

    /// Quantity originally requested
    pub quantity: Quantity,

    /// Quantity that transacts at the clearing price
    pub quantity_final: Quantity,
}

impl Fill {
    /// Fill the whole order
    pub fn full(order: &Order) -> Self {
        Self::clipped(order, order.quantity)
    }

    /// Fill `quantity_final` of the order
    pub fn clipped(order: &Order, quantity_final: Quantity) -> Self {
        Self {
            order_id: order.id,
            user_id: order.user_id,
            side: order.side,
            limit_price: order.price,
            quantity: order.quantity,
            quantity_final,
        }
    }

    /// True for the marginal order whose fill was clipped
    #[inline]
    pub fn is_partial(&self) -> bool {
        self.quantity_final < self.quantity
    }

    /// Quantity left unexecuted
    #[inline]
    pub fn remaining(&self) -> Quantity {
        self.quantity - self.quantity_final
    }

    /// Canonical byte encoding used for fill roots.
    ///
    /// Layout: order_id (8, LE) | user_id (8, LE) | side (1) |
    /// limit_price, quantity, quantity_final (16 each, `Decimal::serialize`).
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + 8 + 1 + 16 * 3);
        bytes.extend_from_slice(&self.order_id.to_le_bytes());
        bytes.extend_from_slice(&self.user_id.to_le_bytes());
        bytes.push(self.side.to_u8());
        bytes.extend_from_slice(&self.limit_price.normalize().serialize());
        bytes.extend_from_slice(&self.quantity.normalize().serialize());
        bytes.extend_from_slice(&self.quantity_final.normalize().serialize());
        bytes
    }
}
