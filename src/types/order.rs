//! Order types for the call auction.
//!
//! Orders are collected during the auction window and consumed (never
//! mutated) by price discovery and fill allocation.

use rust_decimal::Decimal;

use crate::error::{AuctionError, AuctionResult};
use crate::types::price::{Price, Quantity};

/// Unique order identifier
pub type OrderId = u64;

/// Participant/account identifier
pub type UserId = u64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid (buy) or Offer (sell)
///
/// Represented as u8 for hashing and receipts:
/// - Bid = 0
/// - Offer = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Side {
    /// Buy order - willing to pay up to its price
    #[default]
    Bid,
    /// Sell order - willing to sell at its price or higher
    Offer,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Offer => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Offer),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Offer,
            Side::Offer => Side::Bid,
        }
    }

    /// Whether an order on this side at `limit` participates at `market_price`.
    ///
    /// Bids cross at or below their limit, offers at or above theirs.
    #[inline]
    pub fn crosses(self, limit: Price, market_price: Price) -> bool {
        match self {
            Side::Bid => limit >= market_price,
            Side::Offer => limit <= market_price,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order submitted to the call auction.
///
/// ## Example
///
/// ```
/// use call_auction::types::{Order, Side};
/// use rust_decimal::Decimal;
///
/// let order = Order::bid(1, Decimal::from(55), Decimal::from(4));
/// assert_eq!(order.side, Side::Bid);
/// assert!(order.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    /// Unique order identifier (0 = assign on entry into a call book)
    pub id: OrderId,

    /// User/account identifier
    pub user_id: UserId,

    pub side: Side,

    /// Limit price
    pub price: Price,

    /// Requested quantity, must be positive
    pub quantity: Quantity,

    /// Submission time in milliseconds
    pub timestamp: u64,
}

impl Order {
    /// Create a new limit order
    pub fn new(
        id: OrderId,
        user_id: UserId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            user_id,
            side,
            price,
            quantity,
            timestamp,
        }
    }

    /// Shorthand for a bid with no user or timestamp
    pub fn bid(id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self::new(id, 0, Side::Bid, price, quantity, 0)
    }

    /// Shorthand for an offer with no user or timestamp
    pub fn offer(id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self::new(id, 0, Side::Offer, price, quantity, 0)
    }

    /// Reject negative prices and non-positive quantities.
    ///
    /// Negative quantities would break the monotonicity of the cumulative
    /// supply and demand curves.
    pub fn validate(&self) -> AuctionResult<()> {
        if self.price < Decimal::ZERO {
            return Err(AuctionError::InvalidOrder {
                order_id: self.id,
                reason: format!("negative price {}", self.price),
            });
        }
        if self.quantity <= Decimal::ZERO {
            return Err(AuctionError::InvalidOrder {
                order_id: self.id,
                reason: format!("quantity must be positive, got {}", self.quantity),
            });
        }
        Ok(())
    }

    /// Whether this order participates at `market_price`
    #[inline]
    pub fn crosses(&self, market_price: Price) -> bool {
        self.side.crosses(self.price, market_price)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_conversion() {
        assert_eq!(Side::Bid.to_u8(), 0);
        assert_eq!(Side::Offer.to_u8(), 1);
        assert_eq!(Side::from_u8(0), Some(Side::Bid));
        assert_eq!(Side::from_u8(1), Some(Side::Offer));
        assert_eq!(Side::from_u8(2), None);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Offer);
        assert_eq!(Side::Offer.opposite(), Side::Bid);
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(1, 100, Side::Offer, dec!(50.25), dec!(10), 1703577600000);

        assert_eq!(order.id, 1);
        assert_eq!(order.user_id, 100);
        assert_eq!(order.side, Side::Offer);
        assert_eq!(order.price, dec!(50.25));
        assert_eq!(order.quantity, dec!(10));
        assert_eq!(order.timestamp, 1703577600000);
    }

    #[test]
    fn test_order_crosses() {
        let bid = Order::bid(1, dec!(55), dec!(4));
        assert!(bid.crosses(dec!(52)));
        assert!(bid.crosses(dec!(55)));
        assert!(!bid.crosses(dec!(55.5)));

        let offer = Order::offer(2, dec!(50), dec!(10));
        assert!(offer.crosses(dec!(52)));
        assert!(offer.crosses(dec!(50)));
        assert!(!offer.crosses(dec!(49.99)));
    }

    #[test]
    fn test_validate_rejects_bad_orders() {
        assert!(Order::bid(1, dec!(0), dec!(1)).validate().is_ok());

        let err = Order::bid(2, dec!(-1), dec!(1)).validate().unwrap_err();
        assert!(matches!(err, AuctionError::InvalidOrder { order_id: 2, .. }));

        let err = Order::offer(3, dec!(10), dec!(0)).validate().unwrap_err();
        assert!(matches!(err, AuctionError::InvalidOrder { order_id: 3, .. }));

        let err = Order::offer(4, dec!(10), dec!(-5)).validate().unwrap_err();
        assert!(matches!(err, AuctionError::InvalidOrder { order_id: 4, .. }));
    }
}
