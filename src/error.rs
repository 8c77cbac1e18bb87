//! Error type shared by pricing, allocation and the call book.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{OrderId, Price, Quantity, Side};

/// Result alias used throughout the crate.
pub type AuctionResult<T> = Result<T, AuctionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// An order failed validation (negative price, non-positive quantity).
    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: OrderId, reason: String },

    /// A bare (price, quantity) pair failed the same checks as an order.
    #[error("invalid {side:?} quote: price {price}, quantity {quantity}")]
    InvalidQuote {
        side: Side,
        price: Price,
        quantity: Quantity,
    },

    /// Partial fill ran out of orders before reaching its cap.
    #[error("insufficient volume: cap {cap} exceeds available {available}")]
    InsufficientVolume { cap: Quantity, available: Quantity },

    #[error("tick size must be positive, got {0}")]
    InvalidTickSize(Decimal),

    /// The residual tie-break grid spans more prices than allowed.
    #[error("residual grid of {points} prices exceeds limit {limit}")]
    GridTooLarge { points: u64, limit: u64 },

    /// A sum, midpoint or tick step left the range of `Decimal`.
    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    /// A value does not fit the 10^8 fixed-point receipt encoding.
    #[error("{0} does not fit fixed-point encoding")]
    FixedPointOverflow(Decimal),

    #[error("order id {0} already in book")]
    DuplicateOrderId(OrderId),

    #[error("order id {0} not in book")]
    UnknownOrder(OrderId),

    /// The collection window has closed; the book no longer accepts changes.
    #[error("call book is closed")]
    BookClosed,
}
