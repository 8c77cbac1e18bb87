//! # Call Auction
//!
//! Batch ("call") auction clearing: a single uniform price and the maximum
//! tradable volume for a set of bids and offers, then a deterministic
//! allocation of which orders transact and for how much.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Fill, ClearingReceipt)
//! - **OrderBook**: Collection-window book with slab-based storage
//! - **Engine**: Price discovery, fill allocation, and the auction driver
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical order multisets produce identical results
//! 2. **Exact Decimals**: Prices and quantities use `rust_decimal::Decimal`
//! 3. **Immutable Inputs**: Fills are new records; caller orders are not touched
//! 4. **Synchronous Execution**: No async, no shared state between calls

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Fill, ClearingReceipt
pub mod types;

/// Call book: order collection window
pub mod orderbook;

/// Price discovery and fill allocation
pub mod engine;

/// Error type
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{ClearingReceipt, Fill, Order, OrderId, Price, Quantity, Quote, Side};
pub use orderbook::{CallBook, PriceLevel};
pub use engine::{
    compute_price, fill_orders, partial_fill, Allocation, AuctionConfig, AuctionOutcome,
    CallAuction, ClearingRule, PriceBook, PriceDiscovery, PriceEngine,
};
pub use error::{AuctionError, AuctionResult};
