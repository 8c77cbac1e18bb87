//! Call auction engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same order multiset always yields the same price,
//!    volume and fills, whatever the input order
//! 2. **Exact Math**: prices and quantities are `Decimal`, never floats
//! 3. **Synchronous Execution**: single pass, no shared state between calls
//! 4. **No Mutation**: caller orders are read, fills are returned as new records
//!
//! ## Components
//!
//! - [`PriceEngine`]: clearing price and maximum exchange volume
//! - [`FillAllocator`]: per-order fill quantities at that price
//! - [`CallAuction`]: both in sequence over a [`CallBook`](crate::orderbook::CallBook)
//!
//! ## Example
//!
//! ```
//! use call_auction::engine::{compute_price, fill_orders};
//! use call_auction::types::Order;
//! use rust_decimal::Decimal;
//!
//! let orders = vec![
//!     Order::bid(1, Decimal::from(2), Decimal::from(2)),
//!     Order::bid(2, Decimal::from(1), Decimal::from(1)),
//!     Order::offer(3, Decimal::from(1), Decimal::from(1)),
//!     Order::offer(4, Decimal::from(2), Decimal::from(2)),
//! ];
//! let (bids, offers): (Vec<Order>, Vec<Order>) =
//!     orders.iter().cloned().partition(|o| o.side == call_auction::types::Side::Bid);
//!
//! let discovery = compute_price(&bids, &offers).unwrap();
//! assert_eq!(discovery.price, Some(Decimal::from(2)));
//!
//! let allocation = fill_orders(&orders, Decimal::from(2)).unwrap();
//! assert_eq!(allocation.volume(), discovery.volume);
//! ```

pub mod allocation;
pub mod auction;
pub mod config;
pub mod pricing;

pub use allocation::{count_filled_volume, count_volume, fill_orders, partial_fill, Allocation, FillAllocator};
pub use auction::{AuctionOutcome, CallAuction};
pub use config::{AuctionConfig, MAX_RESIDUAL_GRID};
pub use pricing::{compute_price, ClearingRule, CumulativeCurves, PriceBook, PriceDiscovery, PriceEngine};
