//! Uncrossing a collected batch of orders.
//!
//! A [`CallAuction`] runs price discovery over the batch, then allocates
//! fills at the discovered price. Each run gets a sequential auction id.

use tracing::info;

use crate::engine::allocation::{Allocation, FillAllocator};
use crate::engine::config::AuctionConfig;
use crate::engine::pricing::{PriceBook, PriceDiscovery, PriceEngine};
use crate::error::{AuctionError, AuctionResult};
use crate::orderbook::CallBook;
use crate::types::price::decimal_to_fixed;
use crate::types::{ClearingReceipt, Order};

/// Price and fills of one auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionOutcome {
    pub auction_id: u64,
    pub discovery: PriceDiscovery,
    pub allocation: Allocation,
}

impl AuctionOutcome {
    /// Build the SSZ receipt for this outcome.
    ///
    /// Fails if the price or volume does not fit 10^8 fixed point.
    pub fn receipt(&self) -> AuctionResult<ClearingReceipt> {
        let price_fixed = match self.discovery.price {
            Some(price) => {
                Some(decimal_to_fixed(price).ok_or(AuctionError::FixedPointOverflow(price))?)
            }
            None => None,
        };
        let volume = self.discovery.volume;
        let volume_fixed = decimal_to_fixed(volume).ok_or(AuctionError::FixedPointOverflow(volume))?;

        Ok(ClearingReceipt::new(
            self.auction_id,
            self.discovery.rule,
            price_fixed,
            volume_fixed,
            self.allocation.bids.len() as u64,
            self.allocation.offers.len() as u64,
            self.allocation.fills_root(),
        ))
    }
}

/// Runs call auctions with a fixed configuration.
///
/// ## Example
///
/// ```
/// use call_auction::engine::{CallAuction, ClearingRule};
/// use call_auction::orderbook::CallBook;
/// use call_auction::types::Order;
/// use rust_decimal::Decimal;
///
/// let mut book = CallBook::with_capacity(16);
/// book.add_order(Order::bid(1, Decimal::from(55), Decimal::from(4))).unwrap();
/// book.add_order(Order::offer(2, Decimal::from(50), Decimal::from(10))).unwrap();
///
/// let mut auction = CallAuction::default();
/// let outcome = auction.uncross(&mut book).unwrap();
///
/// assert_eq!(outcome.discovery.price, Some(Decimal::from(52)));
/// assert_eq!(outcome.allocation.volume(), Decimal::from(4));
/// assert!(book.is_closed());
/// ```
#[derive(Debug, Clone)]
pub struct CallAuction {
    engine: PriceEngine,
    next_auction_id: u64,
}

impl Default for CallAuction {
    fn default() -> Self {
        Self::new(AuctionConfig::default())
    }
}

impl CallAuction {
    pub fn new(config: AuctionConfig) -> Self {
        Self {
            engine: PriceEngine::new(config),
            next_auction_id: 1,
        }
    }

    pub fn config(&self) -> &AuctionConfig {
        self.engine.config()
    }

    /// Id the next auction will receive
    pub fn peek_next_auction_id(&self) -> u64 {
        self.next_auction_id
    }

    /// Uncross the book and close its collection window.
    ///
    /// On error the window stays open and no auction id is consumed.
    pub fn uncross(&mut self, book: &mut CallBook) -> AuctionResult<AuctionOutcome> {
        if book.is_closed() {
            return Err(AuctionError::BookClosed);
        }

        let discovery = self.engine.discover(&book.price_book())?;
        let orders = book.orders();
        let outcome = self.allocate(discovery, &orders)?;
        book.close();
        Ok(outcome)
    }

    /// Uncross a standalone batch of orders.
    pub fn run(&mut self, orders: &[Order]) -> AuctionResult<AuctionOutcome> {
        let discovery = self.engine.discover(&PriceBook::from_orders(orders)?)?;
        self.allocate(discovery, orders)
    }

    fn allocate(&mut self, discovery: PriceDiscovery, orders: &[Order]) -> AuctionResult<AuctionOutcome> {
        let allocation = match discovery.price {
            Some(price) => FillAllocator::new(orders)?.fill_orders(price)?,
            None => Allocation::empty(),
        };

        debug_assert_eq!(
            allocation.volume(),
            discovery.volume,
            "allocated volume differs from discovered volume"
        );

        let auction_id = self.next_auction_id;
        self.next_auction_id += 1;

        info!(
            auction_id,
            rule = ?discovery.rule,
            price = ?discovery.price,
            volume = %discovery.volume,
            bids_filled = allocation.bids.len(),
            offers_filled = allocation.offers.len(),
            "auction uncrossed"
        );

        Ok(AuctionOutcome {
            auction_id,
            discovery,
            allocation,
        })
    }
}
