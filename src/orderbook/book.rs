//! Collection-window order book for one call auction.
//!
//! ## Architecture
//!
//! - **Slab**: pre-allocated storage for O(1) order insert/remove
//! - **BTreeMap**: aggregated price levels per side, kept sorted
//! - **HashMap**: order ID to slab key mapping for O(1) cancel
//!
//! ## Price Ordering
//!
//! - **Bids**: sorted high-to-low (best bid = highest price)
//! - **Offers**: sorted low-to-high (best offer = lowest price)
//!
//! ## Lifecycle
//!
//! Orders are added and cancelled while the window is open. Uncrossing
//! closes the book; a closed book rejects changes until [`CallBook::clear`]
//! empties and reopens it.
//!
//! ## Example
//!
//! ```
//! use call_auction::orderbook::CallBook;
//! use call_auction::types::Order;
//! use rust_decimal::Decimal;
//!
//! let mut book = CallBook::with_capacity(1_000);
//!
//! book.add_order(Order::bid(1, Decimal::from(55), Decimal::from(4))).unwrap();
//! book.add_order(Order::offer(2, Decimal::from(50), Decimal::from(10))).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(Decimal::from(55)));
//! assert_eq!(book.best_offer(), Some(Decimal::from(50)));
//! assert!(book.is_crossed());
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use tracing::trace;

use crate::engine::PriceBook;
use crate::error::{AuctionError, AuctionResult};
use crate::orderbook::PriceLevel;
use crate::types::{Order, OrderId, Price, Side};

/// Orders collected for one auction.
#[derive(Debug)]
pub struct CallBook {
    /// Key: slab index, Value: Order
    orders: Slab<Order>,

    /// Bid levels, highest price first
    bids: BTreeMap<Reverse<Price>, PriceLevel>,

    /// Offer levels, lowest price first
    offers: BTreeMap<Price, PriceLevel>,

    /// Order ID to slab key mapping (for O(1) cancel)
    order_index: HashMap<OrderId, usize>,

    /// Next order ID (for auto-assignment)
    next_order_id: OrderId,

    bid_count: usize,
    offer_count: usize,

    /// Set once the collection window has closed
    closed: bool,
}

impl Default for CallBook {
    fn default() -> Self {
        Self::new()
    }
}

impl CallBook {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with pre-allocated capacity
    ///
    /// ```
    /// use call_auction::orderbook::CallBook;
    ///
    /// let book = CallBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BTreeMap::new(),
            offers: BTreeMap::new(),
            order_index: HashMap::with_capacity(order_capacity),
            next_order_id: 1,
            bid_count: 0,
            offer_count: 0,
            closed: false,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    #[inline]
    pub fn offer_count(&self) -> usize {
        self.offer_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn offer_levels(&self) -> usize {
        self.offers.len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add an order to the book and return its id.
    ///
    /// An id of 0 is replaced by the next free id.
    ///
    /// # Errors
    ///
    /// - [`AuctionError::BookClosed`] after the window has closed
    /// - [`AuctionError::InvalidOrder`] for a negative price or non-positive quantity
    /// - [`AuctionError::DuplicateOrderId`] if the id is already present
    /// - [`AuctionError::ArithmeticOverflow`] if the price level total overflows
    pub fn add_order(&mut self, mut order: Order) -> AuctionResult<OrderId> {
        if self.closed {
            return Err(AuctionError::BookClosed);
        }
        order.validate()?;

        if order.id != 0 && self.order_index.contains_key(&order.id) {
            return Err(AuctionError::DuplicateOrderId(order.id));
        }

        let price = order.price;
        let quantity = order.quantity;
        let side = order.side;

        // Level first: a rejected order leaves the book untouched
        let key = self.orders.vacant_key();
        match side {
            Side::Bid => {
                self.bids
                    .entry(Reverse(price))
                    .or_insert_with(|| PriceLevel::new(price))
                    .push_back(key, quantity)?;
                self.bid_count += 1;
            }
            Side::Offer => {
                self.offers
                    .entry(price)
                    .or_insert_with(|| PriceLevel::new(price))
                    .push_back(key, quantity)?;
                self.offer_count += 1;
            }
        }

        if order.id == 0 {
            while self.order_index.contains_key(&self.next_order_id) {
                self.next_order_id += 1;
            }
            order.id = self.next_order_id;
            self.next_order_id += 1;
        }
        let order_id = order.id;

        self.orders.insert(order);
        self.order_index.insert(order_id, key);

        trace!(order_id, ?side, price = %price, quantity = %quantity, "order collected");
        Ok(order_id)
    }

    /// Remove an order before the window closes.
    pub fn cancel_order(&mut self, order_id: OrderId) -> AuctionResult<Order> {
        if self.closed {
            return Err(AuctionError::BookClosed);
        }
        let key = self
            .order_index
            .remove(&order_id)
            .ok_or(AuctionError::UnknownOrder(order_id))?;
        let order = self.orders.remove(key);

        match order.side {
            Side::Bid => {
                if let Some(level) = self.bids.get_mut(&Reverse(order.price)) {
                    level.remove(key, order.quantity);
                    if level.is_empty() {
                        self.bids.remove(&Reverse(order.price));
                    }
                }
                self.bid_count = self.bid_count.saturating_sub(1);
            }
            Side::Offer => {
                if let Some(level) = self.offers.get_mut(&order.price) {
                    level.remove(key, order.quantity);
                    if level.is_empty() {
                        self.offers.remove(&order.price);
                    }
                }
                self.offer_count = self.offer_count.saturating_sub(1);
            }
        }

        trace!(order_id, "order cancelled");
        Ok(order)
    }

    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let key = self.order_index.get(&order_id)?;
        self.orders.get(*key)
    }

    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Peek at the next auto-assigned id
    #[inline]
    pub fn peek_next_order_id(&self) -> OrderId {
        self.next_order_id
    }

    // ========================================================================
    // Best Bid/Offer
    // ========================================================================

    /// Highest bid price
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next().map(|r| r.0)
    }

    /// Lowest offer price
    #[inline]
    pub fn best_offer(&self) -> Option<Price> {
        self.offers.keys().next().copied()
    }

    /// `best_offer - best_bid` when the book is not crossed
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_offer()) {
            (Some(bid), Some(offer)) if offer >= bid => Some(offer - bid),
            _ => None,
        }
    }

    /// True when some bid meets or exceeds some offer, so the auction can trade
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_offer()), (Some(bid), Some(offer)) if bid >= offer)
    }

    pub fn best_bid_level(&self) -> Option<&PriceLevel> {
        self.bids.values().next()
    }

    pub fn best_offer_level(&self) -> Option<&PriceLevel> {
        self.offers.values().next()
    }

    // ========================================================================
    // Auction Inputs
    // ========================================================================

    /// Aggregated `(price, quantity)` per level for price discovery
    pub fn price_book(&self) -> PriceBook {
        PriceBook::from_validated(
            self.bids.values().map(PriceLevel::to_pair).collect(),
            self.offers.values().map(PriceLevel::to_pair).collect(),
        )
    }

    /// Copy of every collected order, sorted by id
    pub fn orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.iter().map(|(_, o)| o.clone()).collect();
        orders.sort_by_key(|o| o.id);
        orders
    }

    // ========================================================================
    // Window
    // ========================================================================

    /// Close the collection window
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Remove all orders and reopen the window
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.offers.clear();
        self.order_index.clear();
        self.bid_count = 0;
        self.offer_count = 0;
        self.closed = false;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
