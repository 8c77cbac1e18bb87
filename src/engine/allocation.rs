//! Deterministic fill allocation at the clearing price.
//!
//! ## Rules
//!
//! - Bids are ranked by price descending, then quantity descending.
//! - Offers are ranked by price ascending, then quantity ascending.
//! - Equal price and quantity fall back to ascending order id.
//! - Only orders crossing the market price participate.
//! - The side with less eligible volume fills completely. The other side
//!   fills in rank order up to that volume; at most one order (the marginal
//!   order) is clipped.
//!
//! ## Example
//!
//! ```
//! use call_auction::engine::fill_orders;
//! use call_auction::types::Order;
//! use rust_decimal::Decimal;
//!
//! let orders = vec![
//!     Order::bid(1, Decimal::from(55), Decimal::from(4)),
//!     Order::offer(2, Decimal::from(50), Decimal::from(10)),
//! ];
//!
//! let allocation = fill_orders(&orders, Decimal::from(52)).unwrap();
//! assert_eq!(allocation.bid_volume(), Decimal::from(4));
//! assert_eq!(allocation.offer_volume(), Decimal::from(4));
//! assert!(allocation.offers[0].is_partial());
//! ```

use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::{AuctionError, AuctionResult};
use crate::types::price::checked_sum;
use crate::types::{ClearingReceipt, Fill, Order, OrderId, Price, Quantity, Side};

/// Fills for one auction, split by side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Price the fills execute at (`None` when the book was empty)
    pub market_price: Option<Price>,

    /// Filled bids in rank order
    pub bids: Vec<Fill>,

    /// Filled offers in rank order
    pub offers: Vec<Fill>,
}

impl Allocation {
    /// No fills, no price
    pub fn empty() -> Self {
        Self::default()
    }

    /// Filled bid quantity.
    ///
    /// Allocator fills never sum past the matched volume, so this saturates
    /// only for hand-built allocations.
    pub fn bid_volume(&self) -> Quantity {
        saturating_volume(&self.bids)
    }

    /// Filled offer quantity. Saturates like [`bid_volume`](Self::bid_volume).
    pub fn offer_volume(&self) -> Quantity {
        saturating_volume(&self.offers)
    }

    /// Matched volume. Both sides always agree.
    pub fn volume(&self) -> Quantity {
        self.bid_volume().min(self.offer_volume())
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.offers.is_empty()
    }

    /// All fills, bids first
    pub fn fills(&self) -> impl Iterator<Item = &Fill> {
        self.bids.iter().chain(self.offers.iter())
    }

    pub fn fill_for(&self, order_id: OrderId) -> Option<&Fill> {
        self.fills().find(|f| f.order_id == order_id)
    }

    /// SHA-256 over every fill, bids then offers, each sorted by order id.
    pub fn fills_root(&self) -> [u8; 32] {
        let mut bids: Vec<&Fill> = self.bids.iter().collect();
        bids.sort_by_key(|f| f.order_id);
        let mut offers: Vec<&Fill> = self.offers.iter().collect();
        offers.sort_by_key(|f| f.order_id);

        ClearingReceipt::compute_fills_root(bids.into_iter().chain(offers))
    }
}

// ============================================================================
// FillAllocator
// ============================================================================

/// Orders of one auction, partitioned by side and ranked.
#[derive(Debug, Clone)]
pub struct FillAllocator<'a> {
    bids: Vec<&'a Order>,
    offers: Vec<&'a Order>,
}

impl<'a> FillAllocator<'a> {
    /// Validate, partition and rank the orders.
    pub fn new(orders: &'a [Order]) -> AuctionResult<Self> {
        let mut bids = Vec::new();
        let mut offers = Vec::new();
        for order in orders {
            order.validate()?;
            match order.side {
                Side::Bid => bids.push(order),
                Side::Offer => offers.push(order),
            }
        }

        bids.sort_by(|a, b| rank_bids(a, b));
        offers.sort_by(|a, b| rank_offers(a, b));

        Ok(Self { bids, offers })
    }

    /// Ranked bids
    pub fn bids(&self) -> &[&'a Order] {
        &self.bids
    }

    /// Ranked offers
    pub fn offers(&self) -> &[&'a Order] {
        &self.offers
    }

    /// Bids priced at or above `market_price`, in rank order
    pub fn select_bids(&self, market_price: Price) -> Vec<&'a Order> {
        self.bids
            .iter()
            .copied()
            .filter(|o| o.crosses(market_price))
            .collect()
    }

    /// Offers priced at or below `market_price`, in rank order
    pub fn select_offers(&self, market_price: Price) -> Vec<&'a Order> {
        self.offers
            .iter()
            .copied()
            .filter(|o| o.crosses(market_price))
            .collect()
    }

    /// Decide which orders transact at `market_price`, and how much of each.
    pub fn fill_orders(&self, market_price: Price) -> AuctionResult<Allocation> {
        let bids = self.select_bids(market_price);
        let offers = self.select_offers(market_price);

        let total_bid = count_volume(&bids)?;
        let total_offer = count_volume(&offers)?;
        let mev = total_bid.min(total_offer);

        debug!(
            price = %market_price,
            eligible_bids = bids.len(),
            eligible_offers = offers.len(),
            total_bid = %total_bid,
            total_offer = %total_offer,
            "allocating fills"
        );

        let (bid_fills, offer_fills) = match total_bid.cmp(&total_offer) {
            // Every bid trades; offers are capped
            Ordering::Less => (fill_all(&bids), partial_fill(&offers, mev)?),
            // Every offer trades; bids are capped
            Ordering::Greater => (partial_fill(&bids, mev)?, fill_all(&offers)),
            Ordering::Equal => (fill_all(&bids), fill_all(&offers)),
        };

        Ok(Allocation {
            market_price: Some(market_price),
            bids: bid_fills,
            offers: offer_fills,
        })
    }
}

fn rank_bids(a: &Order, b: &Order) -> Ordering {
    b.price
        .cmp(&a.price)
        .then_with(|| b.quantity.cmp(&a.quantity))
        .then_with(|| a.id.cmp(&b.id))
}

fn rank_offers(a: &Order, b: &Order) -> Ordering {
    a.price
        .cmp(&b.price)
        .then_with(|| a.quantity.cmp(&b.quantity))
        .then_with(|| a.id.cmp(&b.id))
}

fn fill_all(orders: &[&Order]) -> Vec<Fill> {
    orders.iter().map(|o| Fill::full(o)).collect()
}

/// Fill `orders` in the given order until exactly `cap` is allocated.
///
/// The list is not re-sorted. Every order is filled completely except the
/// one that carries the total past `cap`, which is clipped so the fills sum
/// to `cap`. Orders after it receive nothing.
///
/// # Errors
///
/// - [`AuctionError::InsufficientVolume`] if the orders hold less than `cap`
/// - [`AuctionError::ArithmeticOverflow`] if their total quantity overflows
pub fn partial_fill(orders: &[&Order], cap: Quantity) -> AuctionResult<Vec<Fill>> {
    if cap <= Decimal::ZERO || orders.is_empty() {
        return Ok(Vec::new());
    }

    let available = count_volume(orders)?;
    if cap > available {
        return Err(AuctionError::InsufficientVolume { cap, available });
    }

    let mut fills = Vec::new();
    let mut accumulated = Decimal::ZERO;
    for order in orders {
        accumulated = accumulated
            .checked_add(order.quantity)
            .ok_or(AuctionError::ArithmeticOverflow("partial fill"))?;
        if accumulated > cap {
            let clipped = order.quantity - (accumulated - cap);
            trace!(order_id = order.id, quantity = %order.quantity, filled = %clipped, "marginal order");
            fills.push(Fill::clipped(order, clipped));
            break;
        }
        fills.push(Fill::full(order));
        if accumulated == cap {
            break;
        }
    }

    Ok(fills)
}

/// Allocate fills for `orders` at `market_price`.
pub fn fill_orders(orders: &[Order], market_price: Price) -> AuctionResult<Allocation> {
    FillAllocator::new(orders)?.fill_orders(market_price)
}

/// Total requested quantity of `orders`
pub fn count_volume(orders: &[&Order]) -> AuctionResult<Quantity> {
    checked_sum(orders.iter().map(|o| o.quantity)).ok_or(AuctionError::ArithmeticOverflow("order volume"))
}

/// Total filled quantity of `fills`
pub fn count_filled_volume(fills: &[Fill]) -> AuctionResult<Quantity> {
    checked_sum(fills.iter().map(|f| f.quantity_final)).ok_or(AuctionError::ArithmeticOverflow("filled volume"))
}

fn saturating_volume(fills: &[Fill]) -> Quantity {
    fills
        .iter()
        .fold(Decimal::ZERO, |total, f| total.saturating_add(f.quantity_final))
}

// ============================================================================
// Unit Tests
// ============================================================================
