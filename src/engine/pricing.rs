//! Call auction price discovery.
//!
//! ## Algorithm
//!
//! Rules are tried in a fixed order; the first that applies decides the
//! result and is reported as the [`ClearingRule`]:
//!
//! 1. **NoOrders**: both sides empty, no price and zero volume.
//! 2. **OneSided**: only offers (lowest offer) or only bids (highest bid),
//!    zero volume.
//! 3. **Disjoint**: lowest offer above highest bid. Midpoint of the two,
//!    zero volume.
//! 4. **UniqueMev**: the single observed price maximizing
//!    `min(CSQ(p), CBQ(p))`.
//! 5. **ResidualTiebreak**: several prices tie for the maximum exchange
//!    volume. Walk the tick grid between the lowest and highest tied price,
//!    holding cumulative supply/demand at their last tied values, and take the
//!    midpoint of the prices with the smallest `|CSQ - CBQ|`, snapped to the
//!    tick grid.
//!
//! ## Example
//!
//! ```
//! use call_auction::engine::{compute_price, ClearingRule};
//! use rust_decimal::Decimal;
//!
//! let bids = [(Decimal::from(55), Decimal::from(4))];
//! let offers = [(Decimal::from(50), Decimal::from(10))];
//!
//! let discovery = compute_price(&bids, &offers).unwrap();
//! assert_eq!(discovery.price, Some(Decimal::from(52)));
//! assert_eq!(discovery.volume, Decimal::from(4));
//! assert_eq!(discovery.rule, ClearingRule::ResidualTiebreak);
//! ```

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::engine::config::{AuctionConfig, MAX_RESIDUAL_GRID};
use crate::error::{AuctionError, AuctionResult};
use crate::types::price::{checked_sum, midpoint, snap_to_tick};
use crate::types::{Order, Price, Quantity, Quote, Side};

// ============================================================================
// ClearingRule / PriceDiscovery
// ============================================================================

/// The rule that determined a clearing price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearingRule {
    NoOrders,
    OneSided,
    Disjoint,
    UniqueMev,
    ResidualTiebreak,
}

impl ClearingRule {
    /// Convert to u8 for receipts
    pub fn to_u8(self) -> u8 {
        match self {
            ClearingRule::NoOrders => 0,
            ClearingRule::OneSided => 1,
            ClearingRule::Disjoint => 2,
            ClearingRule::UniqueMev => 3,
            ClearingRule::ResidualTiebreak => 4,
        }
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ClearingRule::NoOrders),
            1 => Some(ClearingRule::OneSided),
            2 => Some(ClearingRule::Disjoint),
            3 => Some(ClearingRule::UniqueMev),
            4 => Some(ClearingRule::ResidualTiebreak),
            _ => None,
        }
    }
}

/// Result of price discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceDiscovery {
    pub rule: ClearingRule,

    /// Clearing price; `None` only for [`ClearingRule::NoOrders`]
    pub price: Option<Price>,

    /// Maximum exchange volume at `price`
    pub volume: Quantity,
}

impl PriceDiscovery {
    fn new(rule: ClearingRule, price: Option<Price>, volume: Quantity) -> Self {
        Self {
            rule,
            price,
            volume,
        }
    }

    /// True if any quantity trades
    #[inline]
    pub fn is_tradable(&self) -> bool {
        self.volume > Decimal::ZERO
    }
}

// ============================================================================
// PriceBook
// ============================================================================

/// Bids and offers normalized to `(price, quantity)` pairs.
///
/// Built fresh for every pricing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBook {
    bids: Vec<(Price, Quantity)>,
    offers: Vec<(Price, Quantity)>,
}

impl PriceBook {
    /// Normalize and validate both sides.
    pub fn from_quotes<B: Quote, O: Quote>(bids: &[B], offers: &[O]) -> AuctionResult<Self> {
        Ok(Self {
            bids: normalize(Side::Bid, bids)?,
            offers: normalize(Side::Offer, offers)?,
        })
    }

    /// Like [`from_quotes`](Self::from_quotes); an absent side is an empty side.
    pub fn from_optional<B: Quote, O: Quote>(
        bids: Option<&[B]>,
        offers: Option<&[O]>,
    ) -> AuctionResult<Self> {
        Self::from_quotes(bids.unwrap_or(&[]), offers.unwrap_or(&[]))
    }

    /// Split orders by side, validating each.
    pub fn from_orders(orders: &[Order]) -> AuctionResult<Self> {
        let mut book = Self::default();
        for order in orders {
            order.validate()?;
            match order.side {
                Side::Bid => book.bids.push(order.to_pair()),
                Side::Offer => book.offers.push(order.to_pair()),
            }
        }
        Ok(book)
    }

    /// Build from pairs that were validated upstream.
    pub(crate) fn from_validated(
        bids: Vec<(Price, Quantity)>,
        offers: Vec<(Price, Quantity)>,
    ) -> Self {
        Self { bids, offers }
    }

    pub fn bids(&self) -> &[(Price, Quantity)] {
        &self.bids
    }

    pub fn offers(&self) -> &[(Price, Quantity)] {
        &self.offers
    }

    #[inline]
    pub fn has_bids(&self) -> bool {
        !self.bids.is_empty()
    }

    #[inline]
    pub fn has_offers(&self) -> bool {
        !self.offers.is_empty()
    }

    /// Highest bid price
    pub fn max_bid(&self) -> Option<Price> {
        self.bids.iter().map(|&(p, _)| p).max()
    }

    /// Lowest offer price
    pub fn min_offer(&self) -> Option<Price> {
        self.offers.iter().map(|&(p, _)| p).min()
    }

    pub fn total_bid_quantity(&self) -> AuctionResult<Quantity> {
        checked_sum(self.bids.iter().map(|&(_, q)| q))
            .ok_or(AuctionError::ArithmeticOverflow("bid quantity"))
    }

    pub fn total_offer_quantity(&self) -> AuctionResult<Quantity> {
        checked_sum(self.offers.iter().map(|&(_, q)| q))
            .ok_or(AuctionError::ArithmeticOverflow("offer quantity"))
    }

    /// Cumulative supply and demand over every observed price
    pub fn curves(&self) -> AuctionResult<CumulativeCurves> {
        CumulativeCurves::build(self)
    }
}

fn normalize<Q: Quote>(side: Side, quotes: &[Q]) -> AuctionResult<Vec<(Price, Quantity)>> {
    quotes
        .iter()
        .map(|q| {
            let (price, quantity) = q.to_pair();
            if price < Decimal::ZERO || quantity <= Decimal::ZERO {
                return Err(AuctionError::InvalidQuote {
                    side,
                    price,
                    quantity,
                });
            }
            Ok((price, quantity))
        })
        .collect()
}

// ============================================================================
// CumulativeCurves
// ============================================================================

/// Cumulative supply (CSQ) and demand (CBQ) keyed by observed price.
///
/// - `CSQ(p)`: total offer quantity priced at or below `p`
/// - `CBQ(p)`: total bid quantity priced at or above `p`
///
/// Both maps share the same key set: the distinct prices of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeCurves {
    csq: BTreeMap<Price, Quantity>,
    cbq: BTreeMap<Price, Quantity>,
}

impl CumulativeCurves {
    /// # Errors
    ///
    /// [`AuctionError::ArithmeticOverflow`] if a cumulative quantity leaves
    /// the range of `Decimal`.
    pub fn build(book: &PriceBook) -> AuctionResult<Self> {
        let mut offers_at: BTreeMap<Price, Quantity> = BTreeMap::new();
        let mut bids_at: BTreeMap<Price, Quantity> = BTreeMap::new();
        for &(price, quantity) in book.offers() {
            add_at(&mut offers_at, price, quantity)?;
            bids_at.entry(price).or_insert(Decimal::ZERO);
        }
        for &(price, quantity) in book.bids() {
            add_at(&mut bids_at, price, quantity)?;
            offers_at.entry(price).or_insert(Decimal::ZERO);
        }

        let mut csq = BTreeMap::new();
        let mut running = Decimal::ZERO;
        for (&price, &quantity) in &offers_at {
            running = running
                .checked_add(quantity)
                .ok_or(AuctionError::ArithmeticOverflow("cumulative supply"))?;
            csq.insert(price, running);
        }

        let mut cbq = BTreeMap::new();
        let mut running = Decimal::ZERO;
        for (&price, &quantity) in bids_at.iter().rev() {
            running = running
                .checked_add(quantity)
                .ok_or(AuctionError::ArithmeticOverflow("cumulative demand"))?;
            cbq.insert(price, running);
        }

        Ok(Self { csq, cbq })
    }

    /// Distinct observed prices, ascending
    pub fn prices(&self) -> impl Iterator<Item = Price> + '_ {
        self.csq.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.csq.is_empty()
    }

    /// Cumulative supply curve
    pub fn supply(&self) -> &BTreeMap<Price, Quantity> {
        &self.csq
    }

    /// Cumulative demand curve
    pub fn demand(&self) -> &BTreeMap<Price, Quantity> {
        &self.cbq
    }

    pub fn csq(&self, price: Price) -> Option<Quantity> {
        self.csq.get(&price).copied()
    }

    pub fn cbq(&self, price: Price) -> Option<Quantity> {
        self.cbq.get(&price).copied()
    }

    /// `min(CSQ(p), CBQ(p))` at an observed price
    pub fn exchangeable(&self, price: Price) -> Option<Quantity> {
        Some(self.csq(price)?.min(self.cbq(price)?))
    }

    /// `|CSQ(p) - CBQ(p)|` at an observed price
    pub fn residual(&self, price: Price) -> Option<Quantity> {
        Some((self.csq(price)? - self.cbq(price)?).abs())
    }

    /// Maximum exchange volume and the prices attaining it, ascending.
    pub fn max_exchange(&self) -> (Quantity, Vec<Price>) {
        let mut mev = Decimal::NEGATIVE_ONE;
        let mut candidates = Vec::new();
        let levels = self.csq.iter().zip(self.cbq.values());
        for ((&price, &supply), &demand) in levels {
            let volume = supply.min(demand);
            if volume > mev {
                mev = volume;
                candidates.clear();
                candidates.push(price);
            } else if volume == mev {
                candidates.push(price);
            }
        }
        (mev.max(Decimal::ZERO), candidates)
    }
}

fn add_at(levels: &mut BTreeMap<Price, Quantity>, price: Price, quantity: Quantity) -> AuctionResult<()> {
    let total = levels.entry(price).or_insert(Decimal::ZERO);
    *total = total
        .checked_add(quantity)
        .ok_or(AuctionError::ArithmeticOverflow("quantity at price"))?;
    Ok(())
}

// ============================================================================
// PriceEngine
// ============================================================================

/// Price discovery with a given configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceEngine {
    config: AuctionConfig,
}

impl PriceEngine {
    pub fn new(config: AuctionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Determine the clearing price and maximum exchange volume.
    pub fn discover(&self, book: &PriceBook) -> AuctionResult<PriceDiscovery> {
        let discovery = self.apply_rules(book)?;
        debug!(
            rule = ?discovery.rule,
            price = ?discovery.price,
            volume = %discovery.volume,
            bids = book.bids().len(),
            offers = book.offers().len(),
            "price discovered"
        );
        Ok(discovery)
    }

    fn apply_rules(&self, book: &PriceBook) -> AuctionResult<PriceDiscovery> {
        let (max_bid, min_offer) = match (book.max_bid(), book.min_offer()) {
            (None, None) => {
                return Ok(PriceDiscovery::new(ClearingRule::NoOrders, None, Decimal::ZERO));
            }
            // The lowest ask is the only price at which a trade could occur
            (None, Some(min_offer)) => {
                return Ok(PriceDiscovery::new(
                    ClearingRule::OneSided,
                    Some(min_offer),
                    Decimal::ZERO,
                ));
            }
            (Some(max_bid), None) => {
                return Ok(PriceDiscovery::new(
                    ClearingRule::OneSided,
                    Some(max_bid),
                    Decimal::ZERO,
                ));
            }
            (Some(max_bid), Some(min_offer)) => (max_bid, min_offer),
        };

        if min_offer > max_bid {
            let price = midpoint(max_bid, min_offer).ok_or(AuctionError::ArithmeticOverflow("midpoint"))?;
            return Ok(PriceDiscovery::new(ClearingRule::Disjoint, Some(price), Decimal::ZERO));
        }

        let curves = book.curves()?;
        let (mev, candidates) = curves.max_exchange();
        trace!(mev = %mev, candidates = candidates.len(), "max exchange volume");

        if let [price] = candidates.as_slice() {
            return Ok(PriceDiscovery::new(ClearingRule::UniqueMev, Some(*price), mev));
        }

        let price = self.residual_tiebreak(&curves, &candidates)?;
        Ok(PriceDiscovery::new(ClearingRule::ResidualTiebreak, Some(price), mev))
    }

    /// Break a tie between maximum-volume prices by minimal residual.
    ///
    /// `candidates` is ascending with at least two entries.
    fn residual_tiebreak(
        &self,
        curves: &CumulativeCurves,
        candidates: &[Price],
    ) -> AuctionResult<Price> {
        let grid = self.residual_grid(candidates)?;

        // Hold the last tied value constant between tied prices
        let mut extended_csq = Vec::with_capacity(grid.len());
        let mut working = Decimal::ZERO;
        for price in &grid {
            if candidates.binary_search(price).is_ok() {
                working = curves.csq(*price).unwrap_or(working);
            }
            extended_csq.push(working);
        }

        let mut extended_cbq = Vec::with_capacity(grid.len());
        let mut working = Decimal::ZERO;
        for price in grid.iter().rev() {
            if candidates.binary_search(price).is_ok() {
                working = curves.cbq(*price).unwrap_or(working);
            }
            extended_cbq.push(working);
        }
        extended_cbq.reverse();

        let mut min_residual: Option<Quantity> = None;
        let mut lowest = grid[0];
        let mut highest = grid[0];
        for ((&price, supply), demand) in grid.iter().zip(extended_csq).zip(extended_cbq) {
            let residual = (supply - demand).abs();
            match min_residual {
                Some(min) if residual > min => {}
                Some(min) if residual == min => highest = price,
                _ => {
                    min_residual = Some(residual);
                    lowest = price;
                    highest = price;
                }
            }
        }

        let mid = midpoint(lowest, highest).ok_or(AuctionError::ArithmeticOverflow("midpoint"))?;
        let price = snap_to_tick(mid, self.config.tick_size())
            .ok_or(AuctionError::ArithmeticOverflow("tick snapping"))?
            .clamp(lowest, highest);
        trace!(
            residual = ?min_residual,
            lowest = %lowest,
            highest = %highest,
            price = %price,
            "residual tie-break"
        );
        Ok(price)
    }

    /// Tick multiples strictly between the lowest and highest candidate,
    /// merged with the candidates themselves. Ascending, no duplicates.
    fn residual_grid(&self, candidates: &[Price]) -> AuctionResult<Vec<Price>> {
        let tick = self.config.tick_size();
        let (lo, hi) = match (candidates.first(), candidates.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Ok(Vec::new()),
        };

        // A spread too wide to count in ticks is past any grid limit
        let steps = (hi - lo)
            .checked_div(tick)
            .and_then(|steps| steps.ceil().to_u64())
            .unwrap_or(u64::MAX);
        let points = steps.saturating_add(candidates.len() as u64);
        if points > MAX_RESIDUAL_GRID {
            return Err(AuctionError::GridTooLarge {
                points,
                limit: MAX_RESIDUAL_GRID,
            });
        }

        let mut grid = Vec::with_capacity(points as usize);
        grid.extend_from_slice(candidates);

        let mut price = lo
            .checked_div(tick)
            .and_then(|steps| steps.floor().checked_mul(tick))
            .and_then(|base| base.checked_add(tick))
            .ok_or(AuctionError::ArithmeticOverflow("residual grid"))?;
        while price < hi {
            grid.push(price);
            match price.checked_add(tick) {
                Some(next) => price = next,
                None => break,
            }
        }

        grid.sort();
        grid.dedup();
        Ok(grid)
    }
}

/// Price discovery with the default configuration.
///
/// Accepts tuples, orders, or anything else implementing [`Quote`]. An
/// empty slice means no orders on that side.
pub fn compute_price<B: Quote, O: Quote>(bids: &[B], offers: &[O]) -> AuctionResult<PriceDiscovery> {
    let book = PriceBook::from_quotes(bids, offers)?;
    PriceEngine::default().discover(&book)
}

// ============================================================================
// Unit Tests
// ============================================================================
