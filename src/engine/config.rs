//! Auction configuration.

use rust_decimal::Decimal;

use crate::error::{AuctionError, AuctionResult};
use crate::types::Price;

/// Upper bound on the number of prices the residual tie-break may visit.
pub const MAX_RESIDUAL_GRID: u64 = 1_000_000;

/// Settings for price discovery.
///
/// The tick size is the price grid the residual tie-break walks between
/// tied maximum-volume prices, and the grid its final midpoint snaps to.
///
/// ```
/// use call_auction::engine::AuctionConfig;
/// use rust_decimal::Decimal;
///
/// let config = AuctionConfig::with_tick_size(Decimal::new(5, 1)).unwrap();
/// assert_eq!(config.tick_size(), Decimal::new(5, 1));
/// assert!(AuctionConfig::with_tick_size(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionConfig {
    tick_size: Price,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            tick_size: Decimal::ONE,
        }
    }
}

impl AuctionConfig {
    pub fn with_tick_size(tick_size: Price) -> AuctionResult<Self> {
        if tick_size <= Decimal::ZERO {
            return Err(AuctionError::InvalidTickSize(tick_size));
        }
        Ok(Self { tick_size })
    }

    #[inline]
    pub fn tick_size(&self) -> Price {
        self.tick_size
    }
}
