//! Clearing receipt summarizing one uncrossed auction.
//!
//! The receipt is a fixed-size SSZ container. Prices and volumes are carried
//! in 10^8 fixed point; the individual fills are committed to by a SHA-256
//! `fills_root`, so two runs over the same order multiset can be compared
//! byte for byte.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::engine::ClearingRule;
use crate::types::fill::Fill;

/// Receipt for one auction.
///
/// ## Example
///
/// ```
/// use call_auction::types::ClearingReceipt;
/// use call_auction::engine::ClearingRule;
///
/// let receipt = ClearingReceipt::new(
///     1,                          // auction_id
///     ClearingRule::UniqueMev,    // rule
///     Some(200_000_000),          // price: 2.00000000
///     200_000_000,                // volume: 2.00000000
///     1,                          // bids_filled
///     2,                          // offers_filled
///     [0u8; 32],                  // fills_root
/// );
/// assert!(receipt.has_price);
/// assert_eq!(receipt.rule(), Some(ClearingRule::UniqueMev));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ClearingReceipt {
    /// Auction sequence number
    pub auction_id: u64,

    /// False when the book was empty and no price exists
    pub has_price: bool,

    /// Clearing price in fixed-point (0 when `has_price` is false)
    pub price_fixed: u64,

    /// Matched volume in fixed-point
    pub volume_fixed: u64,

    /// Rule that produced the price, see [`ClearingRule::to_u8`]
    pub rule_raw: u8,

    /// Number of bids receiving a fill
    pub bids_filled: u64,

    /// Number of offers receiving a fill
    pub offers_filled: u64,

    /// SHA-256 over the canonical encoding of every fill
    pub fills_root: [u8; 32],
}

impl ClearingReceipt {
    pub fn new(
        auction_id: u64,
        rule: ClearingRule,
        price_fixed: Option<u64>,
        volume_fixed: u64,
        bids_filled: u64,
        offers_filled: u64,
        fills_root: [u8; 32],
    ) -> Self {
        Self {
            auction_id,
            has_price: price_fixed.is_some(),
            price_fixed: price_fixed.unwrap_or(0),
            volume_fixed,
            rule_raw: rule.to_u8(),
            bids_filled,
            offers_filled,
            fills_root,
        }
    }

    /// Hash fills in the order given.
    ///
    /// Callers sort fills canonically first (see
    /// [`Allocation::fills_root`](crate::engine::Allocation::fills_root)).
    pub fn compute_fills_root<'a>(fills: impl IntoIterator<Item = &'a Fill>) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for fill in fills {
            hasher.update(fill.encode());
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the fills root as a hex string
    pub fn fills_root_hex(&self) -> String {
        hex::encode(self.fills_root)
    }

    /// Decode the clearing rule
    pub fn rule(&self) -> Option<ClearingRule> {
        ClearingRule::from_u8(self.rule_raw)
    }

    /// True when nothing traded
    pub fn is_empty(&self) -> bool {
        self.volume_fixed == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;
    use rust_decimal_macros::dec;

    #[test]
    fn test_receipt_without_price() {
        let receipt = ClearingReceipt::new(3, ClearingRule::NoOrders, None, 0, 0, 0, [0u8; 32]);

        assert!(!receipt.has_price);
        assert_eq!(receipt.price_fixed, 0);
        assert!(receipt.is_empty());
        assert_eq!(receipt.rule(), Some(ClearingRule::NoOrders));
    }

    #[test]
    fn test_fills_root_depends_on_content() {
        let a = Fill::full(&Order::bid(1, dec!(55), dec!(4)));
        let b = Fill::clipped(&Order::offer(2, dec!(50), dec!(10)), dec!(4));

        let root1 = ClearingReceipt::compute_fills_root([&a, &b]);
        let root2 = ClearingReceipt::compute_fills_root([&a, &b]);
        assert_eq!(root1, root2);

        let root3 = ClearingReceipt::compute_fills_root([&a]);
        assert_ne!(root1, root3);
    }

    #[test]
    fn test_fills_root_hex() {
        let receipt = ClearingReceipt::new(1, ClearingRule::UniqueMev, Some(1), 1, 1, 1, [0xAB; 32]);
        let hex = receipt.fills_root_hex();

        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_receipt_ssz_roundtrip() {
        let receipt = ClearingReceipt::new(
            7,
            ClearingRule::ResidualTiebreak,
            Some(5_200_000_000),
            400_000_000,
            1,
            1,
            [0x11; 32],
        );

        let serialized = ssz_rs::serialize(&receipt).expect("Failed to serialize");
        let deserialized: ClearingReceipt =
            ssz_rs::deserialize(&serialized).expect("Failed to deserialize");
        assert_eq!(receipt, deserialized);

        // 8 + 1 + 8 + 8 + 1 + 8 + 8 + 32
        assert_eq!(serialized.len(), 74);
    }
}
