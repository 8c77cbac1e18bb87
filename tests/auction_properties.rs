//! Property checks over randomly generated books.
//!
//! Books come from a seeded RNG so every run sees the same inputs.
//!
//! ```bash
//! cargo test --release --test auction_properties -- --nocapture
//! ```

use call_auction::{CallAuction, ClearingRule, Order, PriceBook, PriceEngine, Side};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Books checked per property
const BOOK_COUNT: usize = 500;

/// Upper bound on orders per book
const MAX_ORDERS: usize = 40;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Generate a deterministic batch of orders.
///
/// Prices are integers around 100 so many books tie on maximum volume;
/// quantities have two decimal places.
fn generate_orders(rng: &mut ChaCha8Rng) -> Vec<Order> {
    let count = rng.gen_range(0..=MAX_ORDERS);
    let bid_bias = rng.gen_range(0.1..0.9);

    (0..count)
        .map(|i| {
            let side = if rng.gen_bool(bid_bias) { Side::Bid } else { Side::Offer };
            let price = Decimal::from(rng.gen_range(90i64..=110));
            let quantity = Decimal::new(rng.gen_range(1i64..=1_000), 2);
            Order::new((i + 1) as u64, rng.gen_range(1..=20), side, price, quantity, i as u64)
        })
        .collect()
}

fn side_total(orders: &[Order], side: Side) -> Decimal {
    orders.iter().filter(|o| o.side == side).map(|o| o.quantity).sum()
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn volume_bounded_by_each_side() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut auction = CallAuction::default();

    for _ in 0..BOOK_COUNT {
        let orders = generate_orders(&mut rng);
        let outcome = auction.run(&orders).unwrap();

        let bound = side_total(&orders, Side::Bid).min(side_total(&orders, Side::Offer));
        assert!(outcome.discovery.volume <= bound);
    }
}

#[test]
fn fills_sum_to_discovered_volume() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut auction = CallAuction::default();

    for _ in 0..BOOK_COUNT {
        let orders = generate_orders(&mut rng);
        let outcome = auction.run(&orders).unwrap();
        let allocation = &outcome.allocation;

        assert_eq!(allocation.bid_volume(), outcome.discovery.volume, "orders {:?}", orders);
        assert_eq!(allocation.offer_volume(), outcome.discovery.volume, "orders {:?}", orders);

        for fill in allocation.fills() {
            assert!(fill.quantity_final > Decimal::ZERO);
            assert!(fill.quantity_final <= fill.quantity);
        }

        // At most one clipped order per side
        assert!(allocation.bids.iter().filter(|f| f.is_partial()).count() <= 1);
        assert!(allocation.offers.iter().filter(|f| f.is_partial()).count() <= 1);
    }
}

#[test]
fn fills_only_cross_the_price() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut auction = CallAuction::default();

    for _ in 0..BOOK_COUNT {
        let orders = generate_orders(&mut rng);
        let outcome = auction.run(&orders).unwrap();
        let Some(price) = outcome.discovery.price else {
            assert!(orders.is_empty());
            continue;
        };

        for fill in outcome.allocation.fills() {
            assert!(fill.side.crosses(fill.limit_price, price));
        }
    }
}

#[test]
fn degenerate_books_follow_their_rules() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let engine = PriceEngine::default();

    for _ in 0..BOOK_COUNT {
        let orders = generate_orders(&mut rng);
        let book = PriceBook::from_orders(&orders).unwrap();
        let discovery = engine.discover(&book).unwrap();

        match (book.max_bid(), book.min_offer()) {
            (None, None) => assert_eq!(discovery.rule, ClearingRule::NoOrders),
            (Some(bid), None) => assert_eq!(discovery.price, Some(bid)),
            (None, Some(offer)) => assert_eq!(discovery.price, Some(offer)),
            (Some(bid), Some(offer)) if offer > bid => {
                assert_eq!(discovery.rule, ClearingRule::Disjoint);
                assert_eq!(discovery.price, Some((bid + offer) / Decimal::TWO));
            }
            _ => {
                assert!(discovery.volume > Decimal::ZERO);
                let price = discovery.price.unwrap();
                assert!(price >= book.curves().unwrap().prices().next().unwrap());
            }
        }

        if discovery.rule != ClearingRule::UniqueMev && discovery.rule != ClearingRule::ResidualTiebreak {
            assert_eq!(discovery.volume, Decimal::ZERO);
        }
    }
}

/// Permuting the input must not change price, volume or any fill.
#[test]
fn permutation_determinism() {
    let mut rng = ChaCha8Rng::seed_from_u64(12345);

    for _ in 0..BOOK_COUNT {
        let orders = generate_orders(&mut rng);
        let mut shuffled = orders.clone();
        shuffled.shuffle(&mut rng);

        let first = CallAuction::default().run(&orders).unwrap();
        let second = CallAuction::default().run(&shuffled).unwrap();

        assert_eq!(first.discovery, second.discovery);
        assert_eq!(first.allocation, second.allocation);
        assert_eq!(first.receipt().unwrap(), second.receipt().unwrap());
    }
}

#[test]
fn receipts_differ_across_seeds() {
    let mut rng_a = ChaCha8Rng::seed_from_u64(1);
    let mut rng_b = ChaCha8Rng::seed_from_u64(2);

    let roots_a: Vec<[u8; 32]> = (0..20)
        .map(|_| CallAuction::default().run(&generate_orders(&mut rng_a)).unwrap().receipt().unwrap().fills_root)
        .collect();
    let roots_b: Vec<[u8; 32]> = (0..20)
        .map(|_| CallAuction::default().run(&generate_orders(&mut rng_b)).unwrap().receipt().unwrap().fills_root)
        .collect();

    assert_ne!(roots_a, roots_b, "different seeds should produce different fills");
}
