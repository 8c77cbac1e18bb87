//! Call Auction - demo binary
//!
//! Uncrosses a handful of reference books and prints price, volume and fills.
//! Log filtering follows `RUST_LOG` (e.g. `RUST_LOG=call_auction=debug`),
//! defaulting to `info`.

use call_auction::{AuctionResult, CallAuction, CallBook, Order};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn book(bids: &[(i64, i64)], offers: &[(i64, i64)]) -> AuctionResult<CallBook> {
    let mut book = CallBook::with_capacity(bids.len() + offers.len());
    for &(price, quantity) in bids {
        book.add_order(Order::bid(0, Decimal::from(price), Decimal::from(quantity)))?;
    }
    for &(price, quantity) in offers {
        book.add_order(Order::offer(0, Decimal::from(price), Decimal::from(quantity)))?;
    }
    Ok(book)
}

fn main() -> AuctionResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("  Call Auction - reference books");
    println!("===========================================");

    let scenarios: [(&str, &[(i64, i64)], &[(i64, i64)]); 5] = [
        ("volume", &[(1, 1), (2, 2)], &[(1, 1), (2, 2)]),
        ("residual", &[(4, 2), (6, 1)], &[(4, 1), (6, 1)]),
        ("pressure", &[(55, 4)], &[(50, 10)]),
        ("reference", &[(5, 10), (6, 10)], &[(5, 10), (6, 10)]),
        ("no trade", &[(1, 1)], &[(10, 1)]),
    ];

    let mut auction = CallAuction::default();
    for (name, bids, offers) in scenarios {
        let mut book = book(bids, offers)?;
        let outcome = auction.uncross(&mut book)?;
        let receipt = outcome.receipt()?;

        println!();
        println!("[{}] bids {:?} offers {:?}", name, bids, offers);
        println!(
            "  rule: {:?}  price: {}  volume: {}",
            outcome.discovery.rule,
            outcome
                .discovery
                .price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "none".to_string()),
            outcome.discovery.volume,
        );
        for fill in outcome.allocation.fills() {
            println!(
                "  {:?} #{} limit {} filled {}/{}",
                fill.side, fill.order_id, fill.limit_price, fill.quantity_final, fill.quantity
            );
        }
        println!("  fills root: {}", receipt.fills_root_hex());
    }

    Ok(())
}
