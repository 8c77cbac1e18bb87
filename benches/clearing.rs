//! Benchmarks for call auction clearing.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- price_discovery
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use call_auction::{compute_price, fill_orders, CallAuction, CallBook, Order, PriceBook, PriceEngine, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

/// Generate a batch of overlapping bids and offers around a price of 100.
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let side = if rng.gen_bool(0.5) { Side::Bid } else { Side::Offer };
            let price = Decimal::from(rng.gen_range(80i64..=120));
            let quantity = Decimal::new(rng.gen_range(1i64..=10_000), 2);
            Order::new((i + 1) as u64, 1, side, price, quantity, i as u64)
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Price Discovery
// ============================================================================

fn bench_price_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_discovery");
    group.measurement_time(Duration::from_secs(5));

    for size in [100usize, 1_000, 10_000] {
        let orders = generate_order_batch(size, 42);
        let book = PriceBook::from_orders(&orders).unwrap();
        let engine = PriceEngine::default();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &book, |b, book| {
            b.iter(|| black_box(engine.discover(book).unwrap()))
        });
    }

    // Flat residual over a wide tied range
    group.bench_function("wide_residual_tie", |b| {
        let bids = vec![(dec!(10000), dec!(4))];
        let offers = vec![(dec!(1), dec!(10))];
        b.iter(|| black_box(compute_price(&bids, &offers).unwrap()))
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Fill Allocation
// ============================================================================

fn bench_fill_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_allocation");

    for size in [100usize, 1_000, 10_000] {
        let orders = generate_order_batch(size, 7);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &orders, |b, orders| {
            b.iter(|| black_box(fill_orders(orders, dec!(100)).unwrap()))
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Full Uncross
// ============================================================================

fn bench_uncross(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncross");

    group.bench_function("collect_and_uncross_1k", |b| {
        b.iter_batched(
            || generate_order_batch(1_000, 99),
            |orders| {
                let mut book = CallBook::with_capacity(orders.len());
                for order in orders {
                    book.add_order(order).unwrap();
                }
                black_box(CallAuction::default().uncross(&mut book).unwrap())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_price_discovery, bench_fill_allocation, bench_uncross);
criterion_main!(benches);
