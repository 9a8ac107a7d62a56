//! Ledger buy/sell performance benchmarks.
//!
//! Run with: cargo bench -p fifoledger-core

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fifoledger_core::Ledger;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::hint::black_box;

/// Generate a ledger with N lots of 10 units each.
fn generate_ledger(num_lots: usize) -> Ledger {
    let mut ledger = Ledger::new("STOCK");
    for i in 0..num_lots {
        ledger
            .buy(dec!(10), dec!(100.00) + Decimal::from(i as i64))
            .unwrap();
    }
    ledger
}

fn bench_ledger_buy(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_buy");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(generate_ledger(size)));
        });
    }

    group.finish();
}

fn bench_ledger_sell_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_sell_all");

    for size in [10, 100, 1000] {
        let ledger = generate_ledger(size);
        let everything = ledger.total_quantity();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut ledger = ledger.clone();
                black_box(ledger.sell(everything).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_ledger_average_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_average_cost");

    for size in [10, 100, 1000] {
        let ledger = generate_ledger(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(ledger.average_cost()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ledger_buy,
    bench_ledger_sell_all,
    bench_ledger_average_cost
);
criterion_main!(benches);
