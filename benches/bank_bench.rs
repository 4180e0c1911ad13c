//! Benchmarks for the banking pipeline stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tcp_bank::bank::wager::SPOTS;
use tcp_bank::bank::{BankrollSettlement, SimulationConfig, Simulator, WagerEngine};
use tcp_bank::poker::{HandDealer, HandEvaluator, RankTable};

const ROUNDS: usize = 10_000;
const PLAYERS: usize = 5;

fn rank_table_build_benchmark(c: &mut Criterion) {
    c.bench_function("rank_table_build", |b| b.iter(|| black_box(RankTable::build().len())));
}

fn evaluate_batch_benchmark(c: &mut Criterion) {
    let cards = HandDealer::new(PLAYERS, 42).deal_vec(ROUNDS);
    let evaluator = HandEvaluator::shared();
    let mut values = vec![0; ROUNDS * (PLAYERS + 1)];

    c.bench_function("evaluate_60k_hands", |b| {
        b.iter(|| {
            evaluator.evaluate_batch(black_box(&cards), &mut values).unwrap();
            black_box(values[0])
        })
    });
}

fn resolve_batch_benchmark(c: &mut Criterion) {
    let cards = HandDealer::new(PLAYERS, 42).deal_vec(ROUNDS);
    let mut values = vec![0; ROUNDS * (PLAYERS + 1)];
    HandEvaluator::shared().evaluate_batch(&cards, &mut values).unwrap();
    let engine = WagerEngine::new();
    let mut out = vec![0; ROUNDS * PLAYERS * SPOTS];

    c.bench_function("resolve_10k_rounds", |b| {
        b.iter(|| {
            engine.resolve_batch(black_box(&cards), &values, PLAYERS, &mut out).unwrap();
            black_box(out[0])
        })
    });
}

fn settle_batch_benchmark(c: &mut Criterion) {
    let spots = PLAYERS * SPOTS;
    let payouts: Vec<i64> = (0..ROUNDS * spots).map(|i| ((i * 7919) % 41) as i64 * 20 - 400).collect();
    let settlement = BankrollSettlement::new(5_000);
    let mut out = vec![0; payouts.len()];

    c.bench_function("settle_10k_rounds", |b| {
        b.iter(|| {
            settlement.settle_batch(black_box(&payouts), spots, &mut out);
            black_box(out[0])
        })
    });
}

fn full_run_benchmark(c: &mut Criterion) {
    let config = SimulationConfig::default().with_rounds(ROUNDS).with_seed(42);
    let simulator = Simulator::new(config).unwrap();

    c.bench_function("simulate_10k_rounds", |b| {
        b.iter(|| black_box(simulator.run().unwrap().round_totals().len()))
    });
}

criterion_group!(
    benches,
    rank_table_build_benchmark,
    evaluate_batch_benchmark,
    resolve_batch_benchmark,
    settle_batch_benchmark,
    full_run_benchmark
);
criterion_main!(benches);
