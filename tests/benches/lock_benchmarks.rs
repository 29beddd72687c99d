//! # Authority Lock Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | config parse | decode a configuration cell of N identities |
//! | signing message | stream a large trailing witness through the hasher |
//! | block production | full validation, secp256k1 and ed25519 |
//! | configuration change | full validation with threshold signatures |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use poa_lock::{AuthorityConfig, InMemoryTransaction, SinceValue};
use poa_tests::fixtures::*;
use std::time::Duration;

fn bench_config_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("config-parse");
    for count in [1usize, 16, 255] {
        let data = AggregatorSet::ed25519(
            count,
            RoundParams {
                change_threshold: 1,
                ..RoundParams::default()
            },
        )
        .config_data();
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| black_box(AuthorityConfig::parse(data).is_ok()))
        });
    }
    group.finish();
}

fn bench_signing_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing-message");
    let set = AggregatorSet::secp256k1(3, RoundParams::default());
    for size in [0usize, 64 * 1024, 1024 * 1024] {
        let tx = InMemoryTransaction::builder(lock_args())
            .cell_dep(config_cell(set.config_data()))
            .group_input(
                state_cell(&state(1000, 1000, 0, 0)),
                SinceValue::absolute_timestamp(1050).0,
            )
            .group_output(state_cell(&state(1000, 1050, 1, 0)))
            .witness(vec![])
            .witness(vec![0x5A; size])
            .build();
        let tx = sign_lock(tx, &[set.signer(0)]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("extra_witness", size), &tx, |b, tx| {
            b.iter(|| black_box(validate(tx.clone()).is_ok()))
        });
    }
    group.finish();
}

fn bench_block_production(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-production");
    group.measurement_time(Duration::from_secs(10));

    let sets = [
        ("secp256k1", AggregatorSet::secp256k1(3, RoundParams::default())),
        ("ed25519", AggregatorSet::ed25519(3, RoundParams::default())),
    ];
    for (name, set) in &sets {
        let tx = sign_lock(
            block_transaction(
                set.config_data(),
                &state(1000, 1050, 1, 0),
                &state(1100, 1100, 0, 1),
                SinceValue::absolute_timestamp(1100),
            ),
            &[set.signer(1)],
        );
        group.bench_function(*name, |b| b.iter(|| black_box(validate(tx.clone()).is_ok())));
    }
    group.finish();
}

fn bench_configuration_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration-change");
    for threshold in [1u8, 4, 16] {
        let set = AggregatorSet::secp256k1(
            16,
            RoundParams {
                change_threshold: threshold,
                ..RoundParams::default()
            },
        );
        let signers: Vec<usize> = (0..threshold as usize).collect();
        let tx = sign_lock(
            config_change_transaction(set.config_data(), set.config_data()),
            &set.signers_at(&signers),
        );
        group.throughput(Throughput::Elements(threshold as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threshold), &tx, |b, tx| {
            b.iter(|| black_box(validate(tx.clone()).is_ok()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_config_parse,
    bench_signing_message,
    bench_block_production,
    bench_configuration_change
);
criterion_main!(benches);
