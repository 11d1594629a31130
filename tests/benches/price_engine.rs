//! # Price Engine Benchmarks
//!
//! | Operation | Path |
//! |-----------|------|
//! | `decay_price` | linear interpolation with a U256 intermediate |
//! | `clearing_price` | decay vs demand |
//! | `plan_commitment` | window check, capacity clamp |
//! | `commit` | full service call against in-memory ledgers |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

use auction_tests::harness::{participant, AuctionHarness, E18, SUPPLY, T, WINDOW};
use dutch_auction::domain::{commitments, pricing};
use dutch_auction::prelude::*;
use dutch_auction::{AuctionConfig, AuctionState};

fn reference_config() -> AuctionConfig {
    AuctionConfig {
        auctioned_asset: AssetId::new([0xA1; 20]),
        payment_asset: AssetId::new([0xB2; 20]),
        total_supply: SUPPLY,
        start_time: T,
        end_time: T + WINDOW,
        start_price: 2 * E18,
        floor_price: E18,
        administrator: Address::repeat(0xAD),
        treasury: Address::repeat(0x7E),
        allow_list_enabled: false,
    }
}

// ============================================================================
// PURE PRICING
// ============================================================================

fn bench_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("price-engine");
    group.measurement_time(Duration::from_secs(5));

    let config = reference_config();
    let mut rng = rand::thread_rng();
    let instants: Vec<u64> = (0..1_000).map(|_| T + rng.gen_range(0..=WINDOW)).collect();

    group.throughput(Throughput::Elements(instants.len() as u64));
    group.bench_function("decay_price", |b| {
        b.iter(|| {
            instants
                .iter()
                .map(|now| pricing::decay_price(&config, black_box(*now)))
                .fold(0u128, u128::wrapping_add)
        })
    });

    for committed in [0u128, 500, 1_500] {
        let state = AuctionState {
            commitments_total: committed * E18,
            ..AuctionState::default()
        };
        group.bench_with_input(
            BenchmarkId::new("clearing_price", committed),
            &state,
            |b, state| {
                b.iter(|| {
                    instants
                        .iter()
                        .map(|now| pricing::clearing_price(&config, state, black_box(*now)))
                        .fold(0u128, u128::wrapping_add)
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// COMMITMENT PLANNING
// ============================================================================

fn bench_plan_commitment(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment-planning");

    let config = reference_config();
    let state = AuctionState {
        commitments_total: 1_400 * E18,
        ..AuctionState::default()
    };

    group.bench_function("plan_clamped", |b| {
        b.iter(|| {
            commitments::plan_commitment(
                &config,
                &state,
                black_box(participant(1)),
                black_box(1_000 * E18),
                T + WINDOW / 2,
            )
        })
    });

    group.finish();
}

// ============================================================================
// SERVICE CALLS
// ============================================================================

fn bench_service_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("service");
    group.sample_size(20);

    for participants in [1u8, 16, 64] {
        group.throughput(Throughput::Elements(u64::from(participants)));
        group.bench_with_input(
            BenchmarkId::new("commit_round", participants),
            &participants,
            |b, &participants| {
                b.iter_with_setup(
                    || {
                        let h = AuctionHarness::deploy(participants, ServiceConfig::default())
                            .expect("deploy");
                        h.at(1);
                        h
                    },
                    |h| {
                        for n in 1..=participants {
                            black_box(h.service.commit(participant(n), E18).ok());
                        }
                    },
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pricing, bench_plan_commitment, bench_service_commit);
criterion_main!(benches);
