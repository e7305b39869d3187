//! Roster editing benchmarks for roster_core.
//!
//! Run with: `cargo bench -p roster_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roster_core::config::RosterConfig;
use roster_core::loadout::effective_loadout;
use roster_core::roster::Roster;
use roster_core::rules::aggregate_rules;
use roster_test_utils::fixtures::{roster_with, sample_book};

fn large_roster() -> Roster {
    let book = sample_book();
    let units: Vec<&str> = ["squad", "captain", "scouts", "medic", "tank"]
        .iter()
        .copied()
        .cycle()
        .take(60)
        .collect();
    let (mut roster, ids) = roster_with(&book, &units);
    for chunk in ids.chunks(5) {
        let _ = roster.join_unit(&chunk[1], &chunk[0]);
        let _ = roster.join_unit(&chunk[3], &chunk[2]);
        let _ = roster.apply_upgrade(&book, &chunk[0], "sergeant_weapon", "plasma_rifle");
        let _ = roster.apply_upgrade(&book, &chunk[0], "gear", "medkit");
        for _ in 0..3 {
            let _ = roster.apply_upgrade(&book, &chunk[0], "squad_weapons", "grenade_launcher");
        }
    }
    roster
}

/// Runs roster benchmarks for the roster_core crate.
pub fn roster_benchmark(c: &mut Criterion) {
    let book = sample_book();
    let config = RosterConfig::default();
    let roster = large_roster();

    c.bench_function("roster_points", |b| b.iter(|| black_box(&roster).points()));

    c.bench_function("root_groups", |b| {
        b.iter(|| black_box(&roster).root_groups(&config).len())
    });

    c.bench_function("unit_derivations", |b| {
        b.iter(|| {
            for unit in black_box(&roster).units() {
                black_box(effective_loadout(unit));
                black_box(aggregate_rules(unit));
            }
        })
    });

    c.bench_function("apply_radio_swap", |b| {
        let mut roster = roster.clone();
        let id = roster.units()[0].selection_id.clone();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let option = if flip { "melta_rifle" } else { "plasma_rifle" };
            roster.apply_upgrade(&book, &id, "sergeant_weapon", option)
        })
    });

    c.bench_function("duplicate_group", |b| {
        b.iter_batched(
            || roster.clone(),
            |mut roster| {
                let host = roster.units()[0].selection_id.clone();
                roster.duplicate_group(&host)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, roster_benchmark);
criterion_main!(benches);
