use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hdwatch_sdk::{DiagnosticStatus, Level, SharedState, StalenessPolicy};
use tokio::time::Instant;

fn populated_state(aspects: usize, disks: usize, now: Instant) -> SharedState {
    let state = SharedState::default();

    for a in 0..aspects {
        let name = format!("robot1 aspect-{}", a);
        let slot = state.register(&name);

        let mut status = DiagnosticStatus::builder(&name)
            .level(Level::Ok)
            .message("OK")
            .text("Disk Space Reading", "OK");
        for n in 1..=disks {
            status = status
                .text(format!("Disk {} Name", n), format!("/dev/sd{}", n))
                .number(format!("Disk {} Available", n), 120.0)
                .number(format!("Disk {} Size", n), 458.0)
                .text(format!("Disk {} Status", n), "OK")
                .text(format!("Disk {} Mount Point", n), "/home");
        }

        state.store(slot, status.build(), now);
    }

    state
}

/// Benchmark collect() with overlay for a growing number of aspects
fn bench_collect_varying_aspects(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_varying_aspects");
    let policy = StalenessPolicy::default();

    for aspect_count in [1, 2, 5, 10, 50].iter() {
        let updated = Instant::now();
        let state = populated_state(*aspect_count, 4, updated);
        let now = updated + Duration::from_secs(25);

        group.bench_with_input(
            BenchmarkId::from_parameter(aspect_count),
            aspect_count,
            |b, _| {
                b.iter(|| {
                    black_box(state.collect(now, &policy));
                });
            },
        );
    }
    group.finish();
}

/// Benchmark collect() with a single aspect and varying disk counts
fn bench_collect_varying_disks(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_varying_disks");
    let policy = StalenessPolicy::default();

    for disk_count in [1, 4, 16, 64].iter() {
        let now = Instant::now();
        let state = populated_state(1, *disk_count, now);

        group.bench_with_input(BenchmarkId::from_parameter(disk_count), disk_count, |b, _| {
            b.iter(|| {
                black_box(state.collect(now, &policy));
            });
        });
    }
    group.finish();
}

/// Benchmark serializing a collected message the way the file output does
fn bench_serialize_message(c: &mut Criterion) {
    let now = Instant::now();
    let message = populated_state(2, 8, now).collect(now, &StalenessPolicy::default());

    c.bench_function("serialize_pretty_json", |b| {
        b.iter(|| black_box(serde_json::to_string_pretty(&message).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_collect_varying_aspects,
    bench_collect_varying_disks,
    bench_serialize_message
);
criterion_main!(benches);
