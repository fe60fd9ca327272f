//! Signal fan-out benchmark suite.
//!
//! Benchmarks synchronous emission at different subscriber counts.
//!
//! Run with: cargo bench --bench signal
//! Results saved to: target/criterion/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use lua_console::Signal;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const SUBSCRIBER_COUNTS: &[usize] = &[1, 8, 64, 256];

// ============================================================================
// Benchmark: Emit Fan-Out
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_emit");

    for &count in SUBSCRIBER_COUNTS {
        group.bench_with_input(BenchmarkId::new("emit", count), &count, |b, &count| {
            let mut signal = Signal::new();
            let mut total = 0u64;
            for _ in 0..count {
                signal.subscribe(move |v: &u64| {
                    total = total.wrapping_add(*v);
                });
            }

            let mut tick = 0u64;
            b.iter(|| {
                tick = tick.wrapping_add(1);
                signal.emit(&tick);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Subscribe + Unsubscribe Churn
// ============================================================================

fn bench_subscription_churn(c: &mut Criterion) {
    c.bench_function("signal_subscribe_unsubscribe", |b| {
        let mut signal: Signal<u64> = Signal::new();
        b.iter(|| {
            let id = signal.subscribe(|_| {});
            signal.unsubscribe(id);
        });
    });
}

criterion_group!(benches, bench_emit, bench_subscription_churn);
criterion_main!(benches);
