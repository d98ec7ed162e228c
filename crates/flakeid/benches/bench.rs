use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    BasicSnowflakeGenerator, LockSnowflakeGenerator, MonotonicClock, Poll, SnowflakeGenerator,
    SystemClock, TWITTER_EPOCH_MILLIS, TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond of sequence space.
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id() {
                        Ok(Poll::Ready { id }) => {
                            black_box(id);
                        }
                        Ok(Poll::Pending { .. }) | Err(_) => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators against a real clock, waiting out exhausted
/// milliseconds.
fn bench_generator_yield<G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().expect("clock moved backwards"));
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one lock generator shared by every core.
fn bench_lock_contended(c: &mut Criterion) {
    let threads = num_cpus::get();
    let mut group = c.benchmark_group("lock/contended");
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let mut total = std::time::Duration::ZERO;

            for _ in 0..iters {
                let generator = LockSnowflakeGenerator::new(0, 0, MonotonicClock::new())
                    .expect("valid identity");
                let barrier = Arc::new(Barrier::new(threads + 1));

                let elapsed = scope(|s| {
                    for _ in 0..threads {
                        let generator = generator.clone();
                        let barrier = Arc::clone(&barrier);
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().expect("clock moved backwards"));
                            }
                        });
                    }

                    barrier.wait();
                    let start = Instant::now();
                    // `scope` joins the workers before returning.
                    start
                })
                .elapsed();

                total += elapsed;
            }

            total
        });
    });

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    let mock = || FixedMockTime {
        millis: TWITTER_EPOCH_MILLIS + 1,
    };

    bench_generator(c, "basic/fixed", || {
        BasicSnowflakeGenerator::new(0, 0, mock()).expect("valid identity")
    });
    bench_generator(c, "lock/fixed", || {
        LockSnowflakeGenerator::new(0, 0, mock()).expect("valid identity")
    });

    bench_generator_yield(c, "basic/system_clock", || {
        BasicSnowflakeGenerator::new(0, 0, SystemClock).expect("valid identity")
    });
    bench_generator_yield(c, "basic/monotonic_clock", || {
        BasicSnowflakeGenerator::new(0, 0, MonotonicClock::new()).expect("valid identity")
    });
    bench_generator_yield(c, "lock/monotonic_clock", || {
        LockSnowflakeGenerator::new(0, 0, MonotonicClock::new()).expect("valid identity")
    });

    bench_lock_contended(c);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
