use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, Criterion};
use tpool::ThreadPool;

const THREADS: u32 = 4;
const JOBS: usize = 200;

fn spawn_wait_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_wait");

    group.bench_function("tpool", |b| {
        b.iter_batched(
            || ThreadPool::new(THREADS).unwrap(),
            |pool| {
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..JOBS {
                    let counter = Arc::clone(&counter);
                    pool.spawn(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                }
                pool.wait();
                assert_eq!(counter.load(Ordering::SeqCst), JOBS);
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("rayon", |b| {
        b.iter_batched(
            || {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(THREADS as usize)
                    .build()
                    .unwrap()
            },
            |pool| {
                let counter = Arc::new(AtomicUsize::new(0));
                for _ in 0..JOBS {
                    let counter = Arc::clone(&counter);
                    pool.spawn(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                }
                // rayon has no drain primitive; spin until the count settles.
                while counter.load(Ordering::SeqCst) < JOBS {
                    thread::yield_now();
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("thread_per_job", |b| {
        b.iter(|| {
            let counter = Arc::new(AtomicUsize::new(0));
            let handles: Vec<_> = (0..JOBS)
                .map(|_| {
                    let counter = Arc::clone(&counter);
                    thread::spawn(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(counter.load(Ordering::SeqCst), JOBS);
        });
    });

    group.finish();
}

criterion_group!(benches, spawn_wait_bench);
criterion_main!(benches);
