use core::{hint::black_box, time::Duration};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use tokio::runtime::Builder;
use workpool::{KeyedStore, PoolConfig, run_pipeline};

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_store");
    group.throughput(Throughput::Elements(1));

    let store: KeyedStore = KeyedStore::new();
    for i in 0..1024 {
        store.set(format!("key-{i}"), i);
    }

    group.bench_function("get", |b| {
        b.iter(|| black_box(store.get(black_box("key-512"))));
    });

    group.bench_function("set", |b| {
        let mut i = 0_i64;
        b.iter(|| {
            i = i.wrapping_add(1);
            store.set("key-512", black_box(i));
        });
    });

    let shared: Arc<KeyedStore> = Arc::new(KeyedStore::new());
    shared.set("hot", 1);
    group.bench_function("get_contended_4_readers", |b| {
        b.iter(|| {
            std::thread::scope(|s| {
                for _ in 0..4 {
                    s.spawn(|| {
                        for _ in 0..256 {
                            black_box(shared.get("hot"));
                        }
                    });
                }
            });
        });
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let rt = Builder::new_multi_thread()
        .worker_threads(4)
        .enable_time()
        .build()
        .expect("failed to build runtime");

    let mut group = c.benchmark_group("pipeline");

    for &(workers, jobs) in &[(1_usize, 1024_u64), (4, 1024), (16, 1024)] {
        let config = PoolConfig {
            num_workers: workers,
            num_jobs: jobs,
            queue_capacity: 64,
            deadline: Duration::from_secs(60),
            latency: Duration::ZERO,
        };

        group.throughput(Throughput::Elements(jobs));
        group.bench_function(format!("workers/{workers}/jobs/{jobs}"), |b| {
            b.to_async(&rt).iter(|| async {
                let report = run_pipeline(black_box(&config)).await.expect("pipeline failed");
                black_box(report.results.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_store, bench_pipeline);
criterion_main!(benches);
