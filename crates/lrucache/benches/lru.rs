use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use lrucache::{LruCache, SharedLruCache};

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for i in 0..100u64 {
            cache.put(i, vec![b'x'; 1024]);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.bench_function("get_hit_shared", |b| {
        let cache = SharedLruCache::new(1000).unwrap();
        for i in 0..100u64 {
            cache.put(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 100)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for i in 0..100u64 {
            cache.put(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.get(&(counter % 100)));
            } else {
                cache.put(counter, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_evicting_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("evicting_put");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_at_capacity", |b| {
        let mut cache = LruCache::new(10).unwrap(); // Small cache
        for i in 0..10u64 {
            cache.put(i, i);
        }

        // Every key is new, so every put evicts
        let mut counter = 10u64;
        b.iter(|| {
            cache.put(black_box(counter), counter);
            counter += 1;
        });
    });

    group.bench_function("get_miss", |b| {
        let mut cache = LruCache::new(10).unwrap();
        for i in 0..100u64 {
            cache.put(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 90)));
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_get,
    bench_mixed_50_50,
    bench_evicting_put
);
criterion_main!(benches);
