use bucketmap::config::Config;
use bucketmap::{create_table, insert, lookup};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;

const ITER: u64 = 32 * 1024;

fn task_concurrent_insert(config: Config) {
    let table = create_table(ITER as usize, num_cpus::get(), config);
    (0..ITER).into_par_iter().for_each(|i| insert(&table, i, i));
}

fn concurrent_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucketmap/concurrent_insert");
    group.throughput(Throughput::Elements(ITER));
    let max = num_cpus::get();

    for variant in [Config::striped(), Config::lock_free()] {
        for threads in (1..=max).filter(|t| *t == 1 || *t % 4 == 0) {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", variant.variant), threads),
                &threads,
                |bencher, &threads| {
                    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
                    pool.install(|| bencher.iter(|| task_concurrent_insert(variant)));
                },
            );
        }
    }

    group.finish();
}

fn task_lookup_already_inserted(table: &bucketmap::Table) {
    (0..ITER).into_par_iter().for_each(|i| {
        lookup(table, i);
    });
}

fn lookup_already_inserted(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucketmap/lookup_hit");
    group.throughput(Throughput::Elements(ITER));
    let max = num_cpus::get();

    for variant in [Config::striped(), Config::lock_free()] {
        let table = create_table(ITER as usize, max, variant.with_resize_enabled(false));
        for i in 0..ITER {
            insert(&table, i, i);
        }

        for threads in (1..=max).filter(|t| *t == 1 || *t % 4 == 0) {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", variant.variant), threads),
                &threads,
                |bencher, &threads| {
                    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
                    pool.install(|| bencher.iter(|| task_lookup_already_inserted(&table)));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, concurrent_insert, lookup_already_inserted);
criterion_main!(benches);
