use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lloyd_kmeans::{k_means_with, par_k_means_with, ExecutionPolicy, Plus, SquaredEuclidean, L1};
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use std::time::Duration;

fn vector_points(n_samples: usize, n_features: usize) -> Vec<Array1<f32>> {
    let data = Array2::random((n_samples, n_features), Uniform::new(-1.0f32, 1.0));
    data.outer_iter().map(|row| row.to_owned()).collect()
}

fn benchmark_vectors_varying_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_vectors_samples");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_features = 32;
    let k = 16;
    let max_iters = 5;
    let sample_sizes = [1_000, 5_000, 10_000];

    for n_samples in sample_sizes.iter() {
        let points = vector_points(*n_samples, n_features);
        let initial: Vec<Array1<f32>> = points[..k].to_vec();
        let zero = Array1::<f32>::zeros(n_features);

        group.throughput(Throughput::Elements(*n_samples as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential", n_samples),
            n_samples,
            |b, _| {
                b.iter(|| {
                    let mut centroids = initial.clone();
                    k_means_with(
                        black_box(&points),
                        &mut centroids,
                        max_iters,
                        &SquaredEuclidean,
                        &Plus,
                        zero.clone(),
                    )
                });
            },
        );
        group.bench_with_input(BenchmarkId::new("parallel", n_samples), n_samples, |b, _| {
            b.iter(|| {
                let mut centroids = initial.clone();
                par_k_means_with(
                    &ExecutionPolicy::Parallel,
                    black_box(&points),
                    &mut centroids,
                    max_iters,
                    &SquaredEuclidean,
                    &Plus,
                    zero.clone(),
                )
            });
        });
    }
    group.finish();
}

fn benchmark_scalars_varying_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_scalars_clusters");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_samples = 50_000;
    let points = Array1::random(n_samples, Uniform::new(0.0f64, 1_000.0)).to_vec();
    let cluster_counts = [4, 16, 64];

    for k in cluster_counts.iter() {
        let initial: Vec<f64> = points[..*k].to_vec();

        group.throughput(Throughput::Elements(*k as u64));
        group.bench_with_input(BenchmarkId::new("sequential", k), k, |b, _| {
            b.iter(|| {
                let mut centroids = initial.clone();
                k_means_with(black_box(&points), &mut centroids, 10, &L1, &Plus, 0.0)
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", k), k, |b, _| {
            b.iter(|| {
                let mut centroids = initial.clone();
                par_k_means_with(
                    &ExecutionPolicy::Parallel,
                    black_box(&points),
                    &mut centroids,
                    10,
                    &L1,
                    &Plus,
                    0.0,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_vectors_varying_samples,
    benchmark_scalars_varying_clusters
);
criterion_main!(benches);
