use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::distr::{Distribution, Uniform};
use rand::{rngs::StdRng, SeedableRng};
use single_biplot::{center, compute_biplot_with_kind, logcenter, BiplotKind};
use std::time::Duration;

#[derive(Clone)]
pub struct BiplotBenchConfig {
    seed: u64,
    matrix_sizes: Vec<(usize, usize)>,
    measurement_time: u64,
    sample_size: usize,
}

impl Default for BiplotBenchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            matrix_sizes: vec![(22, 6), (100, 20), (1000, 50), (5000, 200)],
            measurement_time: 10,
            sample_size: 10,
        }
    }
}

fn create_test_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let value_dist = Uniform::try_from(0.01..1.0).unwrap();
    Array2::from_shape_fn((rows, cols), |_| value_dist.sample(&mut rng))
}

fn configure_group<'a, M: Measurement>(
    c: &'a mut Criterion<M>,
    name: &str,
    config: &BiplotBenchConfig,
) -> BenchmarkGroup<'a, M> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(config.measurement_time));
    group.sample_size(config.sample_size);
    group
}

pub fn bench_preprocessing(c: &mut Criterion) {
    let config = BiplotBenchConfig::default();
    let mut group = configure_group(c, "Biplot_Preprocessing", &config);

    for &(rows, cols) in config.matrix_sizes.iter() {
        let seed = config.seed + (rows * cols) as u64;
        let matrix = create_test_matrix(rows, cols, seed);

        group.bench_with_input(
            BenchmarkId::new("center", format!("{}x{}", rows, cols)),
            &(rows, cols),
            |b, _| {
                b.iter(|| center(matrix.view()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("logcenter", format!("{}x{}", rows, cols)),
            &(rows, cols),
            |b, _| {
                b.iter(|| logcenter(matrix.view()).unwrap());
            },
        );
    }
    group.finish();
}

pub fn bench_biplot_kinds(c: &mut Criterion) {
    let config = BiplotBenchConfig::default();
    let mut group = configure_group(c, "Biplot_Kinds", &config);

    for &(rows, cols) in config.matrix_sizes.iter() {
        let seed = config.seed + (rows * cols) as u64;
        let matrix = create_test_matrix(rows, cols, seed);

        for kind in BiplotKind::ALL {
            group.bench_with_input(
                BenchmarkId::new(kind.name(), format!("{}x{}", rows, cols)),
                &(rows, cols),
                |b, _| {
                    b.iter(|| compute_biplot_with_kind(matrix.view(), kind, 2).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(biplot_benches, bench_preprocessing, bench_biplot_kinds);
criterion_main!(biplot_benches);
