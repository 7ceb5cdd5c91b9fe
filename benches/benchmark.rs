use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, SamplingMode};
use dense_linear_assignment::labeling::KuhnMunkresSolver;
use dense_linear_assignment::rescan::RescanSolver;
use dense_linear_assignment::MatchingSolver;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::Beta;

type UInt = u32;

fn gen_uniform_input<Solver: MatchingSolver<UInt, Solver>>(
    solver: &mut Solver,
    seed: u64,
    size: UInt,
    min_value: f64,
    max_value: f64,
) {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let between = Uniform::from(min_value..max_value);

    solver.init(size).unwrap();
    for i in 0..size {
        let row: Vec<f64> = (0..size).map(|_| between.sample(&mut val_rng)).collect();
        solver.push_row(i, row.as_slice()).unwrap();
    }
}

fn gen_beta_input<Solver: MatchingSolver<UInt, Solver>>(
    solver: &mut Solver,
    seed: u64,
    size: UInt,
    min_value: f64,
    range_width: f64,
) {
    let mut val_rng = ChaCha8Rng::seed_from_u64(seed);
    let beta = Beta::new(3.0, 3.0).unwrap();

    solver.init(size).unwrap();
    for i in 0..size {
        let row: Vec<f64> = (0..size)
            .map(|_| (range_width * beta.sample(&mut val_rng) + min_value).floor())
            .collect();
        solver.push_row(i, row.as_slice()).unwrap();
    }
}

fn bench_uniform_weights_by_size(c: &mut Criterion, max_size: UInt) {
    let mut group = c.benchmark_group("dense_uniform_weights");
    let (mut labeling_solver, labeling_solution) =
        KuhnMunkresSolver::new(max_size as usize);
    let (mut rescan_solver, rescan_solution) = RescanSolver::new(max_size as usize);
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    let mut size = 16;
    while size <= max_size {
        gen_uniform_input(&mut labeling_solver, size as u64, size, 500.0, 1000.0);
        group.throughput(Throughput::Elements((size as u64).pow(2)));
        let benchmark_id = BenchmarkId::new("labeling", format!("size {}", size));
        let input = (labeling_solver.clone(), labeling_solution.clone());

        group.bench_with_input(benchmark_id, &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |(mut solver, mut solution)| {
                    solver.solve(&mut solution, true).unwrap();
                },
                BatchSize::LargeInput,
            );
        });

        gen_uniform_input(&mut rescan_solver, size as u64, size, 500.0, 1000.0);
        group.throughput(Throughput::Elements((size as u64).pow(2)));
        let benchmark_id = BenchmarkId::new("rescan", format!("size {}", size));
        let input = (rescan_solver.clone(), rescan_solution.clone());

        group.bench_with_input(benchmark_id, &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |(mut solver, mut solution)| {
                    solver.solve(&mut solution, true).unwrap();
                },
                BatchSize::LargeInput,
            );
        });
        size *= 2;
    }
    group.finish();
}

fn bench_beta_weights_minimizing(c: &mut Criterion, max_size: UInt) {
    // rounded beta-distributed weights produce many ties, the worst case for
    // the alternating-tree search
    let mut group = c.benchmark_group("dense_beta_weights_min");
    let (mut labeling_solver, labeling_solution) =
        KuhnMunkresSolver::new(max_size as usize);
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    let mut size = 16;
    while size <= max_size {
        gen_beta_input(&mut labeling_solver, size as u64, size, 300.0, 700.0);
        group.throughput(Throughput::Elements((size as u64).pow(2)));
        let benchmark_id = BenchmarkId::new("labeling", format!("size {}", size));
        let input = (labeling_solver.clone(), labeling_solution.clone());

        group.bench_with_input(benchmark_id, &input, |b, input| {
            b.iter_batched(
                || input.clone(),
                |(mut solver, mut solution)| {
                    solver.solve(&mut solution, false).unwrap();
                },
                BatchSize::LargeInput,
            );
        });
        size *= 2;
    }
    group.finish();
}

fn bench_uniform_weights_to_256(c: &mut Criterion) {
    bench_uniform_weights_by_size(c, 256)
}

fn bench_beta_weights_to_512(c: &mut Criterion) {
    bench_beta_weights_minimizing(c, 512)
}

criterion_group!(
    benches,
    bench_uniform_weights_to_256,
    bench_beta_weights_to_512
);
criterion_main!(benches);
