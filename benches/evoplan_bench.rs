//! Criterion benchmarks for u-evoplan.
//!
//! Measures plan evaluation, the population operators and short complete
//! runs on the reference laboratory.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evoplan::ga::{GaConfig, GaProblem, GaRunner, Individual, Population, Selection};
use u_evoplan::lab::LabProblem;
use u_evoplan::random::create_rng;

fn bench_fitness(c: &mut Criterion) {
    let problem = LabProblem::standard();
    let mut rng = create_rng(42);
    let plan = problem.create_individual(&mut rng);

    c.bench_function("plan_fitness", |b| b.iter(|| black_box(&plan).fitness()));
}

fn bench_operators(c: &mut Criterion) {
    let problem = LabProblem::standard();
    let mut group = c.benchmark_group("population_ops");

    for size in [50, 200] {
        let mut rng = create_rng(7);
        let population = Population::random(&problem, size, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("crossover_all", size), &size, |b, _| {
            let mut rng = create_rng(1);
            b.iter(|| population.crossover_all(&mut rng).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("select", size), &size, |b, _| {
            let mut rng = create_rng(2);
            let extra = population.mutate_all(&mut rng);
            b.iter(|| {
                let mut pop = population.clone();
                pop.select(extra.clone());
                black_box(pop.top_fitness())
            })
        });
    }
    group.finish();
}

fn bench_runs(c: &mut Criterion) {
    let problem = LabProblem::standard();
    let mut group = c.benchmark_group("lab_run");
    group.sample_size(20);

    for (name, selection) in [
        ("tournament", Selection::Tournament(3)),
        ("truncation", Selection::Truncation),
    ] {
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(200)
            .with_selection(selection)
            .with_seed(42);

        group.bench_function(name, |b| {
            b.iter(|| GaRunner::run(black_box(&problem), &config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitness, bench_operators, bench_runs);
criterion_main!(benches);
