//! End-to-end runs of the lab scheduling problem.

use u_evoplan::ga::{GaConfig, GaProblem, GaRunner, GenerationStats, Population, Selection};
use u_evoplan::lab::LabProblem;
use u_evoplan::random::create_rng;

fn config(selection: Selection) -> GaConfig {
    GaConfig::default()
        .with_population_size(30)
        .with_max_generations(400)
        .with_selection(selection)
        .with_report_interval(50)
        .with_seed(20240611)
}

#[test]
fn test_seeded_runs_are_bit_identical() {
    let problem = LabProblem::standard();
    for selection in [Selection::Tournament(3), Selection::Truncation] {
        let config = config(selection);

        let mut first_reports = Vec::new();
        let first = GaRunner::run_reporting(&problem, &config, &mut |s: &GenerationStats| {
            first_reports.push(*s)
        })
        .unwrap();

        let mut second_reports = Vec::new();
        let second = GaRunner::run_reporting(&problem, &config, &mut |s: &GenerationStats| {
            second_reports.push(*s)
        })
        .unwrap();

        assert_eq!(first.best_fitness.to_bits(), second.best_fitness.to_bits());
        assert_eq!(first.best.to_string(), second.best.to_string());
        assert_eq!(first.fitness_history, second.fitness_history);
        assert_eq!(first_reports, second_reports);
        assert_eq!(first_reports.len(), 9);
    }
}

#[test]
fn test_evolution_improves_on_random_plans() {
    let problem = LabProblem::standard();
    let config = config(Selection::Tournament(3));
    let result = GaRunner::run(&problem, &config).unwrap();

    let initial = result.fitness_history[0];
    assert!(
        result.best_fitness >= initial,
        "best {} fell below initial {}",
        result.best_fitness,
        initial
    );
    assert!(
        result.best_fitness > 0.5,
        "expected a conflict-free plan or close to it, got {}",
        result.best_fitness
    );
}

#[test]
fn test_zero_budget_returns_initial_best() {
    let problem = LabProblem::standard();
    let config = GaConfig::default()
        .with_population_size(25)
        .with_max_generations(0)
        .with_seed(77);

    let result = GaRunner::run(&problem, &config).unwrap();

    let mut rng = create_rng(77);
    let initial = Population::random(&problem, 25, &mut rng).unwrap();
    assert_eq!(result.generations, 0);
    assert_eq!(&result.best, initial.top());
}

#[test]
fn test_rendering_ends_with_rounded_fitness() {
    let problem = LabProblem::standard();
    let mut rng = create_rng(5);
    let plan = problem.create_individual(&mut rng);
    let text = plan.to_string();
    let last = text.lines().last().unwrap();
    assert_eq!(last, format!("fitness: {:.3}", u_evoplan::ga::Individual::fitness(&plan)));
    assert_eq!(text.lines().count(), problem.catalog().analyses().len() + 1);
}
