//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → parent selection → crossover → mutation → replacement → repeat.

use super::config::GaConfig;
use super::population::Population;
use super::selection::Selection;
use super::types::{fitness_to_penalty, GaProblem, Individual};
use crate::error::{EvolveError, Result};
use crate::random::{create_rng, random_seed};
use rand::Rng;
use tracing::{debug, info, trace};

/// Snapshot of the population taken when a progress report is due.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generations completed so far (0 = right after initialization).
    pub generation: usize,
    /// Fitness of the current best member.
    pub best_fitness: f64,
    /// Mean fitness over the members.
    pub mean_fitness: f64,
    /// Fitness of the current worst member.
    pub worst_fitness: f64,
    /// Number of members.
    pub size: usize,
}

/// Receives periodic progress snapshots.
///
/// Any `FnMut(&GenerationStats)` closure is a reporter. Reporters only
/// observe: they never see the random source or the population itself.
pub trait Reporter {
    /// Called every `report_interval` generations, including generation 0.
    fn report(&mut self, stats: &GenerationStats);
}

impl<F> Reporter for F
where
    F: FnMut(&GenerationStats),
{
    fn report(&mut self, stats: &GenerationStats) {
        self(stats)
    }
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best member of the final population.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run stopped because the target fitness was reached.
    pub reached_target: bool,

    /// Seed of the random source, when the runner created it.
    pub seed: Option<u64>,

    /// Best fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

impl<I: Individual> GaResult<I> {
    /// Constraint penalty of the best individual, recovered from its fitness.
    pub fn final_error(&self) -> f64 {
        fitness_to_penalty(self.best_fitness)
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:.3}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization without progress reporting.
    ///
    /// # Errors
    /// Any configuration or operator error; see [`run_with_rng`](Self::run_with_rng).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        Self::run_reporting(problem, config, &mut |_: &GenerationStats| {})
    }

    /// Runs the GA, seeding the random source from `config.seed`.
    ///
    /// Without a configured seed a random one is drawn and returned in
    /// [`GaResult::seed`] so the run can be replayed.
    pub fn run_reporting<P, Rep>(
        problem: &P,
        config: &GaConfig,
        reporter: &mut Rep,
    ) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        Rep: Reporter,
    {
        let seed = config.seed.unwrap_or_else(random_seed);
        let mut rng = create_rng(seed);
        let mut result = Self::run_with_rng(problem, config, &mut rng, reporter)?;
        result.seed = Some(seed);
        Ok(result)
    }

    /// Runs the GA with a caller-supplied random source.
    ///
    /// `config.seed` is ignored; the whole run draws from `rng` only, so a
    /// deterministic source makes the run reproducible.
    ///
    /// # Errors
    /// - [`EvolveError::InvalidConfiguration`] if `config` fails validation
    /// - any error returned by [`Individual::crossover`]
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            population_size = config.population_size,
            max_generations = config.max_generations,
            selection = ?config.selection,
        )
    )]
    pub fn run_with_rng<P, R, Rep>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        reporter: &mut Rep,
    ) -> Result<GaResult<P::Individual>>
    where
        P: GaProblem,
        R: Rng,
        Rep: Reporter,
    {
        config.validate()?;

        // 1. Initialize population
        let mut population = Population::random(problem, config.population_size, rng)?;

        let mut best_seen = population.top_fitness();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best_seen);
        info!(best_fitness = best_seen, "initial population created");

        if let Some(every) = config.report_interval {
            report(&population, 0, every, reporter);
        }

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut reached_target = target_reached(config, best_seen);
        let mut generation = 0usize;

        // 2. Evolutionary loop
        while generation < config.max_generations && !reached_target {
            match config.selection {
                Selection::Tournament(k) => {
                    steady_state_step(&mut population, k, config.mutation_rate, rng)?
                }
                Selection::Truncation => {
                    truncation_step(&mut population, config.mutation_rate, rng)?
                }
            }
            generation += 1;

            let current = population.top_fitness();
            if current > best_seen {
                best_seen = current;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            fitness_history.push(current);

            if let Some(every) = config.report_interval {
                report(&population, generation, every, reporter);
            }

            reached_target = target_reached(config, current);

            // Stagnation check
            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        let best = population.top().clone();
        let best_fitness = population.top_fitness();
        info!(
            generations = generation,
            best_fitness, stagnated, reached_target, "evolution finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            generations: generation,
            stagnated,
            reached_target,
            seed: None,
            fitness_history,
        })
    }
}

/// One steady-state generation: two tournaments, one child, worst member out.
fn steady_state_step<I, R>(
    population: &mut Population<I>,
    k: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<()>
where
    I: Individual,
    R: Rng,
{
    let p1 = population.tournament(k, rng)?;
    let p2 = population.tournament(k, rng)?;
    let parent1 = population.get(p1).ok_or(EvolveError::EmptyPopulation)?;
    let parent2 = population.get(p2).ok_or(EvolveError::EmptyPopulation)?;

    let mut child = parent1.crossover(parent2, rng)?;
    if rng.random_bool(mutation_rate) {
        child = child.mutate(rng);
    }

    let evicted = population.replace_worst(child);
    trace!(evicted_fitness = evicted.fitness(), "worst member replaced");
    Ok(())
}

/// One generational step: full brood plus mutants, best `N` survive.
fn truncation_step<I, R>(population: &mut Population<I>, mutation_rate: f64, rng: &mut R) -> Result<()>
where
    I: Individual,
    R: Rng,
{
    let mut children = population.crossover_all(rng)?;
    for child in children.iter_mut() {
        if rng.random_bool(mutation_rate) {
            *child = child.mutate(rng);
        }
    }
    let mutants = population.mutate_all(rng);
    population.select(children.into_iter().chain(mutants));
    Ok(())
}

fn report<I, Rep>(population: &Population<I>, generation: usize, every: usize, reporter: &mut Rep)
where
    I: Individual,
    Rep: Reporter,
{
    if generation % every != 0 {
        return;
    }
    let stats = population.stats(generation);
    debug!(
        generation,
        best_fitness = stats.best_fitness,
        mean_fitness = stats.mean_fitness,
        "progress"
    );
    reporter.report(&stats);
}

fn target_reached(config: &GaConfig, fitness: f64) -> bool {
    config.target_fitness.is_some_and(|target| fitness >= target)
}

// ============================================================================
// Tests
// ============================================================================
