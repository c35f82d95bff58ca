//! Evolves a laboratory equipment usage plan and prints the best one found.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;
use u_evoplan::ga::{GaConfig, GaRunner, GenerationStats, Selection};
use u_evoplan::lab::LabProblem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SelectionKind {
    /// Two tournaments per generation, child replaces the worst member
    Tournament,
    /// Full brood plus mutants per generation, best members survive
    Truncation,
}

/// Genetic algorithm for laboratory equipment scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation budget
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    generations: u64,

    /// Generations between two progress lines
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    report_interval: u64,

    /// Number of plans in the population
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    population_size: u64,

    /// Plans sampled per tournament (at most the population size)
    #[arg(short = 'k', long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    tournament_size: u64,

    /// Probability of mutating an offspring, in [0, 1]
    #[arg(short, long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Selection scheme
    #[arg(long, value_enum, default_value_t = SelectionKind::Tournament)]
    selection: SelectionKind,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations without improvement (0 disables)
    #[arg(long, default_value_t = 0)]
    stagnation_limit: u64,

    /// Stop as soon as the best fitness reaches this value
    #[arg(long)]
    target_fitness: Option<f64>,

    /// Print debug logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn to_usize(value: u64, name: &str) -> Result<usize> {
    usize::try_from(value).with_context(|| format!("{name} does not fit in usize"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let population_size = to_usize(args.population_size, "population size")?;
    let selection = match args.selection {
        SelectionKind::Tournament => {
            Selection::Tournament(to_usize(args.tournament_size, "tournament size")?)
        }
        SelectionKind::Truncation => Selection::Truncation,
    };

    let config = GaConfig {
        population_size,
        max_generations: to_usize(args.generations, "generation budget")?,
        selection,
        mutation_rate: args.mutation_rate,
        stagnation_limit: to_usize(args.stagnation_limit, "stagnation limit")?,
        target_fitness: args.target_fitness,
        report_interval: Some(to_usize(args.report_interval, "report interval")?),
        seed: args.seed,
    };
    config.validate().context("invalid arguments")?;

    let problem = LabProblem::standard();
    let result = GaRunner::run_reporting(&problem, &config, &mut |stats: &GenerationStats| {
        println!(
            "generation {}: best fitness {:.3}",
            stats.generation, stats.best_fitness
        );
    })
    .context("evolution failed")?;

    println!();
    println!("Best plan found:");
    println!("Total generations: {}", result.generations);
    if let Some(seed) = result.seed {
        println!("Seed: {seed}");
    }
    println!("Final error: {}", result.final_error().round());
    println!("{}", result.best);

    Ok(())
}
