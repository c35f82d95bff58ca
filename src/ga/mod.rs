//! Genetic Algorithm framework.
//!
//! A generic, domain-agnostic GA engine built on trait-based abstractions.
//! A problem plugs in by implementing [`Individual`] (fitness, mutation,
//! crossover) and [`GaProblem`] (random initialization).
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution that scores and recombines itself
//! - [`GaProblem`]: Creates random individuals for the initial population
//!
//! # Key Types
//!
//! - [`Population`]: Owned, fixed-capacity working set with truncation selection
//! - [`GaConfig`]: Algorithm parameters (population size, selection, budget)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final optimization result with statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
//! - Whitley (1989), "The GENITOR Algorithm and Selection Pressure"

mod config;
mod population;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use population::Population;
pub use runner::{GaResult, GaRunner, GenerationStats, Reporter};
pub use selection::{tournament, Selection};
pub use types::{fitness_to_penalty, penalty_to_fitness, GaProblem, Individual};
