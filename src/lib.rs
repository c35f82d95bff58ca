//! Generic evolutionary search with a laboratory scheduling problem.
//!
//! - **Genetic Algorithm (GA)**: a domain-agnostic engine. Problems plug in
//!   through the [`ga::Individual`] trait (fitness, mutation, crossover)
//!   and the [`ga::GaProblem`] factory. Runs are steady state (tournament
//!   parents, child replaces the worst member) or generational (elitist
//!   truncation).
//! - **Lab scheduling**: [`lab::EquipmentPlan`] assigns analyses to
//!   instrument slots under daily caps and synchronization constraints.
//!
//! # Example
//!
//! ```
//! use u_evoplan::ga::{GaConfig, GaRunner};
//! use u_evoplan::lab::LabProblem;
//!
//! let problem = LabProblem::standard();
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_max_generations(200)
//!     .with_seed(42);
//!
//! let result = GaRunner::run(&problem, &config).unwrap();
//! assert!(result.best_fitness > 0.0 && result.best_fitness <= 1.0);
//! ```
//!
//! # Randomness
//!
//! Every run draws from one generator passed by `&mut` into each
//! operation; seed it with [`random::create_rng`] to replay a run.

pub mod error;
pub mod ga;
pub mod lab;
pub mod random;

pub use error::{EvolveError, Result};
