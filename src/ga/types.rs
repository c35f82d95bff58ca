//! Core trait definitions for the GA framework.
//!
//! The two central traits, [`Individual`] and [`GaProblem`], define the
//! contract between the generic GA engine and domain-specific problem
//! implementations.

use crate::error::Result;
use rand::Rng;

/// A candidate solution in the GA population.
///
/// Individuals are values: [`mutate`](Individual::mutate) and
/// [`crossover`](Individual::crossover) never touch `self`, they always
/// build a fresh individual. Fitness is **maximized** and is expected to
/// lie in `(0, 1]` (see [`penalty_to_fitness`]).
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Bits(Vec<bool>);
///
/// impl Individual for Bits {
///     fn fitness(&self) -> f64 {
///         let misses = self.0.iter().filter(|b| !**b).count();
///         penalty_to_fitness(misses as f64)
///     }
///
///     fn mutate<R: Rng>(&self, rng: &mut R) -> Self {
///         let mut bits = self.0.clone();
///         let i = rng.random_range(0..bits.len());
///         bits[i] = !bits[i];
///         Bits(bits)
///     }
///
///     fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self> {
///         let bits = self.0.iter().zip(&other.0)
///             .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
///             .collect();
///         Ok(Bits(bits))
///     }
/// }
/// ```
pub trait Individual: Clone {
    /// Returns the fitness of this individual. Higher is better.
    ///
    /// Must be a pure function of the individual's state: the population
    /// caches the value and never asks twice.
    fn fitness(&self) -> f64;

    /// Returns a copy of `self` with one randomized local perturbation.
    ///
    /// The result must stay structurally valid.
    fn mutate<R: Rng>(&self, rng: &mut R) -> Self;

    /// Recombines `self` with `other` into one child.
    ///
    /// # Errors
    /// [`EvolveError::ShapeMismatch`](crate::EvolveError::ShapeMismatch)
    /// when the parents do not share the same decision units.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Result<Self>;
}

/// Defines how a problem seeds its initial population.
///
/// The individual itself carries the evolutionary operators; the problem
/// only knows how to produce a random, valid starting point.
pub trait GaProblem {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual.
    ///
    /// Called `population_size` times when a run starts.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;
}

/// Normalizes a non-negative constraint penalty into a fitness in `(0, 1]`.
///
/// A penalty of zero maps to `1.0`; the score decreases monotonically as
/// the penalty grows.
pub fn penalty_to_fitness(penalty: f64) -> f64 {
    1.0 / (1.0 + penalty.max(0.0))
}

/// Recovers the penalty from a fitness produced by [`penalty_to_fitness`].
pub fn fitness_to_penalty(fitness: f64) -> f64 {
    if fitness <= 0.0 {
        return f64::INFINITY;
    }
    (1.0 / fitness - 1.0).max(0.0)
}
