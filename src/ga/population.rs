//! Population container.
//!
//! [`Population`] owns the current working set of individuals together
//! with their cached fitness. Every operation that produces new
//! individuals returns them to the caller; only [`Population::select`] and
//! [`Population::replace_worst`] change the member list.

use super::runner::GenerationStats;
use super::selection::{compare_desc, tournament};
use super::types::{GaProblem, Individual};
use crate::error::{EvolveError, Result};
use rand::seq::index;
use rand::Rng;

/// A member together with its cached fitness.
#[derive(Debug, Clone)]
struct Member<I> {
    individual: I,
    fitness: f64,
}

impl<I: Individual> Member<I> {
    fn new(individual: I) -> Self {
        let fitness = individual.fitness();
        Self {
            individual,
            fitness,
        }
    }
}

/// An ordered, owned collection of individuals with a target size `N`.
///
/// The population is never empty: construction rejects an empty member
/// list and no operation can remove the last member.
#[derive(Debug, Clone)]
pub struct Population<I: Individual> {
    members: Vec<Member<I>>,
    capacity: usize,
}

impl<I: Individual> Population<I> {
    /// Wraps `individuals` into a population of target size `capacity`.
    ///
    /// The members are kept as given, in order; the first call to
    /// [`select`](Self::select) brings them down to `capacity`.
    ///
    /// # Errors
    /// - [`EvolveError::InvalidConfiguration`] if `capacity == 0`
    /// - [`EvolveError::EmptyPopulation`] if `individuals` is empty
    pub fn new(individuals: Vec<I>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(EvolveError::invalid("population capacity must be at least 1"));
        }
        if individuals.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        Ok(Self {
            members: individuals.into_iter().map(Member::new).collect(),
            capacity,
        })
    }

    /// Creates `capacity` random individuals from `problem`.
    pub fn random<P, R>(problem: &P, capacity: usize, rng: &mut R) -> Result<Self>
    where
        P: GaProblem<Individual = I>,
        R: Rng,
    {
        let individuals = (0..capacity)
            .map(|_| problem.create_individual(rng))
            .collect();
        Self::new(individuals, capacity)
    }

    /// Number of members currently held.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Target size `N`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the members in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &I> + '_ {
        self.members.iter().map(|m| &m.individual)
    }

    /// Cached fitness of every member, in member order.
    pub fn fitnesses(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.fitness).collect()
    }

    /// Returns the member at `idx`, if any.
    pub(crate) fn get(&self, idx: usize) -> Option<&I> {
        self.members.get(idx).map(|m| &m.individual)
    }

    /// Consumes the population and returns its members in order.
    pub fn into_individuals(self) -> Vec<I> {
        self.members.into_iter().map(|m| m.individual).collect()
    }

    /// Elitist truncation selection.
    ///
    /// Merges the current members with `extra`, ranks the union by fitness
    /// (best first, stable: current members precede `extra` on ties) and
    /// keeps the first `N`. Fewer than `N` candidates are all kept.
    pub fn select<E>(&mut self, extra: E)
    where
        E: IntoIterator<Item = I>,
    {
        let mut pool = std::mem::take(&mut self.members);
        pool.extend(extra.into_iter().map(Member::new));
        // sort_by is stable
        pool.sort_by(|a, b| compare_desc(a.fitness, b.fitness));
        pool.truncate(self.capacity);
        self.members = pool;
    }

    /// Breeds `N` children, each from two distinct random parents.
    ///
    /// Parents of one child are drawn uniformly without replacement; each
    /// child is sampled independently.
    ///
    /// # Errors
    /// - [`EvolveError::TooFewMembers`] with fewer than two members
    /// - any error returned by [`Individual::crossover`]
    pub fn crossover_all<R: Rng>(&self, rng: &mut R) -> Result<Vec<I>> {
        let n = self.members.len();
        if n < 2 {
            return Err(EvolveError::TooFewMembers {
                required: 2,
                available: n,
            });
        }

        let mut children = Vec::with_capacity(self.capacity);
        for _ in 0..self.capacity {
            let pair = index::sample(rng, n, 2);
            let parent1 = &self.members[pair.index(0)].individual;
            let parent2 = &self.members[pair.index(1)].individual;
            children.push(parent1.crossover(parent2, rng)?);
        }
        Ok(children)
    }

    /// Returns a mutated copy of every member, in member order.
    ///
    /// The population itself is left untouched.
    pub fn mutate_all<R: Rng>(&self, rng: &mut R) -> Vec<I> {
        self.members
            .iter()
            .map(|m| m.individual.mutate(rng))
            .collect()
    }

    /// Picks one parent by `k`-way tournament and returns its index.
    pub fn tournament<R: Rng>(&self, k: usize, rng: &mut R) -> Result<usize> {
        let fitnesses = self.fitnesses();
        tournament(&fitnesses, k, rng)
    }

    /// The highest-fitness member (the first one on ties).
    pub fn top(&self) -> &I {
        &self.members[self.top_index()].individual
    }

    /// Fitness of [`top`](Self::top).
    pub fn top_fitness(&self) -> f64 {
        self.members[self.top_index()].fitness
    }

    fn top_index(&self) -> usize {
        let mut best = 0;
        for (i, m) in self.members.iter().enumerate().skip(1) {
            if m.fitness > self.members[best].fitness {
                best = i;
            }
        }
        best
    }

    /// Index of the lowest-fitness member (the first one on ties).
    pub fn worst_index(&self) -> usize {
        let mut worst = 0;
        for (i, m) in self.members.iter().enumerate().skip(1) {
            if m.fitness < self.members[worst].fitness {
                worst = i;
            }
        }
        worst
    }

    /// Puts `child` in place of the worst member and returns the evicted one.
    pub fn replace_worst(&mut self, child: I) -> I {
        let idx = self.worst_index();
        std::mem::replace(&mut self.members[idx], Member::new(child)).individual
    }

    /// Summary statistics of the current members.
    pub fn stats(&self, generation: usize) -> GenerationStats {
        let n = self.members.len() as f64;
        let sum: f64 = self.members.iter().map(|m| m.fitness).sum();
        GenerationStats {
            generation,
            best_fitness: self.top_fitness(),
            mean_fitness: sum / n,
            worst_fitness: self.members[self.worst_index()].fitness,
            size: self.members.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    /// Individual with a fixed fitness and a label used to trace lineage.
    #[derive(Clone, Debug, PartialEq)]
    struct Fixed {
        label: u32,
        fit: f64,
    }

    impl Individual for Fixed {
        fn fitness(&self) -> f64 {
            self.fit
        }

        fn mutate<R: Rng>(&self, _rng: &mut R) -> Self {
            Fixed {
                label: self.label + 1000,
                fit: self.fit / 2.0,
            }
        }

        fn crossover<R: Rng>(&self, other: &Self, _rng: &mut R) -> Result<Self> {
            if self.label == other.label {
                return Err(EvolveError::ShapeMismatch("same label".into()));
            }
            Ok(Fixed {
                label: self.label * 100 + other.label,
                fit: (self.fit + other.fit) / 2.0,
            })
        }
    }

    fn fixed(label: u32, fit: f64) -> Fixed {
        Fixed { label, fit }
    }

    fn make_population(fitnesses: &[f64]) -> Population<Fixed> {
        let members = fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| fixed(i as u32 + 1, f))
            .collect();
        Population::new(members, fitnesses.len()).unwrap()
    }

    #[test]
    fn test_select_with_extra_offspring() {
        let mut pop = make_population(&[0.9, 0.5, 0.3, 0.1]);
        pop.select(vec![fixed(9, 0.7)]);

        assert_eq!(pop.len(), 4);
        assert_eq!(pop.fitnesses(), vec![0.9, 0.7, 0.5, 0.3]);
        let labels: Vec<u32> = pop.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec![1, 9, 2, 3]);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut pop = make_population(&[0.2, 0.8, 0.5, 0.8, 0.1]);
        pop.select(Vec::new());
        let first: Vec<Fixed> = pop.iter().cloned().collect();
        pop.select(Vec::new());
        let second: Vec<Fixed> = pop.iter().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_stable_tie_break() {
        let mut pop = make_population(&[0.5, 0.5]);
        pop.select(vec![fixed(7, 0.5)]);
        let labels: Vec<u32> = pop.iter().map(|i| i.label).collect();
        assert_eq!(labels, vec![1, 2]);
    }

    #[test]
    fn test_select_keeps_all_when_short() {
        let mut pop = Population::new(vec![fixed(1, 0.4)], 5).unwrap();
        pop.select(vec![fixed(2, 0.6), fixed(3, 0.2)]);
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.top().label, 2);
    }

    #[test]
    fn test_select_top_is_best_candidate() {
        let mut pop = make_population(&[0.3, 0.4, 0.2]);
        pop.select(vec![fixed(8, 0.95), fixed(9, 0.05)]);
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.top().label, 8);
        assert!((pop.top_fitness() - 0.95).abs() < 1e-15);
    }

    #[test]
    fn test_new_rejects_empty_and_zero_capacity() {
        assert_eq!(
            Population::<Fixed>::new(Vec::new(), 3).unwrap_err(),
            EvolveError::EmptyPopulation
        );
        assert!(matches!(
            Population::new(vec![fixed(1, 0.5)], 0),
            Err(EvolveError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_crossover_all_uses_distinct_parents() {
        let pop = make_population(&[0.9, 0.5, 0.3, 0.1]);
        let mut rng = create_rng(42);
        // Fixed::crossover fails on identical labels, so any self-pairing
        // would surface as an error.
        for _ in 0..50 {
            let children = pop.crossover_all(&mut rng).unwrap();
            assert_eq!(children.len(), 4);
            for child in &children {
                let (a, b) = (child.label / 100, child.label % 100);
                assert_ne!(a, b);
                assert!((1..=4).contains(&a) && (1..=4).contains(&b));
            }
        }
    }

    #[test]
    fn test_crossover_all_needs_two_members() {
        let pop = Population::new(vec![fixed(1, 0.5)], 4).unwrap();
        let mut rng = create_rng(1);
        assert_eq!(
            pop.crossover_all(&mut rng).unwrap_err(),
            EvolveError::TooFewMembers {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_mutate_all_leaves_population_untouched() {
        let pop = make_population(&[0.8, 0.4]);
        let mut rng = create_rng(1);
        let mutants = pop.mutate_all(&mut rng);
        assert_eq!(mutants, vec![fixed(1001, 0.4), fixed(1002, 0.2)]);
        assert_eq!(pop.fitnesses(), vec![0.8, 0.4]);
    }

    #[test]
    fn test_replace_worst() {
        let mut pop = make_population(&[0.6, 0.1, 0.9, 0.1]);
        let evicted = pop.replace_worst(fixed(7, 0.5));
        assert_eq!(evicted.label, 2);
        assert_eq!(pop.fitnesses(), vec![0.6, 0.5, 0.9, 0.1]);
        assert_eq!(pop.worst_index(), 3);
    }

    #[test]
    fn test_top_first_on_ties() {
        let pop = make_population(&[0.3, 0.7, 0.7]);
        assert_eq!(pop.top().label, 2);
        assert!((pop.top_fitness() - 0.7).abs() < 1e-15);
    }

    #[test]
    fn test_tournament_full_size_returns_top() {
        let pop = make_population(&[0.3, 0.7, 0.2]);
        let mut rng = create_rng(3);
        assert_eq!(pop.tournament(3, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_stats() {
        let pop = make_population(&[0.2, 0.4, 0.6]);
        let stats = pop.stats(5);
        assert_eq!(stats.generation, 5);
        assert_eq!(stats.size, 3);
        assert!((stats.best_fitness - 0.6).abs() < 1e-15);
        assert!((stats.worst_fitness - 0.2).abs() < 1e-15);
        assert!((stats.mean_fitness - 0.4).abs() < 1e-12);
    }
}
