//! Selection strategies for the GA.
//!
//! Selection decides which individuals become parents and which survive.
//! Both strategies here assume **maximization** (higher fitness = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::error::{EvolveError, Result};
use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy driving one generation.
///
/// # Examples
///
/// ```
/// use u_evoplan::ga::Selection;
///
/// // Steady state: two 3-way tournaments, child replaces the worst member
/// let sel = Selection::Tournament(3);
///
/// // Generational: offspring and mutants merged, best N survive
/// let sel = Selection::Truncation;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: sample `k` distinct individuals, keep the best.
    ///
    /// Each generation runs two tournaments, crosses the winners and puts
    /// the child in place of the worst member.
    /// - k=1: no selection pressure
    /// - k=2-3: light to moderate pressure (typical default)
    /// - k close to the population size: the best member almost always wins
    ///
    /// # Complexity
    /// O(k) per tournament
    Tournament(usize),

    /// Elitist truncation selection.
    ///
    /// Each generation breeds a full brood of children plus a mutated copy
    /// of every member, ranks the union with the current members and keeps
    /// the best `N`.
    ///
    /// # Complexity
    /// O(n log n) per generation (sort)
    Truncation,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

/// Runs one `k`-way tournament over `fitnesses` and returns the winner's index.
///
/// The `k` contestants are drawn without replacement. Ties go to the
/// contestant drawn first.
///
/// # Errors
/// [`EvolveError::InvalidConfiguration`] if `k == 0` or `k > fitnesses.len()`.
pub fn tournament<R: Rng>(fitnesses: &[f64], k: usize, rng: &mut R) -> Result<usize> {
    let n = fitnesses.len();
    if n == 0 {
        return Err(EvolveError::EmptyPopulation);
    }
    if k == 0 || k > n {
        return Err(EvolveError::invalid(format!(
            "tournament size {k} must be in 1..={n}"
        )));
    }

    let mut contestants = index::sample(rng, n, k).into_iter();
    let mut best = contestants.next().ok_or(EvolveError::EmptyPopulation)?;
    for idx in contestants {
        if fitnesses[idx] > fitnesses[best] {
            best = idx;
        }
    }
    Ok(best)
}

/// Descending comparison of two fitness values.
pub(crate) fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_tournament_favors_best() {
        let fits = [0.1, 0.5, 0.9, 0.2];
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            let idx = tournament(&fits, 2, &mut rng).unwrap();
            counts[idx] += 1;
        }
        // Index 2 wins whenever it is drawn: P = 1 - C(3,2)/C(4,2) = 0.5
        let best_count = counts[2];
        assert!(
            best_count > 4500,
            "expected best to win about half of the tournaments, got {best_count}/{n}"
        );
        // Index 0 never wins a 2-way tournament
        assert_eq!(counts[0], 0, "worst member must never win: {counts:?}");
    }

    #[test]
    fn test_full_tournament_always_picks_best() {
        let fits = [0.3, 0.8, 0.1, 0.7];
        let mut rng = create_rng(7);
        for _ in 0..200 {
            assert_eq!(tournament(&fits, 4, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let fits = [0.1, 0.5, 0.9, 0.2];
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[tournament(&fits, 1, &mut rng).unwrap()] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_tournament_rejects_bad_size() {
        let fits = [0.5, 0.6];
        let mut rng = create_rng(1);
        assert!(matches!(
            tournament(&fits, 0, &mut rng),
            Err(EvolveError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            tournament(&fits, 3, &mut rng),
            Err(EvolveError::InvalidConfiguration(_))
        ));
        assert_eq!(
            tournament(&[], 1, &mut rng),
            Err(EvolveError::EmptyPopulation)
        );
    }

    #[test]
    fn test_compare_desc_orders_best_first() {
        let mut fits = vec![0.5, 0.9, 0.1, 0.7];
        fits.sort_by(|a, b| compare_desc(*a, *b));
        assert_eq!(fits, vec![0.9, 0.7, 0.5, 0.1]);
        assert_eq!(compare_desc(0.3, 0.3), Ordering::Equal);
        assert_eq!(compare_desc(f64::NAN, 0.3), Ordering::Equal);
    }
}
