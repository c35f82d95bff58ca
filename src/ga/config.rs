//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;
use crate::error::{EvolveError, Result};

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, selection strategy, mutation probability,
/// termination conditions, reporting and seeding.
///
/// # Defaults
///
/// ```
/// use u_evoplan::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evoplan::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_mutation_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Generation budget. Zero returns the initial best unchanged.
    pub max_generations: usize,

    /// Selection strategy, which also fixes the shape of a generation.
    pub selection: Selection,

    /// Probability of mutating an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of generations without improvement of the best fitness
    /// before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination (the default).
    pub stagnation_limit: usize,

    /// Stop as soon as the best fitness reaches this value.
    ///
    /// `None` disables target-based termination (the default).
    pub target_fitness: Option<f64>,

    /// Generations between two progress reports.
    ///
    /// `None` disables reporting.
    pub report_interval: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a random seed; the seed actually used is reported in
    /// the result.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 1000,
            selection: Selection::default(),
            mutation_rate: 0.1,
            stagnation_limit: 0,
            target_fitness: None,
            report_interval: None,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the target fitness.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the reporting interval in generations.
    pub fn with_report_interval(mut self, every: usize) -> Self {
        self.report_interval = Some(every);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`EvolveError::InvalidConfiguration`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EvolveError::invalid("population_size must be at least 1"));
        }
        match self.selection {
            Selection::Tournament(k) => {
                if k == 0 {
                    return Err(EvolveError::invalid("tournament size must be at least 1"));
                }
                if k > self.population_size {
                    return Err(EvolveError::invalid(format!(
                        "tournament size {k} exceeds population_size {}",
                        self.population_size
                    )));
                }
            }
            Selection::Truncation => {
                if self.population_size < 2 {
                    return Err(EvolveError::invalid(
                        "truncation selection needs population_size of at least 2",
                    ));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolveError::invalid("mutation_rate must be in [0, 1]"));
        }
        if let Some(target) = self.target_fitness {
            if !(target > 0.0 && target <= 1.0) {
                return Err(EvolveError::invalid("target_fitness must be in (0, 1]"));
            }
        }
        if self.report_interval == Some(0) {
            return Err(EvolveError::invalid("report_interval must be positive or None"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 1000);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 0);
        assert!(config.target_fitness.is_none());
        assert!(config.report_interval.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_max_generations(300)
            .with_selection(Selection::Truncation)
            .with_mutation_rate(0.05)
            .with_stagnation_limit(25)
            .with_target_fitness(1.0)
            .with_report_interval(10)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 300);
        assert_eq!(config.selection, Selection::Truncation);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.stagnation_limit, 25);
        assert_eq!(config.target_fitness, Some(1.0));
        assert_eq!(config.report_interval, Some(10));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_generations_allowed() {
        let config = GaConfig::default().with_max_generations(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_population() {
        let config = GaConfig::default().with_population_size(0);
        assert!(matches!(
            config.validate(),
            Err(EvolveError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_tournament_bounds() {
        let config = GaConfig::default()
            .with_population_size(4)
            .with_tournament_size(5);
        assert!(config.validate().is_err());

        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());

        let config = GaConfig::default()
            .with_population_size(4)
            .with_tournament_size(4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_member_tournament_ok() {
        let config = GaConfig::default()
            .with_population_size(1)
            .with_tournament_size(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_truncation_needs_two() {
        let config = GaConfig::default()
            .with_population_size(1)
            .with_selection(Selection::Truncation);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_mutation_rate() {
        let config = GaConfig::default().with_mutation_rate(2.0);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        let config = GaConfig::default().with_mutation_rate(-0.5);
        assert!((config.mutation_rate - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_raw_mutation_rate() {
        let mut config = GaConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
        config.mutation_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_target_fitness() {
        assert!(GaConfig::default().with_target_fitness(0.0).validate().is_err());
        assert!(GaConfig::default().with_target_fitness(1.5).validate().is_err());
        assert!(GaConfig::default().with_target_fitness(0.5).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_report_interval() {
        let config = GaConfig::default().with_report_interval(0);
        assert!(config.validate().is_err());
    }
}
