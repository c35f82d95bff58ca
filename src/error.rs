//! Error types for the evolution engine.
//!
//! Every fallible operation in the crate returns [`EvolveError`]. None of
//! the variants are transient: each one describes a programming or
//! configuration mistake and is surfaced immediately.

use thiserror::Error;

/// Errors raised by the GA engine and the bundled problem instances.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolveError {
    /// Crossover between individuals that do not share the same decision units.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An operation that needs members was invoked on an empty population.
    #[error("population is empty")]
    EmptyPopulation,

    /// A parameter or data set failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The population holds fewer members than the operation needs.
    #[error("operation requires at least {required} members, population has {available}")]
    TooFewMembers { required: usize, available: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EvolveError>;

impl EvolveError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EvolveError::InvalidConfiguration(msg.into())
    }
}
