//! Errors raised by a ranking call. Both kinds are terminal: nothing inside the engine is
//! transient, so callers should surface them rather than retry.

use thiserror::Error;

use crate::criteria::Criterion;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid weights: {0}")]
    InvalidWeights(#[from] InvalidWeights),

    /// Ranking is undefined for an empty set of candidates.
    #[error("no candidates to rank")]
    EmptyInput,
}

/// Reasons a [WeightVector](crate::WeightVector) is rejected at construction.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InvalidWeights {
    #[error("missing weight for criterion `{0}`")]
    MissingCriterion(Criterion),

    #[error("unknown criterion `{0}` (expected cost, coverage, service, reliability)")]
    UnknownCriterion(String),

    #[error("weight for `{criterion}` must be in [0, 1], got {value}")]
    OutOfRange { criterion: Criterion, value: f64 },

    #[error("weights must sum to 1.0 (+-0.01), got {0}")]
    Sum(f64),

    #[error("malformed weight `{0}` (expected <criterion>=<value>)")]
    Malformed(String),
}
