pub mod criteria;
pub mod error;
pub mod ideal;
pub mod matrix;
pub mod num;
pub mod rationale;
#[cfg(test)]
mod test;

use serde::Serialize;

pub use crate::criteria::{Criteria, Criterion, CriterionVector, WeightVector};
pub use crate::error::{Error, InvalidWeights};
pub use crate::num::{Normalized, Weight};
use crate::{
    ideal::IdealSolutions,
    matrix::{apply_weights, normalize, DecisionMatrix},
};

pub trait Candidate {
    type Id: Clone;
    fn id(&self) -> Self::Id;
    /// Criterion values oriented so that higher is better on every criterion.
    fn criteria(&self) -> CriterionVector;
}

/// How one criterion contributed to a candidate's score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComponentScore {
    pub raw: f64,
    pub normalized: f64,
    pub weighted: f64,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedResult<Id> {
    pub id: Id,
    pub score: Normalized,
    /// 1-based position in the output.
    pub rank: usize,
    pub components: Criteria<ComponentScore>,
    pub rationale: String,
}

/// Rank `candidates` using [TOPSIS](https://en.wikipedia.org/wiki/TOPSIS) and return up to `top_n`
/// results ordered by descending score. TOPSIS has the following properties:
/// - A candidate's score is its relative closeness to the ideal solution (the best weighted value
///   on every criterion across the batch) versus the anti-ideal solution (the worst), so scores
///   are only comparable within one call.
/// - Criteria are rescaled by their L2 norm across the batch, so the magnitude of raw values on
///   one criterion does not drown out the others.
///
/// Candidates with equal scores keep their input order, and ranks are contiguous starting at 1.
/// A single candidate always scores 0. `top_n` is not clamped: callers wanting at least one result
/// must pass a value in `[1, candidates.len()]`.
pub fn rank<C>(
    candidates: &[C],
    weights: &WeightVector,
    top_n: usize,
) -> Result<Vec<RankedResult<C::Id>>, Error>
where
    C: Candidate,
{
    let matrix = DecisionMatrix::build(candidates)?;
    let normalized = normalize(matrix.rows());
    let weighted = apply_weights(&normalized, weights);
    let solutions = IdealSolutions::from_weighted(&weighted).ok_or(Error::EmptyInput)?;
    let scores: Vec<Normalized> = weighted
        .iter()
        .map(|row| solutions.separation(row).closeness())
        .collect();

    let results: Vec<RankedResult<C::Id>> = ranking_order(&scores)
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(position, index)| {
            let components = Criteria::from_fn(|c| ComponentScore {
                raw: matrix.rows()[index][c],
                normalized: normalized[index][c],
                weighted: weighted[index][c],
                weight: weights.get(c).as_f64(),
            });
            let score = scores[index];
            RankedResult {
                id: matrix.ids()[index].clone(),
                score,
                rank: position + 1,
                rationale: rationale::rationale(&components, score),
                components,
            }
        })
        .collect();

    tracing::debug!(
        candidates = matrix.len(),
        returned = results.len(),
        "ranked candidates"
    );
    Ok(results)
}

/// Row indices ordered by descending score. The sort is stable, so equal scores keep their
/// relative input order.
pub fn ranking_order(scores: &[Normalized]) -> Vec<usize> {
    let sort = permutation::sort_by_key(scores, |score: &Normalized| std::cmp::Reverse(*score));
    sort.apply_slice((0..scores.len()).collect::<Vec<usize>>())
}
