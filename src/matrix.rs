use crate::{
    criteria::{Criteria, Criterion, CriterionVector, WeightVector},
    Candidate, Error,
};

/// Criterion vectors of a batch of candidates, one row per candidate in input order, with the
/// candidate ids index-aligned to the rows.
#[derive(Clone, Debug)]
pub struct DecisionMatrix<Id> {
    ids: Vec<Id>,
    rows: Vec<CriterionVector>,
}

impl<Id> DecisionMatrix<Id> {
    pub fn build<C>(candidates: &[C]) -> Result<Self, Error>
    where
        C: Candidate<Id = Id>,
    {
        if candidates.is_empty() {
            return Err(Error::EmptyInput);
        }
        let ids = candidates.iter().map(|c| c.id()).collect();
        let rows = candidates
            .iter()
            .enumerate()
            .map(|(index, c)| finite_or_zero(index, c.criteria()))
            .collect();
        Ok(Self { ids, rows })
    }

    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    pub fn rows(&self) -> &[CriterionVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn finite_or_zero(index: usize, original: CriterionVector) -> CriterionVector {
    let mut row = original;
    for (criterion, &value) in original.iter() {
        if !value.is_finite() {
            tracing::warn!(row = index, %criterion, value, "non-finite criterion value treated as 0");
            row[criterion] = 0.0;
        }
    }
    row
}

/// The L2 norm of one column, as `(scale, norm)` where `scale` is the largest magnitude in the
/// column and `norm` is the L2 norm of the column divided by `scale`. Squaring scaled values
/// keeps the sum finite for any finite input.
fn scaled_column_norm(rows: &[CriterionVector], c: Criterion) -> (f64, f64) {
    let scale = rows.iter().map(|row| row[c].abs()).fold(0.0, f64::max);
    if scale == 0.0 {
        return (0.0, 0.0);
    }
    let norm = rows
        .iter()
        .map(|row| (row[c] / scale).powi(2))
        .sum::<f64>()
        .sqrt();
    (scale, norm)
}

/// Vector normalization: each column is divided by its L2 norm. A column with a norm of 0 (every
/// row is 0 on that criterion) normalizes to 0 rather than NaN.
pub fn normalize(rows: &[CriterionVector]) -> Vec<CriterionVector> {
    let norms = Criteria::from_fn(|c| scaled_column_norm(rows, c));
    rows.iter()
        .map(|row| {
            Criteria::from_fn(|c| match norms[c] {
                (scale, norm) if scale > 0.0 => (row[c] / scale) / norm,
                _ => 0.0,
            })
        })
        .collect()
}

pub fn apply_weights(rows: &[CriterionVector], weights: &WeightVector) -> Vec<CriterionVector> {
    let weights = weights.as_criteria();
    rows.iter()
        .map(|row| Criteria::from_fn(|c| row[c] * weights[c]))
        .collect()
}
