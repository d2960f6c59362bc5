use serde::Serialize;

use crate::{
    criteria::{Criteria, CriterionVector},
    Normalized,
};

/// The best and worst attainable weighted value on each criterion across one batch. Every
/// criterion is a benefit criterion by this stage, so the ideal is always the column maximum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IdealSolutions {
    pub ideal: CriterionVector,
    pub anti_ideal: CriterionVector,
}

impl IdealSolutions {
    /// Returns `None` when `weighted` has no rows.
    pub fn from_weighted(weighted: &[CriterionVector]) -> Option<Self> {
        let (first, rest) = weighted.split_first()?;
        let (ideal, anti_ideal) = rest.iter().fold((*first, *first), |(max, min), row| {
            (
                Criteria::from_fn(|c| max[c].max(row[c])),
                Criteria::from_fn(|c| min[c].min(row[c])),
            )
        });
        Some(Self { ideal, anti_ideal })
    }

    /// Distances of `row` to the ideal and anti-ideal solutions.
    pub fn separation(&self, row: &CriterionVector) -> Separation {
        Separation {
            ideal: euclidean_distance(row, &self.ideal),
            anti_ideal: euclidean_distance(row, &self.anti_ideal),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separation {
    pub ideal: f64,
    pub anti_ideal: f64,
}

impl Separation {
    /// Relative closeness to the ideal solution: `anti_ideal / (ideal + anti_ideal)`.
    ///
    /// When both distances are 0 the candidate is simultaneously the ideal and anti-ideal on every
    /// criterion, which is always the case for a batch of one. The score is then 0, not 1: a lone
    /// candidate is not ranked as best.
    pub fn closeness(&self) -> Normalized {
        let denominator = self.ideal + self.anti_ideal;
        if denominator.is_nan() || denominator <= 0.0 {
            return Normalized::ZERO;
        }
        Normalized::clamp(self.anti_ideal / denominator, 0.0, 1.0).unwrap_or(Normalized::ZERO)
    }
}

pub fn euclidean_distance(a: &CriterionVector, b: &CriterionVector) -> f64 {
    a.zip(*b)
        .iter()
        .map(|(_, (a, b))| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}
