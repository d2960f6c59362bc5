use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::InvalidWeights, num::Weight};

/// Tolerance around 1.0 accepted for the sum of a [WeightVector].
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
/// Weights used when a caller does not supply any.
pub const DEFAULT_WEIGHTS: Criteria<f64> = Criteria {
    cost: 0.30,
    coverage: 0.25,
    service: 0.25,
    reliability: 0.20,
};
// Absorbs representation error in sums such as 0.25 + 0.25 + 0.25 + 0.24.
const SUM_EPSILON: f64 = 1e-9;

/// The fixed evaluation dimensions. Every criterion is oriented so that higher is better by the
/// time it reaches the decision matrix.
///
/// Declaration order is also the tie-break priority used when explaining a result: on equal
/// contributions, cost wins over coverage, coverage over service, and service over reliability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Cost,
    Coverage,
    Service,
    Reliability,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Cost,
        Criterion::Coverage,
        Criterion::Service,
        Criterion::Reliability,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Cost => "cost",
            Criterion::Coverage => "coverage",
            Criterion::Service => "service",
            Criterion::Reliability => "reliability",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Criterion {
    type Err = InvalidWeights;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criterion::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| InvalidWeights::UnknownCriterion(s.to_string()))
    }
}

/// One value per [Criterion]. With `T = f64` this is a row of the decision matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria<T> {
    pub cost: T,
    pub coverage: T,
    pub service: T,
    pub reliability: T,
}

/// The four criterion values of one candidate, each oriented so that higher is better.
pub type CriterionVector = Criteria<f64>;

impl<T> Criteria<T> {
    pub fn from_fn<F: FnMut(Criterion) -> T>(mut f: F) -> Self {
        Self {
            cost: f(Criterion::Cost),
            coverage: f(Criterion::Coverage),
            service: f(Criterion::Service),
            reliability: f(Criterion::Reliability),
        }
    }

    pub fn try_from_fn<E, F: FnMut(Criterion) -> Result<T, E>>(mut f: F) -> Result<Self, E> {
        Ok(Self {
            cost: f(Criterion::Cost)?,
            coverage: f(Criterion::Coverage)?,
            service: f(Criterion::Service)?,
            reliability: f(Criterion::Reliability)?,
        })
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Criteria<U> {
        Criteria {
            cost: f(self.cost),
            coverage: f(self.coverage),
            service: f(self.service),
            reliability: f(self.reliability),
        }
    }

    pub fn zip<U>(self, other: Criteria<U>) -> Criteria<(T, U)> {
        Criteria {
            cost: (self.cost, other.cost),
            coverage: (self.coverage, other.coverage),
            service: (self.service, other.service),
            reliability: (self.reliability, other.reliability),
        }
    }

    /// Values paired with their criterion, in [Criterion::ALL] order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &T)> {
        Criterion::ALL.into_iter().map(move |c| (c, &self[c]))
    }
}

impl<T> std::ops::Index<Criterion> for Criteria<T> {
    type Output = T;
    fn index(&self, criterion: Criterion) -> &T {
        match criterion {
            Criterion::Cost => &self.cost,
            Criterion::Coverage => &self.coverage,
            Criterion::Service => &self.service,
            Criterion::Reliability => &self.reliability,
        }
    }
}

impl<T> std::ops::IndexMut<Criterion> for Criteria<T> {
    fn index_mut(&mut self, criterion: Criterion) -> &mut T {
        match criterion {
            Criterion::Cost => &mut self.cost,
            Criterion::Coverage => &mut self.coverage,
            Criterion::Service => &mut self.service,
            Criterion::Reliability => &mut self.reliability,
        }
    }
}

/// Criterion weights. Every weight is in [0, 1] and the four sum to 1 within
/// [WEIGHT_SUM_TOLERANCE]. Input outside of this is rejected, never renormalized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<Criterion, f64>", try_from = "BTreeMap<String, f64>")]
pub struct WeightVector(Criteria<Weight>);

impl WeightVector {
    pub fn new(weights: Criteria<f64>) -> Result<Self, InvalidWeights> {
        let checked = Criteria::try_from_fn(|criterion| {
            let value = weights[criterion];
            Weight::new(value).ok_or(InvalidWeights::OutOfRange { criterion, value })
        })?;
        let sum: f64 = weights.iter().map(|(_, w)| *w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + SUM_EPSILON {
            return Err(InvalidWeights::Sum(sum));
        }
        Ok(Self(checked))
    }

    pub fn get(&self, criterion: Criterion) -> Weight {
        self.0[criterion]
    }

    pub fn as_criteria(&self) -> Criteria<f64> {
        self.0.map(|w| w.as_f64())
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS).expect("default weights are valid")
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightVector {
    type Error = InvalidWeights;
    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut weights: Criteria<Option<f64>> = Criteria::default();
        for (key, value) in map {
            let criterion: Criterion = key.parse()?;
            weights[criterion] = Some(value);
        }
        let weights = Criteria::try_from_fn(|criterion| {
            weights[criterion].ok_or(InvalidWeights::MissingCriterion(criterion))
        })?;
        Self::new(weights)
    }
}

impl From<WeightVector> for BTreeMap<Criterion, f64> {
    fn from(weights: WeightVector) -> Self {
        weights
            .as_criteria()
            .iter()
            .map(|(criterion, &w)| (criterion, w))
            .collect()
    }
}

/// Parses `cost=0.3,coverage=0.25,service=0.25,reliability=0.2`.
impl std::str::FromStr for WeightVector {
    type Err = InvalidWeights;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = BTreeMap::new();
        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| InvalidWeights::Malformed(pair.to_string()))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| InvalidWeights::Malformed(pair.to_string()))?;
            map.insert(key.trim().to_string(), value);
        }
        Self::try_from(map)
    }
}
