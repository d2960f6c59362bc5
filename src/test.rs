use proptest::{
    prelude::{prop, Just},
    prop_assert, prop_assert_eq, prop_compose, prop_oneof, proptest,
    strategy::Strategy,
};
use rand::{rngs::SmallRng, seq::SliceRandom as _, SeedableRng as _};

use crate::{
    rank, ranking_order, Candidate, Criteria, CriterionVector, Error, Normalized, WeightVector,
};

#[derive(Clone, Debug)]
pub struct TestCandidate {
    id: usize,
    criteria: CriterionVector,
}

impl TestCandidate {
    pub fn new(id: usize, criteria: CriterionVector) -> Self {
        Self { id, criteria }
    }
}

impl Candidate for TestCandidate {
    type Id = usize;
    fn id(&self) -> Self::Id {
        self.id
    }
    fn criteria(&self) -> CriterionVector {
        self.criteria
    }
}

pub fn criterion_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        1e-3..1e6_f64,
        1e150..1e300_f64,
        Just(f64::MAX),
    ]
}

prop_compose! {
    pub fn criterion_vector()(
        cost in criterion_value(),
        coverage in criterion_value(),
        service in criterion_value(),
        reliability in criterion_value(),
    ) -> CriterionVector {
        Criteria { cost, coverage, service, reliability }
    }
}
prop_compose! {
    fn candidates(max: usize)(rows in prop::collection::vec(criterion_vector(), 1..max)) -> Vec<TestCandidate> {
        rows.into_iter().enumerate().map(|(id, row)| TestCandidate::new(id, row)).collect()
    }
}
prop_compose! {
    fn weights()(parts in prop::collection::vec(0.0..=1.0_f64, 4)) -> WeightVector {
        let total: f64 = parts.iter().sum::<f64>().max(1e-9);
        let mut w = Criteria::from_fn(|c| parts[c as usize] / total);
        // Absorb rounding into one weight so the sum stays within tolerance.
        w.reliability = (1.0 - w.cost - w.coverage - w.service).clamp(0.0, 1.0);
        WeightVector::new(w).unwrap()
    }
}

fn row(cost: f64, coverage: f64, service: f64, reliability: f64) -> CriterionVector {
    Criteria {
        cost,
        coverage,
        service,
        reliability,
    }
}

proptest! {
    #[test]
    fn accepted_weights_are_valid(parts in prop::collection::vec(-0.5..1.5_f64, 4)) {
        let w = Criteria::from_fn(|c| parts[c as usize]);
        let sum: f64 = parts.iter().sum();
        match WeightVector::new(w) {
            Ok(weights) => {
                let w = weights.as_criteria();
                prop_assert!(w.iter().all(|(_, w)| (0.0..=1.0).contains(w)));
                prop_assert!((sum - 1.0).abs() <= 0.01 + 1e-9);
            }
            Err(_) => prop_assert!(
                parts.iter().any(|w| !(0.0..=1.0).contains(w)) || (sum - 1.0).abs() > 0.01
            ),
        }
    }

    #[test]
    fn ranking_invariants(candidates in candidates(32), weights in weights()) {
        let results = rank(&candidates, &weights, candidates.len()).unwrap();
        prop_assert_eq!(results.len(), candidates.len());
        for (i, result) in results.iter().enumerate() {
            prop_assert_eq!(result.rank, i + 1);
            prop_assert!((0.0..=1.0).contains(&result.score.as_f64()));
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].id < pair[1].id, "ties keep input order");
            }
        }
        if candidates.len() == 1 {
            prop_assert_eq!(results[0].score, Normalized::ZERO);
        }
    }

    #[test]
    fn ranking_is_deterministic(candidates in candidates(16), weights in weights()) {
        let a = rank(&candidates, &weights, candidates.len()).unwrap();
        let b = rank(&candidates, &weights, candidates.len()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn top_n_truncates(candidates in candidates(16), top_n in 1..16_usize) {
        let all = rank(&candidates, &WeightVector::default(), candidates.len()).unwrap();
        let top = rank(&candidates, &WeightVector::default(), top_n).unwrap();
        prop_assert_eq!(top.len(), top_n.min(candidates.len()));
        prop_assert_eq!(&all[..top.len()], &top[..]);
    }

    #[test]
    fn scores_do_not_depend_on_input_order(seed: u64, candidates in candidates(16)) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut shuffled = candidates.clone();
        shuffled.shuffle(&mut rng);
        let weights = WeightVector::default();
        let score_of = |results: Vec<crate::RankedResult<usize>>| {
            let mut scores: Vec<(usize, Normalized)> =
                results.into_iter().map(|r| (r.id, r.score)).collect();
            scores.sort_by_key(|(id, _)| *id);
            scores
        };
        let a = score_of(rank(&candidates, &weights, candidates.len()).unwrap());
        let b = score_of(rank(&shuffled, &weights, shuffled.len()).unwrap());
        for ((id_a, score_a), (id_b, score_b)) in a.iter().zip(&b) {
            prop_assert_eq!(id_a, id_b);
            prop_assert!((score_a.as_f64() - score_b.as_f64()).abs() < 1e-9);
        }
    }
}

#[test]
fn ranking_order_is_stable() {
    let scores: Vec<Normalized> = [0.2, 0.9, 0.5, 0.9, 0.2]
        .into_iter()
        .map(|s| Normalized::new(s).unwrap())
        .collect();
    assert_eq!(ranking_order(&scores), vec![1, 3, 2, 0, 4]);
}

#[test]
fn identical_candidates_keep_input_order() {
    let candidates: Vec<TestCandidate> = [4, 2, 9]
        .into_iter()
        .map(|id| TestCandidate::new(id, row(0.001, 20000.0, 0.5, 0.5)))
        .collect();
    let results = rank(&candidates, &WeightVector::default(), 3).unwrap();
    let ids: Vec<usize> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![4, 2, 9]);
    assert!(results.iter().all(|r| r.score == results[0].score));
    let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn empty_input() {
    let candidates: Vec<TestCandidate> = vec![];
    assert_eq!(
        rank(&candidates, &WeightVector::default(), 1),
        Err(Error::EmptyInput)
    );
}

#[test]
fn single_candidate_scores_zero() {
    let candidates = [TestCandidate::new(0, row(0.002, 50000.0, 0.9, 0.9))];
    let results = rank(&candidates, &WeightVector::default(), 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[0].score, Normalized::ZERO);
    assert_eq!(
        results[0].rationale,
        "Offers excellent premium value. Overall score: 0.000"
    );
}

#[test]
fn dominant_candidate_scores_one() {
    let candidates = [
        TestCandidate::new(0, row(1.0, 1.0, 1.0, 1.0)),
        TestCandidate::new(1, row(2.0, 2.0, 2.0, 2.0)),
        TestCandidate::new(2, row(0.5, 1.5, 1.0, 0.0)),
    ];
    let results = rank(&candidates, &WeightVector::default(), 3).unwrap();
    assert_eq!(results[0].id, 1);
    assert_eq!(results[0].score, Normalized::ONE);
}

#[test]
fn huge_values_keep_their_criterion() {
    let candidates = [
        TestCandidate::new(0, row(1.0, 1e200, 1.0, 1.0)),
        TestCandidate::new(1, row(1.0, 3e200, 1.0, 1.0)),
    ];
    let results = rank(&candidates, &WeightVector::default(), 2).unwrap();
    assert_eq!(results[0].id, 1);
    assert_eq!(results[0].score, Normalized::ONE);
    assert_eq!(results[1].score, Normalized::ZERO);
    let sum_sq: f64 = results
        .iter()
        .map(|r| r.components.coverage.normalized.powi(2))
        .sum();
    crate::num::assert_within(sum_sq, 1.0, 1e-12);
}

#[test]
fn components_explain_the_score() {
    let candidates = [
        TestCandidate::new(0, row(3.0, 0.0, 1.0, 1.0)),
        TestCandidate::new(1, row(4.0, 0.0, 1.0, 1.0)),
    ];
    let weights = WeightVector::default();
    let results = rank(&candidates, &weights, 2).unwrap();
    let first = &results[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.components.cost.raw, 4.0);
    crate::num::assert_within(first.components.cost.normalized, 0.8, 1e-12);
    crate::num::assert_within(first.components.cost.weighted, 0.24, 1e-12);
    assert_eq!(first.components.cost.weight, 0.30);
    assert_eq!(first.components.coverage.normalized, 0.0);
    // Only cost differs, so the two candidates are the ideal and anti-ideal solutions.
    assert_eq!(first.score, Normalized::ONE);
    assert_eq!(results[1].score, Normalized::ZERO);
}
