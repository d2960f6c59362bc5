mod recommend;

use serde::{Deserialize, Serialize};

pub use crate::recommend::{
    clamp_top_n, recommend, recommend_from, Metadata, PlanScore, Recommendation,
    RecommendationRequest, RecommendError, Settings,
};
pub use topsis_selection::{
    ComponentScore, Criteria, Criterion, CriterionVector, Error, InvalidWeights, Normalized,
    WeightVector,
};

/// Assumed when a plan has no claim turnaround signal.
pub const DEFAULT_CLAIM_TAT_DAYS: i64 = 30;
pub const DEFAULT_CLAIM_APPROVAL_RATE_PCT: f64 = 50.0;
pub const DEFAULT_CSAT_SCORE: f64 = 50.0;
pub const DEFAULT_RENEWAL_RATE_PCT: f64 = 50.0;
pub const DEFAULT_COMPLAINT_RATIO: f64 = 0.5;
/// Reported for plans whose source gave no usable confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// An insurance plan offered for comparison, as supplied by whatever loaded it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    #[serde(alias = "_id")]
    pub plan_id: String,
    pub insurer_name: Option<String>,
    pub plan_name: Option<String>,
    pub premium_annual: Option<f64>,
    pub coverage_idv: Option<f64>,
    pub signals: Option<Signals>,
    /// How far the record's source can be trusted, in [0, 1].
    pub confidence: Option<f64>,
}

/// Service quality signals for a plan. Any of them may be unknown.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub claim_tat_days: Option<i64>,
    pub claim_approval_rate_pct: Option<f64>,
    pub csat_score: Option<f64>,
    pub renewal_rate_pct: Option<f64>,
    pub complaint_ratio: Option<f64>,
}

/// Anything that can supply a batch of plans to rank: a database query, a scraper, a file.
pub trait PlanSource {
    type Error;
    fn plans(&self) -> Result<Vec<InsurancePlan>, Self::Error>;
}

impl PlanSource for [InsurancePlan] {
    type Error = std::convert::Infallible;
    fn plans(&self) -> Result<Vec<InsurancePlan>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl PlanSource for Vec<InsurancePlan> {
    type Error = std::convert::Infallible;
    fn plans(&self) -> Result<Vec<InsurancePlan>, Self::Error> {
        Ok(self.clone())
    }
}

impl InsurancePlan {
    /// The record's confidence, or [DEFAULT_CONFIDENCE] when it is absent or outside [0, 1].
    pub fn confidence(&self) -> f64 {
        match self.confidence {
            Some(confidence) if (0.0..=1.0).contains(&confidence) => confidence,
            Some(confidence) => {
                tracing::warn!(plan = %self.plan_id, confidence, "ignoring out of range confidence");
                DEFAULT_CONFIDENCE
            }
            None => DEFAULT_CONFIDENCE,
        }
    }

    /// Fraction of the premium, coverage, and five signal fields that are present.
    pub fn data_completeness(&self) -> Normalized {
        let signals = self.signals.as_ref();
        let checklist = [
            self.premium_annual.is_some(),
            self.coverage_idv.is_some(),
            signals.and_then(|s| s.claim_tat_days).is_some(),
            signals.and_then(|s| s.claim_approval_rate_pct).is_some(),
            signals.and_then(|s| s.csat_score).is_some(),
            signals.and_then(|s| s.renewal_rate_pct).is_some(),
            signals.and_then(|s| s.complaint_ratio).is_some(),
        ];
        let present = checklist.iter().filter(|p| **p).count();
        Normalized::new(present as f64 / checklist.len() as f64).unwrap_or(Normalized::ZERO)
    }
}

impl topsis_selection::Candidate for InsurancePlan {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.plan_id.clone()
    }

    fn criteria(&self) -> CriterionVector {
        let no_signals = Signals::default();
        let signals = self.signals.as_ref().unwrap_or(&no_signals);
        Criteria {
            cost: score_cost(self.premium_annual.unwrap_or(0.0)),
            coverage: score_coverage(self.coverage_idv),
            service: score_service(signals),
            reliability: score_reliability(signals),
        }
    }
}

/// Lower premiums are better, so the premium is inverted. A premium that is not positive scores
/// the worst possible value rather than being rejected. The inverse of a subnormal premium would
/// overflow, so it saturates at `f64::MAX`.
pub fn score_cost(premium_annual: f64) -> f64 {
    if premium_annual > 0.0 {
        premium_annual.recip().min(f64::MAX)
    } else {
        0.0
    }
}

/// The insured declared value, as is.
pub fn score_coverage(coverage_idv: Option<f64>) -> f64 {
    coverage_idv.unwrap_or(0.0)
}

/// Blend of claim speed (40%), claim approval rate (30%), and customer satisfaction (30%).
pub fn score_service(signals: &Signals) -> f64 {
    let claim_tat_days = signals.claim_tat_days.unwrap_or(DEFAULT_CLAIM_TAT_DAYS);
    let claim_speed = if claim_tat_days > 0 {
        (claim_tat_days as f64).recip()
    } else {
        0.0
    };
    let approval_rate = signals
        .claim_approval_rate_pct
        .unwrap_or(DEFAULT_CLAIM_APPROVAL_RATE_PCT)
        / 100.0;
    let csat = signals.csat_score.unwrap_or(DEFAULT_CSAT_SCORE) / 100.0;
    (0.4 * claim_speed) + (0.3 * approval_rate) + (0.3 * csat)
}

/// Renewal rate discounted by the complaint ratio.
pub fn score_reliability(signals: &Signals) -> f64 {
    let renewal_rate = signals.renewal_rate_pct.unwrap_or(DEFAULT_RENEWAL_RATE_PCT) / 100.0;
    let complaint_ratio = signals.complaint_ratio.unwrap_or(DEFAULT_COMPLAINT_RATIO);
    renewal_rate * (1.0 - complaint_ratio)
}
