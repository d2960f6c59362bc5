use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use topsis_selection::{
    Candidate, ComponentScore, Criteria, CriterionVector, Error, Normalized, WeightVector,
};

use crate::{InsurancePlan, PlanSource, Signals};

pub const ALGORITHM: &str = "TOPSIS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Results returned when a request does not ask for a count.
    pub default_top_n: usize,
    /// Upper bound on results returned, whatever a request asks for.
    pub max_top_n: usize,
    /// Weights used when a request does not supply its own.
    pub weights: WeightVector,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_top_n: 3,
            max_top_n: 10,
            weights: WeightVector::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecommendationRequest {
    pub top_n: Option<usize>,
    pub weights: Option<WeightVector>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    pub weights_used: WeightVector,
    pub recommendations: Vec<PlanScore>,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlanScore {
    pub plan_id: String,
    pub insurer_name: String,
    pub plan_name: String,
    pub final_score: Normalized,
    pub rank: usize,
    pub component_scores: Criteria<ComponentScore>,
    pub premium_annual: f64,
    pub coverage_idv: Option<f64>,
    pub signals: Option<Signals>,
    pub rationale: String,
    pub confidence: f64,
    pub data_completeness: Normalized,
}

#[derive(Clone, Debug, Serialize)]
pub struct Metadata {
    pub total_plans_evaluated: usize,
    pub algorithm: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum RecommendError<E> {
    #[error("failed to load plans: {0}")]
    Source(#[source] E),
    #[error(transparent)]
    Ranking(#[from] Error),
}

/// Clamp a requested result count to `[1, min(max_top_n, plan_count)]`.
pub fn clamp_top_n(requested: usize, max_top_n: usize, plan_count: usize) -> usize {
    requested.min(max_top_n).min(plan_count).max(1)
}

/// Ranks the plans with the request's weights (or the configured defaults) and attaches the
/// details a caller needs to present each result.
pub fn recommend(
    plans: &[InsurancePlan],
    request: &RecommendationRequest,
    settings: &Settings,
) -> Result<Recommendation, Error> {
    let weights = request.weights.unwrap_or(settings.weights);
    let requested = request.top_n.unwrap_or(settings.default_top_n);
    let top_n = clamp_top_n(requested, settings.max_top_n, plans.len());
    if top_n != requested {
        tracing::debug!(requested, top_n, "clamped result count");
    }

    let candidates: Vec<Indexed> = plans
        .iter()
        .enumerate()
        .map(|(index, plan)| Indexed { index, plan })
        .collect();
    let ranked = topsis_selection::rank(&candidates, &weights, top_n)?;

    let recommendations: Vec<PlanScore> = ranked
        .into_iter()
        .map(|result| {
            let plan = &plans[result.id];
            PlanScore {
                plan_id: plan.plan_id.clone(),
                insurer_name: plan
                    .insurer_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                plan_name: plan
                    .plan_name
                    .clone()
                    .unwrap_or_else(|| "Standard Plan".to_string()),
                final_score: result.score,
                rank: result.rank,
                component_scores: result.components,
                premium_annual: plan.premium_annual.unwrap_or(0.0),
                coverage_idv: plan.coverage_idv,
                signals: plan.signals.clone(),
                rationale: result.rationale,
                confidence: plan.confidence(),
                data_completeness: plan.data_completeness(),
            }
        })
        .collect();

    tracing::info!(
        plans = plans.len(),
        requested,
        returned = recommendations.len(),
        "generated recommendations"
    );
    Ok(Recommendation {
        weights_used: weights,
        recommendations,
        metadata: Metadata {
            total_plans_evaluated: plans.len(),
            algorithm: ALGORITHM,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        },
    })
}

/// [recommend] over the plans of a [PlanSource].
pub fn recommend_from<S>(
    source: &S,
    request: &RecommendationRequest,
    settings: &Settings,
) -> Result<Recommendation, RecommendError<S::Error>>
where
    S: PlanSource + ?Sized,
{
    let plans = source.plans().map_err(RecommendError::Source)?;
    Ok(recommend(&plans, request, settings)?)
}

/// Ranks plans by position so results map back to the plan they came from, even when plan ids
/// repeat.
struct Indexed<'p> {
    index: usize,
    plan: &'p InsurancePlan,
}

impl Candidate for Indexed<'_> {
    type Id = usize;
    fn id(&self) -> Self::Id {
        self.index
    }
    fn criteria(&self) -> CriterionVector {
        self.plan.criteria()
    }
}
