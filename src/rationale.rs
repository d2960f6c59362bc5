use crate::{
    criteria::{Criteria, Criterion},
    ComponentScore, Normalized,
};

const BALANCED: &str = "Balanced overall performance";

fn template(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Cost => "Offers excellent premium value",
        Criterion::Coverage => "Provides comprehensive coverage",
        Criterion::Service => "Demonstrates strong service quality and claim handling",
        Criterion::Reliability => "Shows high customer retention and low complaints",
    }
}

/// The criterion with the largest weighted contribution. Ties go to the criterion declared first
/// in [Criterion::ALL]. Returns `None` only if no contribution is comparable (all NaN).
pub fn dominant_criterion(components: &Criteria<ComponentScore>) -> Option<Criterion> {
    let mut best: Option<(Criterion, f64)> = None;
    for (criterion, component) in components.iter() {
        let weighted = component.weighted;
        if weighted.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if weighted <= max => (),
            _ => best = Some((criterion, weighted)),
        }
    }
    best.map(|(criterion, _)| criterion)
}

/// One sentence explaining a ranked result by its strongest weighted criterion, followed by the
/// final score to three decimal places.
pub fn rationale(components: &Criteria<ComponentScore>, score: Normalized) -> String {
    let lead = dominant_criterion(components)
        .map(template)
        .unwrap_or(BALANCED);
    format!("{lead}. Overall score: {:.3}", score.as_f64())
}
