mod config;
mod policy;
mod rules;

pub use config::CategoryBucketing;
pub use rules::RiskCounters;

use super::catalog::Category;
use super::domain::{Answer, Biometrics, Finding};
use policy::findings_for;
use rules::{apply_bmi, tally_answers};
use tracing::debug;

/// Stateless evaluator mapping answers and biometrics to findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEvaluator {
    bucketing: CategoryBucketing,
}

impl RiskEvaluator {
    pub fn new(bucketing: CategoryBucketing) -> Self {
        Self { bucketing }
    }

    pub fn bucketing(&self) -> CategoryBucketing {
        self.bucketing
    }

    /// Counters after answers and the BMI adjustment, before thresholds are applied.
    pub fn counters(&self, answers: &[Answer], biometrics: &Biometrics) -> RiskCounters {
        let mut counters = tally_answers(answers, self.bucketing);
        apply_bmi(&mut counters, biometrics);
        counters
    }

    pub fn evaluate(&self, answers: &[Answer], biometrics: &Biometrics) -> Vec<Finding> {
        let counters = self.counters(answers, biometrics);
        debug!(
            diabetes = counters.get(Category::Diabetes),
            hypertension = counters.get(Category::Hypertension),
            cardiovascular = counters.get(Category::Cardiovascular),
            respiratory = counters.get(Category::Respiratory),
            cancer = counters.get(Category::Cancer),
            "screening counters tallied"
        );
        findings_for(&counters, biometrics.age_years)
    }
}

/// Evaluate with catalog bucketing.
///
/// Answers for ids outside the catalog are ignored. Use
/// `RiskEvaluator::new(CategoryBucketing::IdRange)` to count them as cancer answers.
pub fn evaluate(answers: &[Answer], age_years: u32, weight_kg: f64, height_cm: f64) -> Vec<Finding> {
    RiskEvaluator::default().evaluate(
        answers,
        &Biometrics {
            age_years,
            weight_kg,
            height_cm,
        },
    )
}
