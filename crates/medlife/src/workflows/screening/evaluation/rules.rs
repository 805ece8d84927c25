use super::super::catalog::Category;
use super::super::domain::{Answer, Biometrics};
use super::config::CategoryBucketing;

const OBESE_BMI: f64 = 30.0;
const OVERWEIGHT_BMI: f64 = 25.0;

/// Per-category tallies accumulated from answers and the BMI adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskCounters {
    counts: [u32; 5],
}

impl RiskCounters {
    pub fn get(&self, category: Category) -> u32 {
        self.counts[category.index()]
    }

    fn bump(&mut self, category: Category) {
        let slot = &mut self.counts[category.index()];
        *slot = slot.saturating_add(1);
    }
}

/// Every `yes` counts once, duplicates included.
pub(crate) fn tally_answers(answers: &[Answer], bucketing: CategoryBucketing) -> RiskCounters {
    let mut counters = RiskCounters::default();
    for answer in answers.iter().filter(|answer| answer.is_yes()) {
        if let Some(category) = bucketing.bucket(answer.question_id) {
            counters.bump(category);
        }
    }
    counters
}

/// Non-finite BMI (zero or negative-zero height) leaves the counters untouched.
pub(crate) fn apply_bmi(counters: &mut RiskCounters, biometrics: &Biometrics) -> Option<f64> {
    let bmi = biometrics.bmi();
    if !bmi.is_finite() {
        return None;
    }

    if bmi > OBESE_BMI {
        counters.bump(Category::Diabetes);
    }
    if bmi > OVERWEIGHT_BMI {
        counters.bump(Category::Cardiovascular);
    }
    Some(bmi)
}
