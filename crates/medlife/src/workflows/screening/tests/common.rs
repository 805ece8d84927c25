use std::sync::Arc;

use crate::workflows::screening::{Answer, RiskEvaluator, ScreeningService};
use crate::workflows::testing::{date, subject_record, MemorySubjects};

pub(super) const SUBJECT: &str = "sub-100001";

pub(super) fn yes(ids: &[u32]) -> Vec<Answer> {
    ids.iter().copied().map(Answer::yes).collect()
}

/// Subject aged 45 on 2025-03-01 with a BMI of roughly 24.2.
pub(super) fn seeded_subjects() -> MemorySubjects {
    MemorySubjects::with([subject_record(SUBJECT, date(1980, 1, 10), 70.0, 170.0)])
}

pub(super) fn build_service() -> (ScreeningService<MemorySubjects>, MemorySubjects) {
    let subjects = seeded_subjects();
    let service = ScreeningService::new(Arc::new(subjects.clone()), RiskEvaluator::default());
    (service, subjects)
}
