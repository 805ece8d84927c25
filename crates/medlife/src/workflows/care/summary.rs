use serde::Serialize;

use crate::workflows::journal::{ActivitySession, GlucoseReading, MealEntry, Medication};
use crate::workflows::subjects::SubjectProfileView;

/// Number of most recent journal records carried in a care view.
pub const RECENT_RECORD_LIMIT: usize = 30;

/// Headline numbers for a care view. Figures are pre-formatted decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareSummary {
    pub average_glucose: String,
    pub total_distance_km: String,
    pub average_calories: String,
    pub medication_count: usize,
}

impl CareSummary {
    pub fn from_records(
        glucose: &[GlucoseReading],
        activity: &[ActivitySession],
        meals: &[MealEntry],
        medications: &[Medication],
    ) -> Self {
        let average_glucose = mean(glucose.iter().map(|reading| reading.value));
        let total_distance: f64 = activity.iter().map(|session| session.distance_km).sum();
        let average_calories = mean(meals.iter().map(|meal| meal.total_calories));

        Self {
            average_glucose: format!("{average_glucose:.1}"),
            total_distance_km: format!("{total_distance:.2}"),
            average_calories: format!("{average_calories:.0}"),
            medication_count: medications.len(),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (total, count) = values.fold((0.0, 0usize), |(total, count), value| {
        (total + value, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Everything a relative or doctor sees about one subject.
#[derive(Debug, Clone, Serialize)]
pub struct CareView {
    pub patient: SubjectProfileView,
    pub glucose: Vec<GlucoseReading>,
    pub activity: Vec<ActivitySession>,
    pub medications: Vec<Medication>,
    pub meals: Vec<MealEntry>,
    pub summary: CareSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientView {
    #[serde(flatten)]
    pub view: CareView,
    pub patient_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteLink {
    pub invite_url: String,
    pub subject_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleMembers {
    pub members: Vec<SubjectProfileView>,
    pub total: usize,
}
