use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use super::food::{strip_data_url, FoodEstimate, FALLBACK_FEEDBACK};
use super::providers::{AdviceProvider, FoodRecognizer, ProviderError};
use crate::workflows::journal::SugarStatus;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRecord, SubjectRepository};

pub const DISCLAIMER: &str =
    "\n\nIMPORTANT: this is an AI assessment and is not 100% accurate. Please see a doctor!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consultation {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAnalysis {
    #[serde(flatten)]
    pub estimate: FoodEstimate,
    pub feedback: String,
    pub status: SugarStatus,
}

/// Relays subject context to the AI providers and shapes their answers.
pub struct AssistantService<S, A, F> {
    subjects: Arc<S>,
    advisor: Arc<A>,
    recognizer: Arc<F>,
}

impl<S, A, F> AssistantService<S, A, F>
where
    S: SubjectRepository + 'static,
    A: AdviceProvider + 'static,
    F: FoodRecognizer + 'static,
{
    pub fn new(subjects: Arc<S>, advisor: Arc<A>, recognizer: Arc<F>) -> Self {
        Self {
            subjects,
            advisor,
            recognizer,
        }
    }

    fn subject(&self, id: &SubjectId) -> Result<SubjectRecord, AssistantError> {
        self.subjects
            .fetch(id)?
            .ok_or(AssistantError::SubjectNotFound)
    }

    /// Symptom guidance; the disclaimer is always appended.
    pub fn consult(
        &self,
        id: &SubjectId,
        symptoms: &str,
        now: DateTime<Utc>,
    ) -> Result<Consultation, AssistantError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(AssistantError::EmptySymptoms);
        }
        let subject = self.subject(id)?;

        let prompt = symptom_prompt(&subject, symptoms, now.date_naive());
        let guidance = self.advisor.symptom_guidance(&prompt)?;

        Ok(Consultation {
            response: format!("{guidance}{DISCLAIMER}"),
            timestamp: now,
        })
    }

    /// Recognise a meal photo and ask for feedback. Provider failures degrade to
    /// fallback values instead of failing the request.
    pub fn analyze_meal(&self, id: &SubjectId, image: &str) -> Result<MealAnalysis, AssistantError> {
        let subject = self.subject(id)?;
        let payload = strip_data_url(image);

        let estimate = match self.recognizer.recognize(payload) {
            Ok(concepts) => concepts
                .first()
                .map(FoodEstimate::from_concept)
                .unwrap_or_else(FoodEstimate::unknown),
            Err(error) => {
                warn!(subject = %id.0, error = %error, "food recognition failed");
                FoodEstimate::unknown()
            }
        };

        let prompt = food_prompt(&estimate, subject.has_diabetes);
        let feedback = match self.advisor.food_feedback(&prompt) {
            Ok(feedback) => feedback,
            Err(error) => {
                warn!(subject = %id.0, error = %error, "food feedback failed");
                FALLBACK_FEEDBACK.to_string()
            }
        };

        Ok(MealAnalysis {
            status: estimate.status(),
            estimate,
            feedback,
        })
    }
}

fn symptom_prompt(subject: &SubjectRecord, symptoms: &str, today: NaiveDate) -> String {
    let condition = if subject.has_diabetes {
        "has diabetes"
    } else {
        "healthy"
    };
    format!(
        "Patient: {age} years old, {condition}.\n\
         Symptoms: {symptoms}\n\n\
         Analyse these symptoms and suggest a likely diagnosis. Answer in this format:\n\
         1. Likely condition\n\
         2. Recommendations\n\
         3. Which doctor to see\n\n\
         IMPORTANT: this is an AI assessment and not 100% accurate. The patient must see a doctor.",
        age = subject.age_on(today),
    )
}

fn food_prompt(estimate: &FoodEstimate, has_diabetes: bool) -> String {
    let condition = if has_diabetes {
        "has diabetes"
    } else {
        "healthy"
    };
    format!(
        "Food: {}\nSugar content: {}g\nPatient condition: {condition}\n\n\
         Give a short recommendation (2-3 sentences) about eating this food.",
        estimate.food_name, estimate.sugar_content
    )
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("symptoms must not be empty")]
    EmptySymptoms,
    #[error("subject not found")]
    SubjectNotFound,
    #[error("assistant unavailable: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
