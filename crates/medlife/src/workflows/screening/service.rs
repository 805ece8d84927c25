use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::catalog::{select_questions, QuestionView};
use super::domain::{
    reports_diabetes, Answer, AppointmentRequest, ScreeningEntry, ScreeningOutcome, VisitOutcome,
};
use super::evaluation::RiskEvaluator;
use crate::workflows::subjects::{RepositoryError, SubjectId, SubjectRecord, SubjectRepository};

/// Screening session: question selection, evaluation and history amendments for a subject.
pub struct ScreeningService<S> {
    subjects: Arc<S>,
    evaluator: RiskEvaluator,
}

impl<S> ScreeningService<S>
where
    S: SubjectRepository + 'static,
{
    pub fn new(subjects: Arc<S>, evaluator: RiskEvaluator) -> Self {
        Self {
            subjects,
            evaluator,
        }
    }

    pub fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    fn subject(&self, id: &SubjectId) -> Result<SubjectRecord, ScreeningServiceError> {
        self.subjects
            .fetch(id)?
            .ok_or(ScreeningServiceError::SubjectNotFound)
    }

    /// Questions for the subject's age on `today`.
    pub fn questions_for(
        &self,
        id: &SubjectId,
        today: NaiveDate,
    ) -> Result<Vec<QuestionView>, ScreeningServiceError> {
        let subject = self.subject(id)?;
        Ok(select_questions(subject.age_on(today))
            .into_iter()
            .map(|question| question.view())
            .collect())
    }

    /// Evaluate against stored biometrics, append the findings to the history and
    /// overwrite the diabetes flag.
    pub fn submit(
        &self,
        id: &SubjectId,
        answers: &[Answer],
        now: DateTime<Utc>,
    ) -> Result<ScreeningOutcome, ScreeningServiceError> {
        let mut subject = self.subject(id)?;
        let biometrics = subject.biometrics_on(now.date_naive());

        let results = self.evaluator.evaluate(answers, &biometrics);
        let has_diabetes = reports_diabetes(answers);

        subject.screening_history.extend(
            results
                .iter()
                .map(|finding| ScreeningEntry::from_finding(finding, now)),
        );
        subject.has_diabetes = has_diabetes;
        self.subjects.update(subject)?;

        info!(
            subject = %id.0,
            answers = answers.len(),
            findings = results.len(),
            has_diabetes,
            "screening submitted"
        );

        Ok(ScreeningOutcome {
            success: true,
            results,
            has_diabetes,
        })
    }

    pub fn schedule_appointment(
        &self,
        id: &SubjectId,
        request: AppointmentRequest,
    ) -> Result<ScreeningEntry, ScreeningServiceError> {
        self.amend(id, request.result_index, |entry| {
            entry.appointment_date = Some(request.appointment_date);
        })
    }

    pub fn record_visit(
        &self,
        id: &SubjectId,
        outcome: VisitOutcome,
    ) -> Result<ScreeningEntry, ScreeningServiceError> {
        let VisitOutcome {
            result_index,
            visited,
            result,
            medications,
        } = outcome;
        self.amend(id, result_index, move |entry| {
            entry.visited = Some(visited);
            entry.result = result;
            entry.medications = medications;
        })
    }

    fn amend(
        &self,
        id: &SubjectId,
        index: usize,
        change: impl FnOnce(&mut ScreeningEntry),
    ) -> Result<ScreeningEntry, ScreeningServiceError> {
        let mut subject = self.subject(id)?;
        let entry = subject
            .screening_history
            .get_mut(index)
            .ok_or(ScreeningServiceError::EntryNotFound { index })?;
        change(entry);
        let amended = entry.clone();
        self.subjects.update(subject)?;
        Ok(amended)
    }
}

/// Error raised by the screening session.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("subject not found")]
    SubjectNotFound,
    #[error("no screening result at index {index}")]
    EntryNotFound { index: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
