//! Disease-risk screening: the static questionnaire, age-based selection and the rule
//! engine that turns answers plus biometrics into referral findings.
//!
//! The evaluator is pure. Persisting findings onto a subject and amending them with
//! appointment or visit outcomes is the job of [`ScreeningService`].

pub mod catalog;
pub mod domain;
pub(crate) mod evaluation;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    category_of, find_question, select_questions, AgeGate, Category, Question, QuestionView,
    CATALOG,
};
pub use domain::{
    reports_diabetes, Answer, AnswerValue, AppointmentRequest, Biometrics, Finding, RiskLevel,
    ScreeningEntry, ScreeningOutcome, ScreeningSubmission, VisitOutcome,
};
pub use evaluation::{evaluate, CategoryBucketing, RiskCounters, RiskEvaluator};
pub use router::screening_router;
pub use service::{ScreeningService, ScreeningServiceError};
