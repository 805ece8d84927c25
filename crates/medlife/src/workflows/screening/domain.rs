use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Answer options offered for every screening question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Yes,
    No,
    Unknown,
}

/// One response in a submission. The question id is not checked against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    #[serde(alias = "answer")]
    pub value: AnswerValue,
}

impl Answer {
    pub const fn yes(question_id: u32) -> Self {
        Self {
            question_id,
            value: AnswerValue::Yes,
        }
    }

    pub const fn no(question_id: u32) -> Self {
        Self {
            question_id,
            value: AnswerValue::No,
        }
    }

    pub fn is_yes(&self) -> bool {
        self.value == AnswerValue::Yes
    }
}

/// Caller-supplied measurements for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub age_years: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
}

impl Biometrics {
    /// Weight over height in metres squared. Zero height yields a non-finite value.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Moderate,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

/// Risk assessment for one disease category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub disease: String,
    pub risk_level: RiskLevel,
    pub referral_specialty: String,
    pub recommendation: String,
}

/// Persisted copy of a finding plus the follow-up the subject records later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningEntry {
    pub disease: String,
    pub risk: RiskLevel,
    pub doctor_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl ScreeningEntry {
    pub fn from_finding(finding: &Finding, created_at: DateTime<Utc>) -> Self {
        Self {
            disease: finding.disease.clone(),
            risk: finding.risk_level,
            doctor_type: finding.referral_specialty.clone(),
            created_at,
            appointment_date: None,
            visited: None,
            result: None,
            medications: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningSubmission {
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub result_index: usize,
    pub appointment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitOutcome {
    pub result_index: usize,
    pub visited: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

/// What a submission returns to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub success: bool,
    pub results: Vec<Finding>,
    pub has_diabetes: bool,
}

/// The self-reported diagnosis flag: question 1 answered yes anywhere in the submission.
pub fn reports_diabetes(answers: &[Answer]) -> bool {
    answers
        .iter()
        .any(|answer| answer.question_id == 1 && answer.is_yes())
}
