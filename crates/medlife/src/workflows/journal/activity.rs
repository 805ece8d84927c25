use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ClockTime, RecordId};
use crate::workflows::subjects::SubjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivitySession {
    pub distance_meters: f64,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<ClockTime>,
    #[serde(default)]
    pub end_time: Option<ClockTime>,
}

/// Walk or run logged by the subject; kilometres are derived on intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySession {
    pub id: RecordId,
    pub subject_id: SubjectId,
    pub distance_meters: f64,
    pub distance_km: f64,
    pub duration_minutes: Option<f64>,
    pub date: NaiveDate,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub created_at: DateTime<Utc>,
}

impl ActivitySession {
    pub fn from_submission(
        subject_id: SubjectId,
        session: NewActivitySession,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::next("act"),
            subject_id,
            distance_meters: session.distance_meters,
            distance_km: session.distance_meters / 1000.0,
            duration_minutes: session.duration_minutes,
            date: session.date,
            start_time: session.start_time,
            end_time: session.end_time,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub total_distance_meters: f64,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub average_distance_per_record: f64,
}

impl ActivitySummary {
    pub fn from_sessions(sessions: &[ActivitySession]) -> Self {
        let total_distance_meters: f64 = sessions.iter().map(|s| s.distance_meters).sum();
        let total_duration_minutes: f64 = sessions
            .iter()
            .map(|s| s.duration_minutes.unwrap_or(0.0))
            .sum();

        Self {
            total_distance_meters,
            total_distance_km: total_distance_meters / 1000.0,
            total_duration_minutes,
            average_distance_per_record: total_distance_meters / sessions.len().max(1) as f64,
        }
    }
}
