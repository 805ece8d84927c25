use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ClockTime, RecordId};
use crate::workflows::subjects::SubjectId;

/// Glucometer measurement as submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGlucoseReading {
    pub value: f64,
    pub date: NaiveDate,
    pub time: ClockTime,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    pub id: RecordId,
    pub subject_id: SubjectId,
    pub value: f64,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GlucoseReading {
    pub fn from_submission(
        subject_id: SubjectId,
        reading: NewGlucoseReading,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::next("glc"),
            subject_id,
            value: reading.value,
            date: reading.date,
            time: reading.time,
            note: reading.note,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseSummary {
    pub count: usize,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl GlucoseSummary {
    pub fn from_readings(readings: &[GlucoseReading]) -> Self {
        let count = readings.len();
        if count == 0 {
            return Self {
                count,
                average: None,
                min: None,
                max: None,
            };
        }

        let total: f64 = readings.iter().map(|reading| reading.value).sum();
        let min = readings
            .iter()
            .map(|reading| reading.value)
            .fold(f64::INFINITY, f64::min);
        let max = readings
            .iter()
            .map(|reading| reading.value)
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            count,
            average: Some(total / count as f64),
            min: Some(min),
            max: Some(max),
        }
    }
}
