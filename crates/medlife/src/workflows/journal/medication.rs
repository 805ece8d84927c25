use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ClockTime, RecordId};
use super::period::DateWindow;
use crate::workflows::subjects::SubjectId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    pub times: Vec<ClockTime>,
    #[serde(default)]
    pub reminder_enabled: bool,
}

/// Outcome of one scheduled dose; missed doses are written by the reminder pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseRecord {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub taken: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseIntake {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub time: ClockTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: RecordId,
    pub subject_id: SubjectId,
    pub name: String,
    pub dosage: Option<String>,
    pub times: Vec<ClockTime>,
    pub reminder_enabled: bool,
    pub dose_records: Vec<DoseRecord>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Medication {
    pub fn from_submission(
        subject_id: SubjectId,
        medication: NewMedication,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::next("med"),
            subject_id,
            name: medication.name,
            dosage: medication.dosage,
            times: medication.times,
            reminder_enabled: medication.reminder_enabled,
            dose_records: Vec::new(),
            active: true,
            created_at,
        }
    }

    pub fn apply_update(&mut self, update: NewMedication) {
        self.name = update.name;
        self.dosage = update.dosage;
        self.times = update.times;
        self.reminder_enabled = update.reminder_enabled;
    }

    pub fn taken_on(&self, date: NaiveDate, time: ClockTime) -> bool {
        self.dose_records
            .iter()
            .any(|record| record.taken && record.date == date && record.time == time)
    }

    /// Store a dose outcome. A missed record is dropped when any record already exists
    /// for that date and time; returns whether the record was kept.
    pub fn push_dose(&mut self, record: DoseRecord) -> bool {
        if !record.taken
            && self
                .dose_records
                .iter()
                .any(|stored| stored.date == record.date && stored.time == record.time)
        {
            return false;
        }
        self.dose_records.push(record);
        true
    }

    /// Copy the editable fields from `incoming`; dose history stays as stored.
    pub fn apply_details(&mut self, incoming: Medication) {
        self.name = incoming.name;
        self.dosage = incoming.dosage;
        self.times = incoming.times;
        self.reminder_enabled = incoming.reminder_enabled;
        self.active = incoming.active;
    }

    pub fn adherence(&self, window: DateWindow) -> AdherenceStats {
        let (taken, missed) = self
            .dose_records
            .iter()
            .filter(|record| window.contains(record.date))
            .fold((0usize, 0usize), |(taken, missed), record| {
                if record.taken {
                    (taken + 1, missed)
                } else {
                    (taken, missed + 1)
                }
            });
        let total = taken + missed;
        let adherence = if total == 0 {
            0.0
        } else {
            taken as f64 / total as f64 * 100.0
        };

        AdherenceStats {
            medication_id: self.id.clone(),
            name: self.name.clone(),
            taken,
            missed,
            total,
            adherence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceStats {
    pub medication_id: RecordId,
    pub name: String,
    pub taken: usize,
    pub missed: usize,
    pub total: usize,
    pub adherence: f64,
}
