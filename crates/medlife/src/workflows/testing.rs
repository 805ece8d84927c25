//! In-memory repositories and fixtures shared by workflow unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::journal::{
    ActivitySession, DoseRecord, GlucoseReading, JournalRepository, MealEntry, Medication,
    RecordId,
};
use crate::workflows::subjects::{
    Gender, Height, Language, Notification, RepositoryError, SubjectId, SubjectRecord,
    SubjectRepository,
};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn subject_record(id: &str, birth_date: NaiveDate, weight_kg: f64, height_cm: f64) -> SubjectRecord {
    SubjectRecord {
        id: SubjectId(id.to_string()),
        first_name: "Dilnoza".to_string(),
        last_name: "Karimova".to_string(),
        gender: Gender::Female,
        birth_date,
        weight_kg,
        height: Height::from_input(height_cm),
        region: "Tashkent".to_string(),
        phone: format!("+99890{id}"),
        language: Language::Uz,
        has_diabetes: false,
        screening_history: Vec::new(),
        invited_by: None,
        family_members: Vec::new(),
        notifications: Vec::new(),
        created_at: at(2024, 1, 1, 9, 0),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(crate) struct MemorySubjects {
    pub(crate) records: Arc<Mutex<BTreeMap<SubjectId, SubjectRecord>>>,
}

impl MemorySubjects {
    pub(crate) fn with(records: impl IntoIterator<Item = SubjectRecord>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("subject mutex poisoned");
            for record in records {
                guard.insert(record.id.clone(), record);
            }
        }
        repository
    }

    pub(crate) fn get(&self, id: &str) -> SubjectRecord {
        self.records
            .lock()
            .expect("subject mutex poisoned")
            .get(&SubjectId(id.to_string()))
            .cloned()
            .expect("subject stored")
    }
}

impl SubjectRepository for MemorySubjects {
    fn insert(&self, record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("subject mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: SubjectRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("subject mutex poisoned");
        let stored = guard.get_mut(&record.id).ok_or(RepositoryError::NotFound)?;
        record.keep_stored_lists(stored);
        *stored = record;
        Ok(())
    }

    fn fetch(&self, id: &SubjectId) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("subject mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("subject mutex poisoned");
        Ok(guard.values().find(|record| record.phone == phone).cloned())
    }

    fn invited_by(&self, inviter: &SubjectId) -> Result<Vec<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("subject mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.invited_by.as_ref() == Some(inviter))
            .cloned()
            .collect())
    }

    fn with_diabetes(&self) -> Result<Vec<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("subject mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.has_diabetes)
            .cloned()
            .collect())
    }

    fn push_notification(
        &self,
        id: &SubjectId,
        notification: Notification,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("subject mutex poisoned");
        match guard.get_mut(id) {
            Some(record) => {
                record.notify(notification);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn mark_notification_read(
        &self,
        id: &SubjectId,
        notification_id: &str,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("subject mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(record.mark_read(notification_id))
    }

    fn add_family_member(&self, id: &SubjectId, member: SubjectId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("subject mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.link_family_member(member);
        Ok(())
    }
}

pub(crate) struct UnavailableSubjects;

impl SubjectRepository for UnavailableSubjects {
    fn insert(&self, _record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: SubjectRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &SubjectId) -> Result<Option<SubjectRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn find_by_phone(&self, _phone: &str) -> Result<Option<SubjectRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn invited_by(&self, _inviter: &SubjectId) -> Result<Vec<SubjectRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn with_diabetes(&self) -> Result<Vec<SubjectRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn push_notification(
        &self,
        _id: &SubjectId,
        _notification: Notification,
    ) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn mark_notification_read(
        &self,
        _id: &SubjectId,
        _notification_id: &str,
    ) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn add_family_member(
        &self,
        _id: &SubjectId,
        _member: SubjectId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryJournal {
    glucose: Arc<Mutex<Vec<GlucoseReading>>>,
    activity: Arc<Mutex<Vec<ActivitySession>>>,
    meals: Arc<Mutex<Vec<MealEntry>>>,
    pub(crate) medications: Arc<Mutex<Vec<Medication>>>,
}

impl MemoryJournal {
    pub(crate) fn medication(&self, id: &RecordId) -> Medication {
        self.medications
            .lock()
            .expect("journal mutex poisoned")
            .iter()
            .find(|medication| &medication.id == id)
            .cloned()
            .expect("medication stored")
    }
}

impl JournalRepository for MemoryJournal {
    fn insert_glucose(&self, reading: GlucoseReading) -> Result<GlucoseReading, RepositoryError> {
        self.glucose
            .lock()
            .expect("journal mutex poisoned")
            .push(reading.clone());
        Ok(reading)
    }

    fn glucose_for(&self, subject: &SubjectId) -> Result<Vec<GlucoseReading>, RepositoryError> {
        let guard = self.glucose.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|reading| &reading.subject_id == subject)
            .cloned()
            .collect())
    }

    fn delete_glucose(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        let mut guard = self.glucose.lock().expect("journal mutex poisoned");
        let before = guard.len();
        guard.retain(|reading| !(&reading.subject_id == subject && &reading.id == id));
        Ok(guard.len() != before)
    }

    fn insert_activity(&self, session: ActivitySession) -> Result<ActivitySession, RepositoryError> {
        self.activity
            .lock()
            .expect("journal mutex poisoned")
            .push(session.clone());
        Ok(session)
    }

    fn activity_for(&self, subject: &SubjectId) -> Result<Vec<ActivitySession>, RepositoryError> {
        let guard = self.activity.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|session| &session.subject_id == subject)
            .cloned()
            .collect())
    }

    fn insert_meal(&self, meal: MealEntry) -> Result<MealEntry, RepositoryError> {
        self.meals
            .lock()
            .expect("journal mutex poisoned")
            .push(meal.clone());
        Ok(meal)
    }

    fn meals_for(&self, subject: &SubjectId) -> Result<Vec<MealEntry>, RepositoryError> {
        let guard = self.meals.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|meal| &meal.subject_id == subject)
            .cloned()
            .collect())
    }

    fn delete_meal(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        let mut guard = self.meals.lock().expect("journal mutex poisoned");
        let before = guard.len();
        guard.retain(|meal| !(&meal.subject_id == subject && &meal.id == id));
        Ok(guard.len() != before)
    }

    fn insert_medication(&self, medication: Medication) -> Result<Medication, RepositoryError> {
        self.medications
            .lock()
            .expect("journal mutex poisoned")
            .push(medication.clone());
        Ok(medication)
    }

    fn update_medication(&self, medication: Medication) -> Result<(), RepositoryError> {
        let mut guard = self.medications.lock().expect("journal mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|stored| stored.id == medication.id)
            .ok_or(RepositoryError::NotFound)?;
        slot.apply_details(medication);
        Ok(())
    }

    fn append_dose_record(&self, id: &RecordId, record: DoseRecord) -> Result<bool, RepositoryError> {
        let mut guard = self.medications.lock().expect("journal mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|stored| &stored.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(slot.push_dose(record))
    }

    fn medications_for(&self, subject: &SubjectId) -> Result<Vec<Medication>, RepositoryError> {
        let guard = self.medications.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|medication| &medication.subject_id == subject)
            .cloned()
            .collect())
    }

    fn reminder_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
        let guard = self.medications.lock().expect("journal mutex poisoned");
        Ok(guard
            .iter()
            .filter(|medication| medication.active && medication.reminder_enabled)
            .cloned()
            .collect())
    }
}
