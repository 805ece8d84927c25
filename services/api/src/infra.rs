use chrono::NaiveDate;
use medlife::workflows::assistant::{AdviceProvider, Concept, FoodRecognizer, ProviderError};
use medlife::workflows::journal::{
    ActivitySession, DoseRecord, GlucoseReading, JournalRepository, MealEntry, Medication,
    RecordId,
};
use medlife::workflows::reminders::{WeatherError, WeatherProvider};
use medlife::workflows::subjects::{
    Notification, RepositoryError, SubjectId, SubjectRecord, SubjectRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubjectRepository {
    records: Arc<Mutex<HashMap<SubjectId, SubjectRecord>>>,
}

impl SubjectRepository for InMemorySubjectRepository {
    fn insert(&self, record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) || guard.values().any(|stored| stored.phone == record.phone)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: SubjectRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(&record.id).ok_or(RepositoryError::NotFound)?;
        record.keep_stored_lists(stored);
        *stored = record;
        Ok(())
    }

    fn fetch(&self, id: &SubjectId) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().find(|record| record.phone == phone).cloned())
    }

    fn invited_by(&self, inviter: &SubjectId) -> Result<Vec<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut invited: Vec<SubjectRecord> = guard
            .values()
            .filter(|record| record.invited_by.as_ref() == Some(inviter))
            .cloned()
            .collect();
        invited.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(invited)
    }

    fn with_diabetes(&self) -> Result<Vec<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(false);
        };
        record.notify(notification);
        Ok(true)
    }

    fn mark_notification_read(
        &self,
        id: &SubjectId,
        notification_id: &str,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .get_mut(id)
            .map(|record| record.mark_read(notification_id))
            .ok_or(RepositoryError::NotFound)
    }

    fn add_family_member(&self, id: &SubjectId, member: SubjectId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.link_family_member(member);
        Ok(())
    }
}

#[derive(Default)]
struct JournalTables {
    glucose: Vec<GlucoseReading>,
    activity: Vec<ActivitySession>,
    meals: Vec<MealEntry>,
    medications: Vec<Medication>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJournalRepository {
    tables: Arc<Mutex<JournalTables>>,
}

impl JournalRepository for InMemoryJournalRepository {
    fn insert_glucose(&self, reading: GlucoseReading) -> Result<GlucoseReading, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        guard.glucose.push(reading.clone());
        Ok(reading)
    }

    fn glucose_for(&self, subject: &SubjectId) -> Result<Vec<GlucoseReading>, RepositoryError> {
        let guard = self.tables.lock().expect("journal mutex poisoned");
        Ok(guard
            .glucose
            .iter()
            .filter(|reading| &reading.subject_id == subject)
            .cloned()
            .collect())
    }

    fn delete_glucose(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        let before = guard.glucose.len();
        guard
            .glucose
            .retain(|reading| !(&reading.subject_id == subject && &reading.id == id));
        Ok(guard.glucose.len() != before)
    }

    fn insert_activity(&self, session: ActivitySession) -> Result<ActivitySession, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        guard.activity.push(session.clone());
        Ok(session)
    }

    fn activity_for(&self, subject: &SubjectId) -> Result<Vec<ActivitySession>, RepositoryError> {
        let guard = self.tables.lock().expect("journal mutex poisoned");
        Ok(guard
            .activity
            .iter()
            .filter(|session| &session.subject_id == subject)
            .cloned()
            .collect())
    }

    fn insert_meal(&self, meal: MealEntry) -> Result<MealEntry, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        guard.meals.push(meal.clone());
        Ok(meal)
    }

    fn meals_for(&self, subject: &SubjectId) -> Result<Vec<MealEntry>, RepositoryError> {
        let guard = self.tables.lock().expect("journal mutex poisoned");
        Ok(guard
            .meals
            .iter()
            .filter(|meal| &meal.subject_id == subject)
            .cloned()
            .collect())
    }

    fn delete_meal(&self, subject: &SubjectId, id: &RecordId) -> Result<bool, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        let before = guard.meals.len();
        guard
            .meals
            .retain(|meal| !(&meal.subject_id == subject && &meal.id == id));
        Ok(guard.meals.len() != before)
    }

    fn insert_medication(&self, medication: Medication) -> Result<Medication, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        guard.medications.push(medication.clone());
        Ok(medication)
    }

    fn update_medication(&self, medication: Medication) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        let slot = guard
            .medications
            .iter_mut()
            .find(|stored| stored.id == medication.id)
            .ok_or(RepositoryError::NotFound)?;
        slot.apply_details(medication);
        Ok(())
    }

    fn append_dose_record(&self, id: &RecordId, record: DoseRecord) -> Result<bool, RepositoryError> {
        let mut guard = self.tables.lock().expect("journal mutex poisoned");
        let slot = guard
            .medications
            .iter_mut()
            .find(|stored| &stored.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(slot.push_dose(record))
    }

    fn medications_for(&self, subject: &SubjectId) -> Result<Vec<Medication>, RepositoryError> {
        let guard = self.tables.lock().expect("journal mutex poisoned");
        Ok(guard
            .medications
            .iter()
            .filter(|medication| &medication.subject_id == subject)
            .cloned()
            .collect())
    }

    fn reminder_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
        let guard = self.tables.lock().expect("journal mutex poisoned");
        Ok(guard
            .medications
            .iter()
            .filter(|medication| medication.active && medication.reminder_enabled)
            .cloned()
            .collect())
    }
}

/// Placeholder for the hosted AI services; every call reports the provider as missing.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnconfiguredAssistant;

impl AdviceProvider for UnconfiguredAssistant {
    fn symptom_guidance(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "no advice provider configured".to_string(),
        ))
    }

    fn food_feedback(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(
            "no advice provider configured".to_string(),
        ))
    }
}

impl FoodRecognizer for UnconfiguredAssistant {
    fn recognize(&self, _image_base64: &str) -> Result<Vec<Concept>, ProviderError> {
        Err(ProviderError::Unavailable(
            "no food recognizer configured".to_string(),
        ))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnconfiguredWeather;

impl WeatherProvider for UnconfiguredWeather {
    fn current_temperature(&self, _region: &str) -> Result<f64, WeatherError> {
        Err(WeatherError::Unavailable(
            "no weather provider configured".to_string(),
        ))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
