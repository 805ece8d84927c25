use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::screening::{Biometrics, ScreeningEntry};

/// Identifier wrapper for registered subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Uz,
    Ru,
    Kaa,
}

/// Height kept in both units the clients use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Height {
    pub meters: f64,
    pub centimeters: f64,
}

impl Height {
    /// Values below 10 are read as metres, anything else as centimetres.
    pub fn from_input(raw: f64) -> Self {
        if raw < 10.0 {
            Self {
                meters: raw,
                centimeters: raw * 100.0,
            }
        } else {
            Self {
                meters: raw / 100.0,
                centimeters: raw,
            }
        }
    }
}

/// Whole years between birth date and `today`, birthday aware. Future birth dates give 0.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub weight_kg: f64,
    pub height: f64,
    pub region: String,
    pub phone: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub invited_by: Option<SubjectId>,
}

/// Partial profile edit; absent fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Medication,
    Weather,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("ntf-{id:06}"),
            kind,
            message: message.into(),
            read: false,
            created_at,
        }
    }
}

/// Stored subject document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub weight_kg: f64,
    pub height: Height,
    pub region: String,
    pub phone: String,
    pub language: Language,
    pub has_diabetes: bool,
    pub screening_history: Vec<ScreeningEntry>,
    pub invited_by: Option<SubjectId>,
    pub family_members: Vec<SubjectId>,
    pub notifications: Vec<Notification>,
    pub created_at: DateTime<Utc>,
}

impl SubjectRecord {
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        age_on(self.birth_date, today)
    }

    pub fn biometrics_on(&self, today: NaiveDate) -> Biometrics {
        Biometrics {
            age_years: self.age_on(today),
            weight_kg: self.weight_kg,
            height_cm: self.height.centimeters,
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// `false` when no notification carries `notification_id`.
    pub fn mark_read(&mut self, notification_id: &str) -> bool {
        match self
            .notifications
            .iter_mut()
            .find(|notification| notification.id == notification_id)
        {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn link_family_member(&mut self, member: SubjectId) {
        if !self.family_members.contains(&member) {
            self.family_members.push(member);
        }
    }

    /// Take the inbox and family list from the stored copy; those lists only change
    /// through their own repository operations.
    pub fn keep_stored_lists(&mut self, stored: &SubjectRecord) {
        self.notifications = stored.notifications.clone();
        self.family_members = stored.family_members.clone();
    }

    pub fn profile_view(&self, today: NaiveDate) -> SubjectProfileView {
        SubjectProfileView {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender,
            birth_date: self.birth_date,
            age: self.age_on(today),
            weight_kg: self.weight_kg,
            height_m: self.height.meters,
            height_cm: self.height.centimeters,
            region: self.region.clone(),
            phone: self.phone.clone(),
            language: self.language,
            has_diabetes: self.has_diabetes,
            screening_results: self.screening_history.clone(),
            invited_by: self.invited_by.clone(),
            family_members: self.family_members.clone(),
        }
    }
}

/// Profile payload returned to clients; notifications are served separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfileView {
    pub id: SubjectId,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub age: u32,
    pub weight_kg: f64,
    pub height_m: f64,
    pub height_cm: f64,
    pub region: String,
    pub phone: String,
    pub language: Language,
    pub has_diabetes: bool,
    pub screening_results: Vec<ScreeningEntry>,
    pub invited_by: Option<SubjectId>,
    pub family_members: Vec<SubjectId>,
}
