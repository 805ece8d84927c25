//! Health journal: glucometer readings, physical activity, meals and medications.

pub mod activity;
pub mod domain;
pub mod glucose;
pub mod medication;
pub mod nutrition;
pub mod period;
pub mod repository;
pub mod router;
pub mod service;

pub use activity::{ActivitySession, ActivitySummary, NewActivitySession};
pub use domain::{ClockTime, RecordId};
pub use glucose::{GlucoseReading, GlucoseSummary, NewGlucoseReading};
pub use medication::{AdherenceStats, DoseIntake, DoseRecord, Medication, NewMedication};
pub use nutrition::{FoodItem, MealEntry, MealType, NewMeal, SugarStatus};
pub use period::{DateWindow, StatsPeriod};
pub use repository::JournalRepository;
pub use router::journal_router;
pub use service::{
    ActivityStats, GlucoseStats, JournalService, JournalServiceError, MedicationStats,
};
