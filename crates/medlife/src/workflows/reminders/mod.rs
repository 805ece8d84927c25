//! Background reminder passes: medication nudges, missed-dose bookkeeping and daily
//! weather advice for subjects living with diabetes.

pub mod medication;
pub mod runner;
pub mod weather;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

pub use medication::{plan_medication_reminders, ReminderAction};
pub use runner::{PassReport, ReminderRunner};
pub use weather::{advisory_for, WeatherAdvisory, WeatherError, WeatherProvider};

/// Timing knobs for the reminder passes, all in minutes except `weather_hour`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    /// Interval between medication passes.
    pub cadence_minutes: u32,
    /// How long after a dose time the reminder goes out.
    pub reminder_delay_minutes: u32,
    /// How long after a dose time an untaken dose is recorded as missed.
    pub missed_after_minutes: u32,
    pub weather_hour: u32,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self {
            cadence_minutes: 10,
            reminder_delay_minutes: 10,
            missed_after_minutes: 70,
            weather_hour: 8,
        }
    }
}

impl ReminderSchedule {
    /// `true` when `elapsed` minutes fall inside the pass window opening at `offset`.
    pub(crate) fn in_window(&self, offset: u32, elapsed: i64) -> bool {
        let start = i64::from(offset);
        elapsed >= start && elapsed < start + i64::from(self.cadence_minutes)
    }

    /// The weather pass runs once per day, during the configured hour.
    pub fn weather_due(&self, last_run: Option<NaiveDate>, now: NaiveDateTime) -> bool {
        now.hour() == self.weather_hour && last_run != Some(now.date())
    }
}

#[cfg(test)]
mod tests;
