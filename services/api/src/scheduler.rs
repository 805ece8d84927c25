use chrono::{Local, NaiveDate, Utc};
use medlife::workflows::journal::JournalRepository;
use medlife::workflows::reminders::{ReminderRunner, WeatherProvider};
use medlife::workflows::subjects::SubjectRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Drive the reminder passes on the configured cadence until the runtime shuts down.
pub(crate) fn spawn_reminders<S, J, W>(runner: Arc<ReminderRunner<S, J, W>>) -> JoinHandle<()>
where
    S: SubjectRepository + 'static,
    J: JournalRepository + 'static,
    W: WeatherProvider + 'static,
{
    let cadence = Duration::from_secs(u64::from(runner.schedule().cadence_minutes) * 60);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cadence);
        let mut weather_ran_on: Option<NaiveDate> = None;
        info!(cadence_secs = cadence.as_secs(), "reminder scheduler started");

        loop {
            ticker.tick().await;
            let now = Local::now();

            if let Err(error) = runner.medication_pass(now) {
                warn!(error = %error, "medication reminder pass aborted");
            }

            if runner
                .schedule()
                .weather_due(weather_ran_on, now.naive_local())
            {
                match runner.weather_pass(Utc::now()) {
                    Ok(_) => weather_ran_on = Some(now.date_naive()),
                    Err(error) => warn!(error = %error, "weather pass aborted"),
                }
            }
        }
    })
}
