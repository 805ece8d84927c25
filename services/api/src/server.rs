use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryJournalRepository, InMemorySubjectRepository, UnconfiguredAssistant,
    UnconfiguredWeather,
};
use crate::routes::with_probe_routes;
use crate::scheduler::spawn_reminders;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use medlife::config::AppConfig;
use medlife::error::AppError;
use medlife::telemetry;
use medlife::workflows::assistant::{assistant_router, AssistantService};
use medlife::workflows::care::{care_router, CareService};
use medlife::workflows::journal::{journal_router, JournalService};
use medlife::workflows::reminders::ReminderRunner;
use medlife::workflows::screening::{screening_router, RiskEvaluator, ScreeningService};
use medlife::workflows::subjects::{subject_router, SubjectService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) type Runner =
    ReminderRunner<InMemorySubjectRepository, InMemoryJournalRepository, UnconfiguredWeather>;

/// Every workflow router over one set of shared repositories.
pub(crate) fn build_app(config: &AppConfig, state: AppState) -> (Router, Arc<Runner>) {
    let subjects = Arc::new(InMemorySubjectRepository::default());
    let journal = Arc::new(InMemoryJournalRepository::default());
    let assistant = Arc::new(UnconfiguredAssistant);

    let subject_service = Arc::new(SubjectService::new(subjects.clone()));
    let screening_service = Arc::new(ScreeningService::new(
        subjects.clone(),
        RiskEvaluator::new(config.screening.bucketing),
    ));
    let journal_service = Arc::new(JournalService::new(subjects.clone(), journal.clone()));
    let care_service = Arc::new(CareService::new(
        subjects.clone(),
        journal.clone(),
        config.links.clone(),
    ));
    let assistant_service = Arc::new(AssistantService::new(
        subjects.clone(),
        assistant.clone(),
        assistant,
    ));
    let runner = Arc::new(ReminderRunner::new(
        subjects,
        journal,
        Arc::new(UnconfiguredWeather),
        config.reminders.clone(),
    ));

    let app = subject_router(subject_service)
        .merge(screening_router(screening_service))
        .merge(journal_router(journal_service))
        .merge(care_router(care_service))
        .merge(assistant_router(assistant_service));
    let app = with_probe_routes(app).layer(Extension(state));

    (app, runner)
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (app, runner) = build_app(&config, app_state);
    let app = app.layer(prometheus_layer);

    if !args.no_reminders {
        spawn_reminders(runner);
    }

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        bucketing = ?config.screening.bucketing,
        "medlife api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
