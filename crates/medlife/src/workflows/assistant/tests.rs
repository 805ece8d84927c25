use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::{
    assistant_router, AdviceProvider, AssistantError, AssistantService, Concept, FoodRecognizer,
    ProviderError, DISCLAIMER, FALLBACK_FEEDBACK,
};
use crate::workflows::journal::SugarStatus;
use crate::workflows::subjects::SubjectId;
use crate::workflows::testing::{at, date, read_json_body, subject_record, MemorySubjects};

#[derive(Default)]
struct ScriptedAdvisor {
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl AdviceProvider for ScriptedAdvisor {
    fn symptom_guidance(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        if self.fail {
            return Err(ProviderError::Unavailable("timeout".to_string()));
        }
        Ok("1. Dehydration".to_string())
    }

    fn food_feedback(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        if self.fail {
            return Err(ProviderError::Unavailable("timeout".to_string()));
        }
        Ok("Keep the portion small.".to_string())
    }
}

struct FixedRecognizer(Result<Vec<Concept>, ()>);

impl FoodRecognizer for FixedRecognizer {
    fn recognize(&self, image_base64: &str) -> Result<Vec<Concept>, ProviderError> {
        assert!(!image_base64.starts_with("data:"), "header was stripped");
        self.0
            .clone()
            .map_err(|()| ProviderError::Rejected("bad image".to_string()))
    }
}

fn subjects() -> MemorySubjects {
    let mut subject = subject_record("sub-1", date(1975, 4, 1), 82.0, 171.0);
    subject.has_diabetes = true;
    MemorySubjects::with([subject])
}

fn service(
    advisor: ScriptedAdvisor,
    recognizer: FixedRecognizer,
) -> (
    AssistantService<MemorySubjects, ScriptedAdvisor, FixedRecognizer>,
    Arc<ScriptedAdvisor>,
) {
    let advisor = Arc::new(advisor);
    let service = AssistantService::new(
        Arc::new(subjects()),
        Arc::clone(&advisor),
        Arc::new(recognizer),
    );
    (service, advisor)
}

fn soda() -> FixedRecognizer {
    FixedRecognizer(Ok(vec![
        Concept {
            name: "Orange Soda".to_string(),
            confidence: 0.93,
        },
        Concept {
            name: "cake".to_string(),
            confidence: 0.2,
        },
    ]))
}

#[test]
fn consult_appends_disclaimer_and_mentions_context() {
    let (service, advisor) = service(ScriptedAdvisor::default(), soda());
    let now = at(2025, 5, 1, 12, 0);

    let consultation = service
        .consult(&SubjectId("sub-1".to_string()), "  dry mouth  ", now)
        .expect("consultation succeeds");

    assert_eq!(consultation.response, format!("1. Dehydration{DISCLAIMER}"));
    assert_eq!(consultation.timestamp, now);
    let prompts = advisor.prompts.lock().expect("prompt mutex poisoned");
    assert!(prompts[0].contains("50 years old"));
    assert!(prompts[0].contains("has diabetes"));
    assert!(prompts[0].contains("Symptoms: dry mouth"));
}

#[test]
fn consult_rejects_blank_symptoms_and_reports_provider_failures() {
    let (service, _) = service(ScriptedAdvisor::default(), soda());
    assert!(matches!(
        service.consult(&SubjectId("sub-1".to_string()), "   ", at(2025, 5, 1, 12, 0)),
        Err(AssistantError::EmptySymptoms)
    ));

    let (failing, _) = service_with_failing_advisor();
    assert!(matches!(
        failing.consult(&SubjectId("sub-1".to_string()), "cough", at(2025, 5, 1, 12, 0)),
        Err(AssistantError::Provider(_))
    ));
}

fn service_with_failing_advisor() -> (
    AssistantService<MemorySubjects, ScriptedAdvisor, FixedRecognizer>,
    Arc<ScriptedAdvisor>,
) {
    service(
        ScriptedAdvisor {
            fail: true,
            ..ScriptedAdvisor::default()
        },
        FixedRecognizer(Err(())),
    )
}

#[test]
fn meal_analysis_uses_the_top_concept() {
    let (service, _) = service(ScriptedAdvisor::default(), soda());

    let analysis = service
        .analyze_meal(&SubjectId("sub-1".to_string()), "data:image/png;base64,iVBOR")
        .expect("analysis succeeds");

    assert_eq!(analysis.estimate.food_name, "Orange Soda");
    assert_eq!(analysis.estimate.sugar_content, 10.0);
    assert_eq!(analysis.estimate.calories, 140.0);
    assert_eq!(analysis.status, SugarStatus::Normal);
    assert_eq!(analysis.feedback, "Keep the portion small.");
}

#[test]
fn meal_analysis_degrades_when_providers_fail() {
    let (service, _) = service_with_failing_advisor();

    let analysis = service
        .analyze_meal(&SubjectId("sub-1".to_string()), "iVBOR")
        .expect("fallbacks keep the request alive");

    assert_eq!(analysis.estimate.food_name, "unknown food");
    assert_eq!(analysis.estimate.calories, 150.0);
    assert_eq!(analysis.feedback, FALLBACK_FEEDBACK);
}

#[tokio::test]
async fn consult_route_maps_provider_failure_to_bad_gateway() {
    let (service, _) = service_with_failing_advisor();
    let router = assistant_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::post("/api/v1/subjects/sub-1/assistant/consult")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "symptoms": "headache" }).to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], false);
}
