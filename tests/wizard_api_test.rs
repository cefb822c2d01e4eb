use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use innova_backend::config::{Config, LogFormat};
use innova_backend::database::memory::InMemoryAssessmentRepository;
use innova_backend::models::assessment::{Assessment, AssessmentKind, AssessmentStatus, NewAssessment};
use innova_backend::models::caller::{CallerContext, Role};
use innova_backend::models::publishing::PublishingScopeEntry;
use innova_backend::utils::time::FixedClock;
use innova_backend::utils::token::issue_access_token;
use innova_backend::{routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test_secret_key";

fn setup_app() -> Router {
    setup_app_with(Arc::new(InMemoryAssessmentRepository::new()))
}

fn setup_app_with(repository: Arc<InMemoryAssessmentRepository>) -> Router {
    let config = Config {
        server_address: "127.0.0.1:0".into(),
        jwt_secret: SECRET.into(),
        max_questions_per_draft: 50,
        wizard_idle_minutes: 30,
        max_open_wizards_per_user: 5,
        log_format: LogFormat::Pretty,
    };
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let state = AppState::new(
        &config,
        repository,
        Arc::new(FixedClock(now)),
    );
    routes::router(state)
}

fn token_for(caller: &CallerContext) -> String {
    issue_access_token(SECRET, caller, Duration::hours(1)).expect("token")
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn wizard_flow_end_to_end() {
    let app = setup_app();
    let officer = CallerContext::new("officer-1", Role::InnovationOfficer, Some("inst-1".into()));
    let token = token_for(&officer);

    let (status, body) = call(&app, "POST", "/api/wizards", &token, Some(json!({ "kind": "assessment" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "basic_info");
    let id = body["session_id"].as_str().unwrap().to_string();
    let base = format!("/api/wizards/{}", id);

    let (status, body) = call(&app, "POST", &format!("{}/next", base), &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"].is_array());

    let (status, _) = call(
        &app,
        "PUT",
        &format!("{}/basic-info", base),
        &token,
        Some(json!({ "title": "Midterm", "description": "Unit 1-3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "POST", &format!("{}/next", base), &token, None).await;
    assert_eq!(body["step"], "settings");

    let start = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
    let (status, _) = call(
        &app,
        "PUT",
        &format!("{}/settings", base),
        &token,
        Some(json!({
            "duration_minutes": 30,
            "start_time": start,
            "end_time": start + Duration::minutes(30),
            "pass_percentage": 60,
            "shuffle_questions": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    call(&app, "POST", &format!("{}/next", base), &token, None).await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("{}/questions", base),
        &token,
        Some(json!({
            "type": "multiple_choice",
            "text": "2 + 2 = ?",
            "options": ["3", "4"],
            "correct_answer": 1,
            "points": 5,
            "time_limit_seconds": 30
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["questions"][0]["question_number"], 1);
    assert_eq!(body["draft"]["total_points"], 5);
    call(&app, "POST", &format!("{}/next", base), &token, None).await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("{}/scopes", base),
        &token,
        Some(json!({ "institution_id": "inst-2", "class_ids": ["c1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        "POST",
        &format!("{}/scopes", base),
        &token,
        Some(json!({ "institution_id": "inst-1", "class_ids": ["c1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(
        &app,
        "PUT",
        &format!("{}/scopes/inst-1", base),
        &token,
        Some(json!({ "class_ids": ["c1", "c2"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["publishing"][0]["class_ids"], json!(["c1", "c2"]));

    let (_, body) = call(&app, "POST", &format!("{}/next", base), &token, None).await;
    assert_eq!(body["step"], "review");

    let (status, body) = call(
        &app,
        "POST",
        &format!("{}/submit", base),
        &token,
        Some(json!({ "as_draft": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["assessment"]["status"], "upcoming");
    assert_eq!(body["assessment"]["display_status"], "upcoming");
    assert_eq!(body["wizard"]["step"], "basic_info");
    let assessment_id = body["assessment"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "GET", "/api/assessments?status=upcoming", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], assessment_id.as_str());

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/assessments/{}/status", assessment_id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "upcoming");
}

#[tokio::test]
async fn back_from_first_step_conflicts() {
    let app = setup_app();
    let admin = CallerContext::new("admin-1", Role::SystemAdmin, None);
    let token = token_for(&admin);

    let (_, body) = call(&app, "POST", "/api/wizards", &token, Some(json!({}))).await;
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "POST", &format!("/api/wizards/{}/back", id), &token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, "DELETE", &format!("/api/wizards/{}", id), &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &format!("/api/wizards/{}", id), &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_requires_valid_bearer_token() {
    let app = setup_app();

    let (status, body) = call(&app, "GET", "/api/assessments", "not-a-jwt", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");

    let student = CallerContext::new("student-1", Role::Student, Some("inst-1".into()));
    let (status, _) = call(&app, "POST", "/api/wizards", &token_for(&student), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

fn unscheduled_assessment(created_by: &str) -> Assessment {
    Assessment {
        id: Uuid::new_v4(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(),
        body: NewAssessment {
            kind: AssessmentKind::Assessment,
            title: "Imported quiz".into(),
            description: "Carried over without a schedule".into(),
            duration_minutes: 15,
            start_time: None,
            end_time: None,
            pass_percentage: 50,
            auto_submit: false,
            auto_evaluate: false,
            shuffle_questions: false,
            show_results_immediately: false,
            allow_review: false,
            questions: Vec::new(),
            publishing: vec![PublishingScopeEntry {
                institution_id: "inst-1".into(),
                class_ids: ["c1".to_string()].into_iter().collect(),
            }],
            status: AssessmentStatus::Unpublished,
            created_by: created_by.into(),
        },
    }
}

#[tokio::test]
async fn unscheduled_assessment_fails_status_read_but_lists_as_unknown() {
    let repository = Arc::new(InMemoryAssessmentRepository::new());
    let seeded = unscheduled_assessment("officer-1");
    repository.insert(seeded.clone()).unwrap();
    let app = setup_app_with(repository);
    let officer = CallerContext::new("officer-1", Role::InnovationOfficer, Some("inst-1".into()));
    let token = token_for(&officer);

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/assessments/{}/status", seeded.id),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("no schedule"));

    let (status, body) = call(&app, "GET", "/api/assessments", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["display_status"], "unknown");

    let (status, body) = call(&app, "GET", &format!("/api/assessments/{}", seeded.id), &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_status"], "unknown");
}

#[tokio::test]
async fn fractional_answer_index_is_rejected_but_integral_float_is_not() {
    let app = setup_app();
    let admin = CallerContext::new("admin-1", Role::SystemAdmin, None);
    let token = token_for(&admin);
    let (_, body) = call(&app, "POST", "/api/wizards", &token, Some(json!({}))).await;
    let questions = format!("/api/wizards/{}/questions", body["session_id"].as_str().unwrap());

    let question = |answer: JsonValue| {
        json!({
            "type": "multiple_choice",
            "text": "Largest planet?",
            "options": ["Mars", "Jupiter"],
            "correct_answer": answer,
            "points": 2,
            "time_limit_seconds": 20
        })
    };

    let (status, body) = call(&app, "POST", &questions, &token, Some(question(json!(1.0)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["questions"][0]["correct_answer"], 1);

    let (status, _) = call(&app, "POST", &questions, &token, Some(question(json!(1.5)))).await;
    assert!(status.is_client_error());
}
