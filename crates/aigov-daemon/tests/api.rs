//! HTTP-level tests against the assembled router

use aigov_daemon::api::{create_router, AppState};
use aigov_daemon::models::{Project, RaciMatrix};
use aigov_daemon::storage::{
    ExceptionStorage, GateStorage, IntakeStorage, ProjectStorage, RaciStorage, Storage,
    StorageResult, Transition,
};
use aigov_daemon::{DaemonConfig, InMemoryStorage};
use aigov_rules::{GateReview, IntakeResult, RiskException, QUESTION_BANK};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn router_with(config: DaemonConfig) -> Router {
    create_router(AppState::new(Arc::new(InMemoryStorage::new()), config))
}

fn router() -> Router {
    router_with(DaemonConfig::default())
}

struct Caller {
    id: &'static str,
    role: &'static str,
    org: &'static str,
}

const ENGINEER: Caller = Caller {
    id: "eng-1",
    role: "engineering",
    org: "org-a",
};
const COMPLIANCE: Caller = Caller {
    id: "comp-1",
    role: "compliance",
    org: "org-a",
};
const MARKETING: Caller = Caller {
    id: "mkt-1",
    role: "marketing",
    org: "org-a",
};
const EXECUTIVE: Caller = Caller {
    id: "exec-1",
    role: "executive",
    org: "org-a",
};
const FOREIGN_ADMIN: Caller = Caller {
    id: "admin-9",
    role: "admin",
    org: "org-b",
};

async fn send(
    app: &Router,
    caller: Option<&Caller>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder
            .header("x-actor-id", caller.id)
            .header("x-actor-role", caller.role)
            .header("x-organization-id", caller.org);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_project(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Some(&ENGINEER),
        "POST",
        "/api/v1/projects",
        Some(json!({ "name": name, "description": "Support ticket triage" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Answer every question with its best or worst option
fn responses(best: bool) -> Value {
    let answers: Vec<Value> = QUESTION_BANK
        .iter()
        .map(|q| {
            let option = if best {
                q.options.iter().max_by_key(|o| o.score)
            } else {
                q.options.iter().min_by_key(|o| o.score)
            }
            .unwrap();
            json!({
                "question_id": q.id,
                "selected_value": option.value,
                "score": option.score,
            })
        })
        .collect();
    json!({ "responses": answers })
}

async fn request_exception(app: &Router, project_id: &str, duration_days: u32) -> String {
    let (status, body) = send(
        app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project_id}/exceptions"),
        Some(json!({
            "title": "Unreviewed prompt templates",
            "justification": "Pilot limited to the support team",
            "compensating_controls": ["Human review of every reply"],
            "duration_days": duration_days,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "requested");
    body["id"].as_str().unwrap().to_string()
}

// ----------------------------------------------------------------------------
// Identity and tenancy
// ----------------------------------------------------------------------------

#[tokio::test]
async fn health_needs_no_identity() {
    let (status, body) = send(&router(), None, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_identity_headers_are_unauthorized() {
    let (status, body) = send(&router(), None, "GET", "/api/v1/projects", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_role_is_denied() {
    let app = router();
    let intruder = Caller {
        id: "x-1",
        role: "superuser",
        org: "org-a",
    };
    let (status, body) = send(&app, Some(&intruder), "GET", "/api/v1/projects", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "POLICY_DENIED");
}

#[tokio::test]
async fn project_create_and_read_in_own_org() {
    let app = router();
    let id = create_project(&app, "Ticket triage").await;

    let (status, body) = send(
        &app,
        Some(&MARKETING),
        "GET",
        &format!("/api/v1/projects/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ticket triage");
    assert_eq!(body["organization_id"], "org-a");
    assert_eq!(body["owner_id"], "eng-1");
    assert!(body["risk_path"].is_null());

    let (status, body) = send(&app, Some(&MARKETING), "GET", "/api/v1/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_of_another_org_is_denied() {
    let app = router();
    let id = create_project(&app, "Ticket triage").await;

    let (status, body) = send(
        &app,
        Some(&FOREIGN_ADMIN),
        "GET",
        &format!("/api/v1/projects/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Cross-tenant access denied"));

    let (_, body) = send(&app, Some(&FOREIGN_ADMIN), "GET", "/api/v1/projects", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn marketing_cannot_create_projects() {
    let (status, _) = send(
        &router(),
        Some(&MARKETING),
        "POST",
        "/api/v1/projects",
        Some(json!({ "name": "Campaign copy" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_unknown_project_is_not_found() {
    let admin = Caller {
        id: "admin-1",
        role: "admin",
        org: "org-a",
    };
    let (status, _) = send(
        &router(),
        Some(&admin),
        "DELETE",
        "/api/v1/projects/missing",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ----------------------------------------------------------------------------
// Permissions reference
// ----------------------------------------------------------------------------

#[tokio::test]
async fn permission_check_lists_granted_roles() {
    let (status, body) = send(
        &router(),
        None,
        "GET",
        "/api/v1/permissions/check?role=marketing&permission=gate:approve",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], false);
    let granted: Vec<&str> = body["granted_to"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(granted.contains(&"admin"));
    assert!(granted.contains(&"compliance"));
    assert!(!granted.contains(&"marketing"));
}

#[tokio::test]
async fn unknown_role_has_no_permissions() {
    let (status, body) = send(&router(), None, "GET", "/api/v1/permissions/intern", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["known"], false);
    assert_eq!(body["permissions"], json!([]));
}

// ----------------------------------------------------------------------------
// Intake
// ----------------------------------------------------------------------------

#[tokio::test]
async fn intake_sets_project_risk_path() {
    let app = router();
    let safe = create_project(&app, "Docs search").await;
    let risky = create_project(&app, "Credit decisions").await;

    let (status, body) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{safe}/intake"),
        Some(responses(true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_score"], 100);
    assert_eq!(body["risk_path"], "fast_track");

    let (_, body) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{risky}/intake"),
        Some(responses(false)),
    )
    .await;
    assert_eq!(body["total_score"], 0);
    assert_eq!(body["risk_path"], "high_risk");
    assert!(!body["recommended_actions"].as_array().unwrap().is_empty());

    let (_, project) = send(
        &app,
        Some(&ENGINEER),
        "GET",
        &format!("/api/v1/projects/{risky}"),
        None,
    )
    .await;
    assert_eq!(project["risk_path"], "high_risk");
    assert_eq!(project["intake_score"], 0);

    let (status, stored) = send(
        &app,
        Some(&MARKETING),
        "GET",
        &format!("/api/v1/projects/{safe}/intake"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["risk_path"], "fast_track");
}

#[tokio::test]
async fn intake_keeps_earlier_project_edits() {
    let app = router();
    let id = create_project(&app, "Docs search").await;
    let uri = format!("/api/v1/projects/{id}");

    let (status, _) = send(
        &app,
        Some(&ENGINEER),
        "PUT",
        &uri,
        Some(json!({ "name": "  Internal docs search ", "owner_id": "eng-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("{uri}/intake"),
        Some(responses(true)),
    )
    .await;

    let (_, project) = send(&app, Some(&ENGINEER), "GET", &uri, None).await;
    assert_eq!(project["name"], "Internal docs search");
    assert_eq!(project["owner_id"], "eng-2");
    assert_eq!(project["risk_path"], "fast_track");

    let (status, body) = send(&app, Some(&ENGINEER), "PUT", &uri, Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rederived_scores_ignore_inflated_submissions() {
    let mut config = DaemonConfig::default();
    config.intake.rederive_scores = true;
    let app = router_with(config);
    let id = create_project(&app, "Credit decisions").await;

    let mut body = responses(false);
    for answer in body["responses"].as_array_mut().unwrap() {
        answer["score"] = json!(10);
    }

    let (_, result) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{id}/intake"),
        Some(body),
    )
    .await;
    assert_eq!(result["total_score"], 0);
    assert_eq!(result["risk_path"], "high_risk");
}

// ----------------------------------------------------------------------------
// Risk exceptions
// ----------------------------------------------------------------------------

#[tokio::test]
async fn exception_approval_is_one_shot() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;
    let exception = request_exception(&app, &project, 30).await;

    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/exceptions/{exception}/approve"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approved_by"], "comp-1");
    assert!(body["expires_at"].is_string());

    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/exceptions/{exception}/approve"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn requester_cannot_approve_own_exception() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;
    let exception = request_exception(&app, &project, 30).await;

    let (status, _) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/exceptions/{exception}/approve"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn denial_keeps_notes_verbatim() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;
    let exception = request_exception(&app, &project, 30).await;
    let notes = "  Controls insufficient:\nadd red-teaming first ";

    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/exceptions/{exception}/deny"),
        Some(json!({ "notes": notes })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "denied");
    assert_eq!(body["notes"], notes);
    assert!(body["expires_at"].is_null());
}

#[tokio::test]
async fn exception_without_controls_is_rejected() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;

    let (status, body) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project}/exceptions"),
        Some(json!({
            "title": "No controls",
            "justification": "Deadline",
            "compensating_controls": [],
            "duration_days": 30,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn expirations_report_short_lived_approvals() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;
    let short = request_exception(&app, &project, 3).await;
    let long = request_exception(&app, &project, 90).await;
    for id in [&short, &long] {
        let (status, _) = send(
            &app,
            Some(&COMPLIANCE),
            "POST",
            &format!("/api/v1/exceptions/{id}/approve"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "GET",
        "/api/v1/exceptions/expirations",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expired"], json!([]));
    let soon = body["expiring_soon"].as_array().unwrap();
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0]["id"], short.as_str());

    let (_, listed) = send(
        &app,
        Some(&MARKETING),
        "GET",
        &format!("/api/v1/projects/{project}/exceptions"),
        None,
    )
    .await;
    // marketing holds no exception:read
    assert_eq!(listed["code"], "POLICY_DENIED");
}

// ----------------------------------------------------------------------------
// Gates and RACI
// ----------------------------------------------------------------------------

#[tokio::test]
async fn deploy_gate_blocked_by_pending_exception_on_high_risk_project() {
    let app = router();
    let project = create_project(&app, "Credit decisions").await;
    send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project}/intake"),
        Some(responses(false)),
    )
    .await;
    let exception = request_exception(&app, &project, 30).await;

    let (status, review) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project}/gates"),
        Some(json!({ "gate": "deploy", "evidence": ["model card"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = review["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project}/gates"),
        Some(json!({ "gate": "deploy" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let approve = json!({ "decision": "approve" });
    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/gates/{review_id}/decision"),
        Some(approve.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/exceptions/{exception}/deny"),
        Some(json!({ "notes": "Not justified" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Some(&COMPLIANCE),
        "POST",
        &format!("/api/v1/gates/{review_id}/decision"),
        Some(approve),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn invalid_raci_matrix_is_rejected() {
    let app = router();
    let project = create_project(&app, "Ticket triage").await;
    let uri = format!("/api/v1/projects/{project}/raci");

    let (status, body) = send(
        &app,
        Some(&ENGINEER),
        "PUT",
        &uri,
        Some(json!({ "assignments": [
            { "activity": "Model validation", "assignee": "eng-1", "responsibility": "R" }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("accountable"));

    let (status, _) = send(
        &app,
        Some(&ENGINEER),
        "PUT",
        &uri,
        Some(json!({ "assignments": [
            { "activity": "Model validation", "assignee": "eng-1", "responsibility": "R" },
            { "activity": "Model validation", "assignee": "comp-1", "responsibility": "A" },
            { "activity": "Model validation", "assignee": "legal-1", "responsibility": "consulted" }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, matrix) = send(&app, Some(&MARKETING), "GET", &uri, None).await;
    assert_eq!(matrix["assignments"].as_array().unwrap().len(), 3);
    assert_eq!(matrix["updated_by"], "eng-1");
}

// ----------------------------------------------------------------------------
// Calculators
// ----------------------------------------------------------------------------

#[tokio::test]
async fn roi_calculation() {
    let (status, body) = send(
        &router(),
        Some(&MARKETING),
        "POST",
        "/api/v1/roi",
        Some(json!({
            "implementation_cost": 120000.0,
            "annual_operating_cost": 24000.0,
            "hours_saved_per_month": 400.0,
            "hourly_rate": 50.0,
            "annual_risk_reduction": 12000.0,
            "horizon_years": 3,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annual_benefit"], 252000.0);
    assert_eq!(body["roi_percent"], 293.75);
}

#[tokio::test]
async fn vendor_with_failing_security_is_rejected() {
    let (status, body) = send(
        &router(),
        Some(&COMPLIANCE),
        "POST",
        "/api/v1/vendors/score",
        Some(json!({
            "vendor": "Acme LLM",
            "ratings": [
                { "criterion": "security", "rating": 1 },
                { "criterion": "data_privacy", "rating": 5 },
                { "criterion": "transparency", "rating": 5 },
                { "criterion": "reliability", "rating": 5 },
                { "criterion": "support", "rating": 5 },
                { "criterion": "cost", "rating": 5 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "rejected");
    assert_eq!(body["blocking_findings"].as_array().unwrap().len(), 1);
}

// ----------------------------------------------------------------------------
// Rate limiting
// ----------------------------------------------------------------------------

#[tokio::test]
async fn clients_over_limit_get_429() {
    let mut config = DaemonConfig::default();
    config.rate_limit.max_requests = 2;
    let app = router_with(config);

    for _ in 0..2 {
        let (status, _) = send(&app, None, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app, None, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMITED");
}

// ----------------------------------------------------------------------------
// Concurrent decisions
// ----------------------------------------------------------------------------

/// In-memory storage whose single-record reads lag, so overlapping requests
/// both finish their authorization read before either writes
struct SlowReads(InMemoryStorage);

const READ_DELAY: Duration = Duration::from_millis(50);

#[async_trait]
impl ProjectStorage for SlowReads {
    async fn get_project(&self, id: &str) -> StorageResult<Option<Project>> {
        self.0.get_project(id).await
    }

    async fn list_projects(&self, organization_id: &str) -> StorageResult<Vec<Project>> {
        self.0.list_projects(organization_id).await
    }

    async fn upsert_project(&self, project: Project) -> StorageResult<()> {
        self.0.upsert_project(project).await
    }

    async fn update_project(&self, id: &str, apply: Transition<Project>) -> StorageResult<Project> {
        self.0.update_project(id, apply).await
    }

    async fn delete_project(&self, id: &str) -> StorageResult<bool> {
        self.0.delete_project(id).await
    }
}

#[async_trait]
impl IntakeStorage for SlowReads {
    async fn get_intake(&self, project_id: &str) -> StorageResult<Option<IntakeResult>> {
        self.0.get_intake(project_id).await
    }

    async fn put_intake(&self, result: IntakeResult) -> StorageResult<()> {
        self.0.put_intake(result).await
    }
}

#[async_trait]
impl ExceptionStorage for SlowReads {
    async fn get_exception(&self, id: &str) -> StorageResult<Option<RiskException>> {
        tokio::time::sleep(READ_DELAY).await;
        self.0.get_exception(id).await
    }

    async fn list_exceptions_for_project(&self, project_id: &str) -> StorageResult<Vec<RiskException>> {
        self.0.list_exceptions_for_project(project_id).await
    }

    async fn list_exceptions_for_org(&self, organization_id: &str) -> StorageResult<Vec<RiskException>> {
        self.0.list_exceptions_for_org(organization_id).await
    }

    async fn list_all_exceptions(&self) -> StorageResult<Vec<RiskException>> {
        self.0.list_all_exceptions().await
    }

    async fn upsert_exception(&self, exception: RiskException) -> StorageResult<()> {
        self.0.upsert_exception(exception).await
    }

    async fn transition_exception(
        &self,
        id: &str,
        apply: Transition<RiskException>,
    ) -> StorageResult<RiskException> {
        self.0.transition_exception(id, apply).await
    }
}

#[async_trait]
impl RaciStorage for SlowReads {
    async fn get_raci(&self, project_id: &str) -> StorageResult<Option<RaciMatrix>> {
        self.0.get_raci(project_id).await
    }

    async fn put_raci(&self, matrix: RaciMatrix) -> StorageResult<()> {
        self.0.put_raci(matrix).await
    }
}

#[async_trait]
impl GateStorage for SlowReads {
    async fn get_gate_review(&self, id: &str) -> StorageResult<Option<GateReview>> {
        tokio::time::sleep(READ_DELAY).await;
        self.0.get_gate_review(id).await
    }

    async fn list_gate_reviews(&self, project_id: &str) -> StorageResult<Vec<GateReview>> {
        self.0.list_gate_reviews(project_id).await
    }

    async fn insert_gate_review(&self, review: GateReview) -> StorageResult<()> {
        self.0.insert_gate_review(review).await
    }

    async fn transition_gate_review(
        &self,
        id: &str,
        apply: Transition<GateReview>,
    ) -> StorageResult<GateReview> {
        self.0.transition_gate_review(id, apply).await
    }
}

impl Storage for SlowReads {}

fn slow_router() -> Router {
    create_router(AppState::new(
        Arc::new(SlowReads(InMemoryStorage::new())),
        DaemonConfig::default(),
    ))
}

/// Exactly one of two overlapping decisions is accepted; the other is refused
/// as already decided
fn single_winner(outcomes: [(StatusCode, Value); 2]) -> Value {
    let accepted: Vec<_> = outcomes
        .iter()
        .filter(|(status, _)| *status == StatusCode::OK)
        .collect();
    assert_eq!(accepted.len(), 1, "outcomes: {outcomes:?}");

    let (status, body) = outcomes
        .iter()
        .find(|(status, _)| *status != StatusCode::OK)
        .unwrap();
    assert_eq!(*status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    accepted[0].1.clone()
}

#[tokio::test]
async fn overlapping_exception_decisions_accept_exactly_one() {
    let app = slow_router();
    let project = create_project(&app, "Ticket triage").await;
    let exception = request_exception(&app, &project, 30).await;

    let approve_uri = format!("/api/v1/exceptions/{exception}/approve");
    let deny_uri = format!("/api/v1/exceptions/{exception}/deny");
    let (approved, denied) = tokio::join!(
        send(&app, Some(&EXECUTIVE), "POST", &approve_uri, None),
        send(
            &app,
            Some(&COMPLIANCE),
            "POST",
            &deny_uri,
            Some(json!({ "notes": "Not justified" })),
        ),
    );
    let winner = single_winner([approved, denied]);

    let (_, listed) = send(
        &app,
        Some(&COMPLIANCE),
        "GET",
        &format!("/api/v1/projects/{project}/exceptions"),
        None,
    )
    .await;
    assert_eq!(listed[0]["status"], winner["status"]);
    assert_eq!(listed[0]["approved_by"], winner["approved_by"]);
}

#[tokio::test]
async fn overlapping_gate_decisions_accept_exactly_one() {
    let app = slow_router();
    let project = create_project(&app, "Ticket triage").await;
    let (_, review) = send(
        &app,
        Some(&ENGINEER),
        "POST",
        &format!("/api/v1/projects/{project}/gates"),
        Some(json!({ "gate": "design" })),
    )
    .await;
    let uri = format!("/api/v1/gates/{}/decision", review["id"].as_str().unwrap());

    let (approved, rejected) = tokio::join!(
        send(
            &app,
            Some(&EXECUTIVE),
            "POST",
            &uri,
            Some(json!({ "decision": "approve" })),
        ),
        send(
            &app,
            Some(&COMPLIANCE),
            "POST",
            &uri,
            Some(json!({ "decision": "reject", "notes": "Missing model card" })),
        ),
    );
    let winner = single_winner([approved, rejected]);

    let (_, reviews) = send(
        &app,
        Some(&ENGINEER),
        "GET",
        &format!("/api/v1/projects/{project}/gates"),
        None,
    )
    .await;
    assert_eq!(reviews[0]["status"], winner["status"]);
}
