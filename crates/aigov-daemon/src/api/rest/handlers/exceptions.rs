//! Risk exception handlers

use super::projects::load_project;
use crate::api::rest::actor::Actor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::ExceptionStorage;
use aigov_rules::permissions::{EXCEPTION_APPROVE, EXCEPTION_READ, EXCEPTION_REQUEST};
use aigov_rules::{
    approve_exception as approve, check_expirations, create_risk_exception,
    deny_exception as deny, ExceptionStatus, ExpirationReport, NewRiskException, RiskException,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Request body for a new exception; project, organization and requester come from the route and caller
#[derive(Debug, Deserialize)]
pub struct RequestExceptionRequest {
    pub title: String,
    pub justification: String,
    pub compensating_controls: Vec<String>,
    pub duration_days: u32,
}

/// An exception as served to clients, with its effective status
#[derive(Debug, Serialize)]
pub struct ExceptionView {
    #[serde(flatten)]
    pub exception: RiskException,
    pub effective_status: ExceptionStatus,
}

impl ExceptionView {
    fn at(exception: RiskException, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            effective_status: exception.effective_status(now),
            exception,
        }
    }
}

async fn load_exception(
    state: &AppState,
    actor: &Actor,
    id: &str,
    permission: &str,
) -> ApiResult<RiskException> {
    let exception = state
        .storage
        .get_exception(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Risk exception {} not found", id)))?;
    actor.authorize(permission, &exception.organization_id)?;
    Ok(exception)
}

/// List a project's exceptions
pub async fn list_exceptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<Vec<ExceptionView>>> {
    load_project(&state, &actor, &id, EXCEPTION_READ).await?;
    let now = chrono::Utc::now();
    let exceptions = state.storage.list_exceptions_for_project(&id).await?;
    Ok(Json(
        exceptions
            .into_iter()
            .map(|e| ExceptionView::at(e, now))
            .collect(),
    ))
}

/// Request a new risk exception for a project
pub async fn request_exception(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<RequestExceptionRequest>,
) -> ApiResult<(StatusCode, Json<RiskException>)> {
    let project = load_project(&state, &actor, &id, EXCEPTION_REQUEST).await?;

    let exception = create_risk_exception(
        &NewRiskException {
            project_id: project.id,
            organization_id: project.organization_id,
            title: request.title,
            justification: request.justification,
            compensating_controls: request.compensating_controls,
            requested_by: actor.id.clone(),
            duration_days: request.duration_days,
        },
        chrono::Utc::now(),
    )?;

    state.storage.upsert_exception(exception.clone()).await?;

    tracing::info!(
        exception_id = %exception.id,
        project_id = %exception.project_id,
        duration_days = exception.duration_days,
        "Requested risk exception"
    );

    Ok((StatusCode::CREATED, Json(exception)))
}

/// Approve a requested exception
pub async fn approve_exception(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<RiskException>> {
    load_exception(&state, &actor, &id, EXCEPTION_APPROVE).await?;

    let approver = actor.id.clone();
    let approved = state
        .storage
        .transition_exception(
            &id,
            Box::new(move |e| approve(e, &approver, chrono::Utc::now())),
        )
        .await?;

    tracing::info!(exception_id = %id, approved_by = %actor.id, "Approved risk exception");

    Ok(Json(approved))
}

#[derive(Debug, Deserialize)]
pub struct DenyExceptionRequest {
    pub notes: String,
}

/// Deny a requested exception
pub async fn deny_exception(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<DenyExceptionRequest>,
) -> ApiResult<Json<RiskException>> {
    load_exception(&state, &actor, &id, EXCEPTION_APPROVE).await?;

    let approver = actor.id.clone();
    let denied = state
        .storage
        .transition_exception(
            &id,
            Box::new(move |e| deny(e, &approver, &request.notes)),
        )
        .await?;

    tracing::info!(exception_id = %id, denied_by = %actor.id, "Denied risk exception");

    Ok(Json(denied))
}

/// Expired and expiring-soon exceptions in the caller's organization
pub async fn exception_expirations(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<ExpirationReport>> {
    actor.require(EXCEPTION_READ)?;
    let exceptions = state
        .storage
        .list_exceptions_for_org(&actor.organization_id)
        .await?;
    let report = check_expirations(
        &exceptions,
        chrono::Utc::now(),
        state.config.expiry_lookahead(),
    );
    Ok(Json(report))
}
