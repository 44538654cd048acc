//! Stage-gate review handlers

use super::projects::load_project;
use crate::api::rest::actor::Actor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{ExceptionStorage, GateStorage, ProjectStorage};
use aigov_rules::permissions::{GATE_APPROVE, GATE_READ, GATE_SUBMIT};
use aigov_rules::{
    check_gate_approval, decide_gate, open_gate_review as open_review, ExceptionStatus, Gate,
    GateDecision, GateReview, NewGateReview,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OpenGateReviewRequest {
    pub gate: Gate,
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecideGateRequest {
    pub decision: GateDecision,
    pub notes: Option<String>,
}

pub async fn list_gate_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<Vec<GateReview>>> {
    load_project(&state, &actor, &id, GATE_READ).await?;
    let reviews = state.storage.list_gate_reviews(&id).await?;
    Ok(Json(reviews))
}

/// Submit a project for review at a gate
pub async fn open_gate_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<OpenGateReviewRequest>,
) -> ApiResult<(StatusCode, Json<GateReview>)> {
    let project = load_project(&state, &actor, &id, GATE_SUBMIT).await?;

    let review = open_review(
        &NewGateReview {
            project_id: project.id,
            organization_id: project.organization_id,
            gate: request.gate,
            submitted_by: actor.id.clone(),
            evidence: request.evidence,
        },
        chrono::Utc::now(),
    )?;
    state.storage.insert_gate_review(review.clone()).await?;

    tracing::info!(review_id = %review.id, project_id = %id, gate = review.gate.as_str(), "Opened gate review");

    Ok((StatusCode::CREATED, Json(review)))
}

/// Approve or reject a pending gate review
pub async fn decide_gate_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<DecideGateRequest>,
) -> ApiResult<Json<GateReview>> {
    let review = state
        .storage
        .get_gate_review(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gate review {} not found", id)))?;
    actor.authorize(GATE_APPROVE, &review.organization_id)?;

    if request.decision == GateDecision::Approve {
        let risk_path = state
            .storage
            .get_project(&review.project_id)
            .await?
            .and_then(|p| p.risk_path);
        let pending = state
            .storage
            .list_exceptions_for_project(&review.project_id)
            .await?
            .iter()
            .filter(|e| e.status == ExceptionStatus::Requested)
            .count();
        check_gate_approval(review.gate, risk_path, pending)?;
    }

    let reviewer = actor.id.clone();
    let decided = state
        .storage
        .transition_gate_review(
            &id,
            Box::new(move |r| {
                decide_gate(
                    r,
                    request.decision,
                    &reviewer,
                    request.notes.as_deref(),
                    chrono::Utc::now(),
                )
            }),
        )
        .await?;

    tracing::info!(
        review_id = %id,
        gate = decided.gate.as_str(),
        status = %decided.status,
        reviewer_id = %actor.id,
        "Decided gate review"
    );

    Ok(Json(decided))
}
