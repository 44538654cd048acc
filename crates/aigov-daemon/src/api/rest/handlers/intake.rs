//! Intake scorecard handlers

use super::projects::load_project;
use crate::api::rest::actor::Actor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::Project;
use crate::storage::{IntakeStorage, ProjectStorage};
use aigov_rules::permissions::{ASSESSMENT_READ, INTAKE_SUBMIT};
use aigov_rules::{score_intake, score_intake_verified, IntakeResponse, IntakeResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SubmitIntakeRequest {
    pub responses: Vec<IntakeResponse>,
}

/// Score an intake submission and record the result on the project
pub async fn submit_intake(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<SubmitIntakeRequest>,
) -> ApiResult<Json<IntakeResult>> {
    let project = load_project(&state, &actor, &id, INTAKE_SUBMIT).await?;

    let result = if state.config.intake.rederive_scores {
        score_intake_verified(&project.id, &request.responses)
    } else {
        score_intake(&project.id, &request.responses)
    };

    let (total_score, risk_path) = (result.total_score, result.risk_path);
    state
        .storage
        .update_project(
            &id,
            Box::new(move |current| {
                Ok(Project {
                    intake_score: Some(total_score),
                    risk_path: Some(risk_path),
                    updated_at: chrono::Utc::now(),
                    ..current.clone()
                })
            }),
        )
        .await?;
    state.storage.put_intake(result.clone()).await?;

    tracing::info!(
        project_id = %id,
        total_score = result.total_score,
        risk_path = %result.risk_path,
        "Scored intake"
    );

    Ok(Json(result))
}

/// Latest intake result for a project
pub async fn get_intake(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<IntakeResult>> {
    load_project(&state, &actor, &id, ASSESSMENT_READ).await?;
    let result = state
        .storage
        .get_intake(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No intake submitted for project {}", id)))?;
    Ok(Json(result))
}
