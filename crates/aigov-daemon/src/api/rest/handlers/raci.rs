//! RACI matrix handlers

use super::projects::load_project;
use crate::api::rest::actor::Actor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::RaciMatrix;
use crate::storage::RaciStorage;
use aigov_rules::permissions::{RACI_READ, RACI_UPDATE};
use aigov_rules::{validate_raci, RaciAssignment};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PutRaciRequest {
    pub assignments: Vec<RaciAssignment>,
}

pub async fn get_raci(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<RaciMatrix>> {
    load_project(&state, &actor, &id, RACI_READ).await?;
    let matrix = state
        .storage
        .get_raci(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No RACI matrix for project {}", id)))?;
    Ok(Json(matrix))
}

/// Replace a project's RACI matrix
pub async fn put_raci(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<PutRaciRequest>,
) -> ApiResult<Json<RaciMatrix>> {
    let project = load_project(&state, &actor, &id, RACI_UPDATE).await?;
    validate_raci(&request.assignments)?;

    let matrix = RaciMatrix {
        project_id: project.id,
        organization_id: project.organization_id,
        assignments: request.assignments,
        updated_by: actor.id.clone(),
        updated_at: chrono::Utc::now(),
    };
    state.storage.put_raci(matrix.clone()).await?;

    tracing::info!(project_id = %id, rows = matrix.assignments.len(), "Updated RACI matrix");

    Ok(Json(matrix))
}
