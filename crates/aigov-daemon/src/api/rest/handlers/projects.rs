//! Project management handlers

use crate::api::rest::actor::Actor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::Project;
use crate::storage::ProjectStorage;
use aigov_rules::permissions::{PROJECT_CREATE, PROJECT_DELETE, PROJECT_READ, PROJECT_UPDATE};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Fetch a project and authorize `permission` against its organization
pub(crate) async fn load_project(
    state: &AppState,
    actor: &Actor,
    id: &str,
    permission: &str,
) -> ApiResult<Project> {
    let project = state
        .storage
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", id)))?;
    actor.authorize(permission, &project.organization_id)?;
    Ok(project)
}

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to the caller
    pub owner_id: Option<String>,
}

/// Update project request
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner_id: Option<String>,
}

/// List projects in the caller's organization
pub async fn list_projects(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<Vec<Project>>> {
    actor.require(PROJECT_READ)?;
    let projects = state.storage.list_projects(&actor.organization_id).await?;
    Ok(Json(projects))
}

/// Get a specific project
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state, &actor, &id, PROJECT_READ).await?;
    Ok(Json(project))
}

/// Create a new project in the caller's organization
pub async fn create_project(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    actor.require(PROJECT_CREATE)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }

    let now = chrono::Utc::now();
    let project = Project {
        id: uuid::Uuid::new_v4().to_string(),
        organization_id: actor.organization_id.clone(),
        name: name.to_string(),
        description: request.description,
        owner_id: request.owner_id.unwrap_or_else(|| actor.id.clone()),
        intake_score: None,
        risk_path: None,
        created_at: now,
        updated_at: now,
    };

    state.storage.upsert_project(project.clone()).await?;

    tracing::info!(project_id = %project.id, organization_id = %project.organization_id, "Created project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Update an existing project
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    load_project(&state, &actor, &id, PROJECT_UPDATE).await?;

    let UpdateProjectRequest {
        name,
        description,
        owner_id,
    } = request;
    let name = match name {
        Some(name) if name.trim().is_empty() => {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    let project = state
        .storage
        .update_project(
            &id,
            Box::new(move |current| {
                let mut project = current.clone();
                if let Some(name) = name {
                    project.name = name;
                }
                if let Some(description) = description {
                    project.description = description;
                }
                if let Some(owner_id) = owner_id {
                    project.owner_id = owner_id;
                }
                project.updated_at = chrono::Utc::now();
                Ok(project)
            }),
        )
        .await?;

    tracing::info!(project_id = %id, "Updated project");

    Ok(Json(project))
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Delete a project
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
) -> ApiResult<Json<DeleteResponse>> {
    load_project(&state, &actor, &id, PROJECT_DELETE).await?;

    let deleted = state.storage.delete_project(&id).await?;

    if deleted {
        tracing::info!(project_id = %id, "Deleted project");
    }

    Ok(Json(DeleteResponse { deleted }))
}
