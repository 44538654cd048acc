//! Health, permission and reference-data handlers

use crate::api::rest::state::AppState;
use aigov_rules::{
    get_roles_with_permission, has_permission, intake::IntakeQuestion, permissions_for_name, Role,
    QUESTION_BANK,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

#[derive(Debug, Serialize)]
pub struct RolePermissionsResponse {
    pub role: String,
    pub known: bool,
    pub permissions: Vec<&'static str>,
}

/// Grant set for a role; unknown roles get an empty list
pub async fn role_permissions(Path(role): Path<String>) -> Json<RolePermissionsResponse> {
    Json(RolePermissionsResponse {
        known: Role::parse(&role).is_some(),
        permissions: permissions_for_name(&role).into_iter().collect(),
        role,
    })
}

#[derive(Debug, Deserialize)]
pub struct PermissionCheckQuery {
    pub role: String,
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct PermissionCheckResponse {
    pub role: String,
    pub permission: String,
    pub allowed: bool,
    /// Every role holding the permission
    pub granted_to: Vec<Role>,
}

pub async fn check_permission(
    Query(query): Query<PermissionCheckQuery>,
) -> Json<PermissionCheckResponse> {
    let allowed = Role::parse(&query.role).is_some_and(|r| has_permission(r, &query.permission));
    Json(PermissionCheckResponse {
        granted_to: get_roles_with_permission(&query.permission)
            .into_iter()
            .collect(),
        allowed,
        role: query.role,
        permission: query.permission,
    })
}

/// The fixed intake question bank
pub async fn list_questions() -> Json<&'static [IntakeQuestion]> {
    Json(&QUESTION_BANK[..])
}
