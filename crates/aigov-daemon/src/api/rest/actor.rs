//! Caller identity forwarded by the upstream auth proxy

use crate::error::{ApiError, ApiResult};
use aigov_rules::{can_perform_action, Role};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    /// `None` when the forwarded role is not in the role table
    pub role: Option<Role>,
    pub organization_id: String,
}

impl Actor {
    /// Check `permission` against a resource owned by `resource_org_id`
    pub fn authorize(&self, permission: &str, resource_org_id: &str) -> ApiResult<()> {
        let Some(role) = self.role else {
            tracing::warn!(actor_id = %self.id, permission, "Denied request from unknown role");
            return Err(ApiError::PolicyDenied(format!(
                "Unknown role cannot perform {permission}"
            )));
        };

        let decision =
            can_perform_action(role, permission, resource_org_id, &self.organization_id);
        if decision.allowed {
            Ok(())
        } else {
            let reason = decision
                .reason
                .unwrap_or_else(|| format!("{permission} denied"));
            tracing::warn!(actor_id = %self.id, role = %role, permission, reason = %reason, "Access denied");
            Err(ApiError::PolicyDenied(reason))
        }
    }

    /// Check `permission` within the actor's own organization
    pub fn require(&self, permission: &str) -> ApiResult<()> {
        self.authorize(permission, &self.organization_id)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> ApiResult<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {name} header")))
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)?.to_string();
        let role = Role::parse(header(parts, ACTOR_ROLE_HEADER)?);
        let organization_id = header(parts, ORGANIZATION_HEADER)?.to_string();

        Ok(Actor {
            id,
            role,
            organization_id,
        })
    }
}
