//! Role-based permission table with tenant isolation.
//!
//! Grants are a fixed `Role -> &'static [&'static str]` mapping. Permission
//! strings take the `resource:action` form (for example `gate:approve`).
//! `admin` implicitly holds every permission, including ones that are not in
//! [`ALL_PERMISSIONS`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const PROJECT_CREATE: &str = "project:create";
pub const PROJECT_READ: &str = "project:read";
pub const PROJECT_UPDATE: &str = "project:update";
pub const PROJECT_DELETE: &str = "project:delete";
pub const ASSESSMENT_CREATE: &str = "assessment:create";
pub const ASSESSMENT_READ: &str = "assessment:read";
pub const INTAKE_SUBMIT: &str = "intake:submit";
pub const EXCEPTION_REQUEST: &str = "exception:request";
pub const EXCEPTION_READ: &str = "exception:read";
pub const EXCEPTION_APPROVE: &str = "exception:approve";
pub const RACI_READ: &str = "raci:read";
pub const RACI_UPDATE: &str = "raci:update";
pub const GATE_READ: &str = "gate:read";
pub const GATE_SUBMIT: &str = "gate:submit";
pub const GATE_APPROVE: &str = "gate:approve";
pub const REPORT_READ: &str = "report:read";
pub const REPORT_GENERATE: &str = "report:generate";
pub const ROI_CALCULATE: &str = "roi:calculate";
pub const VENDOR_EVALUATE: &str = "vendor:evaluate";
pub const ORG_MANAGE: &str = "org:manage";
pub const USER_MANAGE: &str = "user:manage";

/// Every permission the application checks.
pub const ALL_PERMISSIONS: &[&str] = &[
    PROJECT_CREATE,
    PROJECT_READ,
    PROJECT_UPDATE,
    PROJECT_DELETE,
    ASSESSMENT_CREATE,
    ASSESSMENT_READ,
    INTAKE_SUBMIT,
    EXCEPTION_REQUEST,
    EXCEPTION_READ,
    EXCEPTION_APPROVE,
    RACI_READ,
    RACI_UPDATE,
    GATE_READ,
    GATE_SUBMIT,
    GATE_APPROVE,
    REPORT_READ,
    REPORT_GENERATE,
    ROI_CALCULATE,
    VENDOR_EVALUATE,
    ORG_MANAGE,
    USER_MANAGE,
];

const EXECUTIVE_GRANTS: &[&str] = &[
    PROJECT_READ,
    ASSESSMENT_READ,
    EXCEPTION_READ,
    EXCEPTION_APPROVE,
    RACI_READ,
    GATE_READ,
    GATE_APPROVE,
    REPORT_READ,
    REPORT_GENERATE,
    ROI_CALCULATE,
    VENDOR_EVALUATE,
];

const ENGINEERING_GRANTS: &[&str] = &[
    PROJECT_CREATE,
    PROJECT_READ,
    PROJECT_UPDATE,
    ASSESSMENT_CREATE,
    ASSESSMENT_READ,
    INTAKE_SUBMIT,
    EXCEPTION_REQUEST,
    EXCEPTION_READ,
    RACI_READ,
    RACI_UPDATE,
    GATE_READ,
    GATE_SUBMIT,
    ROI_CALCULATE,
    VENDOR_EVALUATE,
];

const LEGAL_GRANTS: &[&str] = &[
    PROJECT_READ,
    ASSESSMENT_READ,
    EXCEPTION_READ,
    EXCEPTION_APPROVE,
    RACI_READ,
    GATE_READ,
    GATE_APPROVE,
    REPORT_READ,
];

const COMPLIANCE_GRANTS: &[&str] = &[
    PROJECT_READ,
    ASSESSMENT_CREATE,
    ASSESSMENT_READ,
    EXCEPTION_READ,
    EXCEPTION_APPROVE,
    RACI_READ,
    GATE_READ,
    GATE_APPROVE,
    REPORT_READ,
    REPORT_GENERATE,
    VENDOR_EVALUATE,
];

const MARKETING_GRANTS: &[&str] = &[
    PROJECT_READ,
    ASSESSMENT_READ,
    RACI_READ,
    GATE_READ,
    REPORT_READ,
    ROI_CALCULATE,
];

const CONSULTANT_GRANTS: &[&str] = &[
    PROJECT_READ,
    ASSESSMENT_CREATE,
    ASSESSMENT_READ,
    INTAKE_SUBMIT,
    EXCEPTION_READ,
    RACI_READ,
    GATE_READ,
    REPORT_READ,
    VENDOR_EVALUATE,
];

/// Application roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Executive,
    Engineering,
    Legal,
    Compliance,
    Marketing,
    Consultant,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Executive,
        Role::Engineering,
        Role::Legal,
        Role::Compliance,
        Role::Marketing,
        Role::Consultant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Executive => "executive",
            Role::Engineering => "engineering",
            Role::Legal => "legal",
            Role::Compliance => "compliance",
            Role::Marketing => "marketing",
            Role::Consultant => "consultant",
        }
    }

    /// Parse an externally supplied role name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Role> {
        name.parse().ok()
    }

    /// Explicit grants for this role. Empty for `admin`, whose access is implicit.
    fn grants(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[],
            Role::Executive => EXECUTIVE_GRANTS,
            Role::Engineering => ENGINEERING_GRANTS,
            Role::Legal => LEGAL_GRANTS,
            Role::Compliance => COMPLIANCE_GRANTS,
            Role::Marketing => MARKETING_GRANTS,
            Role::Consultant => CONSULTANT_GRANTS,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Role::from_str`] for names outside the role table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Outcome of [`can_perform_action`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

pub fn has_permission(role: Role, permission: &str) -> bool {
    role == Role::Admin || role.grants().contains(&permission)
}

/// The role's grant set. For `admin` this is the full catalogue.
pub fn get_permissions(role: Role) -> BTreeSet<&'static str> {
    match role {
        Role::Admin => ALL_PERMISSIONS.iter().copied().collect(),
        other => other.grants().iter().copied().collect(),
    }
}

/// Grant set for an externally supplied role name; empty when the role is unknown.
pub fn permissions_for_name(role: &str) -> BTreeSet<&'static str> {
    Role::parse(role).map(get_permissions).unwrap_or_default()
}

/// Reverse lookup: every role holding `permission`.
pub fn get_roles_with_permission(permission: &str) -> BTreeSet<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| has_permission(*role, permission))
        .collect()
}

/// Check tenant isolation, then RBAC.
///
/// A mismatched organization is always denied, for every role.
pub fn can_perform_action(
    role: Role,
    permission: &str,
    resource_org_id: &str,
    actor_org_id: &str,
) -> AccessDecision {
    if resource_org_id != actor_org_id {
        tracing::debug!(
            role = %role,
            permission,
            resource_org_id,
            actor_org_id,
            "Denied cross-tenant access"
        );
        return AccessDecision::deny(format!(
            "Cross-tenant access denied: resource belongs to organization {resource_org_id}"
        ));
    }

    if has_permission(role, permission) {
        AccessDecision::allow()
    } else {
        AccessDecision::deny(format!("Role {role} lacks permission {permission}"))
    }
}
