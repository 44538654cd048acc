//! Records owned by the service layer

use aigov_rules::{RaciAssignment, RiskPath};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An AI initiative under governance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    /// Latest intake score, if an intake has been submitted
    pub intake_score: Option<u8>,
    pub risk_path: Option<RiskPath>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored RACI matrix for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaciMatrix {
    pub project_id: String,
    pub organization_id: String,
    pub assignments: Vec<RaciAssignment>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}
