//! Stage-gate reviews.
//!
//! A review is opened `pending` for one gate of a project and decided once,
//! to `approved` or `rejected`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RulesError};
use crate::intake::RiskPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Ideation,
    Design,
    Build,
    Deploy,
    Monitor,
}

impl Gate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gate::Ideation => "ideation",
            Gate::Design => "design",
            Gate::Build => "build",
            Gate::Deploy => "deploy",
            Gate::Monitor => "monitor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GateStatus::Pending => "pending",
            GateStatus::Approved => "approved",
            GateStatus::Rejected => "rejected",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Approve,
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGateReview {
    pub project_id: String,
    pub organization_id: String,
    pub gate: Gate,
    pub submitted_by: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReview {
    pub id: String,
    pub project_id: String,
    pub organization_id: String,
    pub gate: Gate,
    pub status: GateStatus,
    pub submitted_by: String,
    pub evidence: Vec<String>,
    pub reviewer_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

pub fn open_gate_review(input: &NewGateReview, now: DateTime<Utc>) -> Result<GateReview> {
    if input.submitted_by.trim().is_empty() {
        return Err(RulesError::validation("submitted_by must not be empty"));
    }
    Ok(GateReview {
        id: Uuid::new_v4().to_string(),
        project_id: input.project_id.clone(),
        organization_id: input.organization_id.clone(),
        gate: input.gate,
        status: GateStatus::Pending,
        submitted_by: input.submitted_by.clone(),
        evidence: input.evidence.clone(),
        reviewer_id: None,
        notes: None,
        created_at: now,
        decided_at: None,
    })
}

/// Decide a pending review.
pub fn decide_gate(
    review: &GateReview,
    decision: GateDecision,
    reviewer_id: &str,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<GateReview> {
    if review.status != GateStatus::Pending {
        return Err(RulesError::InvalidState {
            entity: "gate review",
            id: review.id.clone(),
            status: review.status.to_string(),
            action: "decide",
        });
    }
    let status = match decision {
        GateDecision::Approve => GateStatus::Approved,
        GateDecision::Reject => GateStatus::Rejected,
    };
    Ok(GateReview {
        status,
        reviewer_id: Some(reviewer_id.to_string()),
        notes: notes.map(str::to_string),
        decided_at: Some(now),
        ..review.clone()
    })
}

/// Preconditions for approving `gate`.
///
/// A `high_risk` project cannot pass the deploy gate while any of its risk
/// exceptions is still awaiting a decision.
pub fn check_gate_approval(
    gate: Gate,
    risk_path: Option<RiskPath>,
    pending_exceptions: usize,
) -> Result<()> {
    if gate == Gate::Deploy && risk_path == Some(RiskPath::HighRisk) && pending_exceptions > 0 {
        return Err(RulesError::validation(format!(
            "high_risk project has {pending_exceptions} undecided risk exception(s); resolve them before the deploy gate"
        )));
    }
    Ok(())
}
