//! Risk exception lifecycle.
//!
//! `requested -> approved | denied`. `expired` is never stored: an approved
//! exception whose `expires_at` has passed reports [`ExceptionStatus::Expired`]
//! from [`RiskException::effective_status`] and lands in the `expired` bucket of
//! [`check_expirations`].
//!
//! Every transition borrows its input and returns a new record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RulesError};

pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 365;
/// Default look-ahead window for [`check_expirations`].
pub const DEFAULT_EXPIRY_LOOKAHEAD_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionStatus {
    Requested,
    Approved,
    Denied,
    Expired,
}

impl ExceptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionStatus::Requested => "requested",
            ExceptionStatus::Approved => "approved",
            ExceptionStatus::Denied => "denied",
            ExceptionStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for ExceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for [`create_risk_exception`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRiskException {
    pub project_id: String,
    pub organization_id: String,
    pub title: String,
    pub justification: String,
    pub compensating_controls: Vec<String>,
    pub requested_by: String,
    pub duration_days: u32,
}

/// A time-bounded waiver for a known control gap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskException {
    pub id: String,
    pub project_id: String,
    pub organization_id: String,
    pub title: String,
    pub justification: String,
    pub compensating_controls: Vec<String>,
    pub status: ExceptionStatus,
    pub requested_by: String,
    pub approved_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub duration_days: u32,
}

impl RiskException {
    /// Stored status, with `approved` reported as `expired` once `expires_at` has passed.
    pub fn effective_status(&self, now: DateTime<Utc>) -> ExceptionStatus {
        if self.is_expired(now) {
            ExceptionStatus::Expired
        } else {
            self.status
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == ExceptionStatus::Approved && self.expires_at.is_some_and(|at| at < now)
    }

    fn ensure_requested(&self, action: &'static str) -> Result<()> {
        if self.status == ExceptionStatus::Requested {
            Ok(())
        } else {
            Err(RulesError::InvalidState {
                entity: "risk exception",
                id: self.id.clone(),
                status: self.status.to_string(),
                action,
            })
        }
    }
}

/// Validate `input` and build a `requested` exception.
pub fn create_risk_exception(input: &NewRiskException, now: DateTime<Utc>) -> Result<RiskException> {
    if input.title.trim().is_empty() {
        return Err(RulesError::validation("title must not be empty"));
    }
    if input.justification.trim().is_empty() {
        return Err(RulesError::validation("justification must not be empty"));
    }
    if input.compensating_controls.is_empty() {
        return Err(RulesError::validation(
            "compensating_controls must contain at least one control",
        ));
    }
    if input.compensating_controls.iter().any(|c| c.trim().is_empty()) {
        return Err(RulesError::validation(
            "compensating_controls must not contain blank entries",
        ));
    }
    if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&input.duration_days) {
        return Err(RulesError::validation(format!(
            "duration_days must be between {MIN_DURATION_DAYS} and {MAX_DURATION_DAYS}, got {}",
            input.duration_days
        )));
    }

    Ok(RiskException {
        id: Uuid::new_v4().to_string(),
        project_id: input.project_id.clone(),
        organization_id: input.organization_id.clone(),
        title: input.title.clone(),
        justification: input.justification.clone(),
        compensating_controls: input.compensating_controls.clone(),
        status: ExceptionStatus::Requested,
        requested_by: input.requested_by.clone(),
        approved_by: None,
        notes: None,
        created_at: now,
        expires_at: None,
        duration_days: input.duration_days,
    })
}

/// Approve a `requested` exception. The expiry runs from the approval instant.
pub fn approve_exception(
    exception: &RiskException,
    approver_id: &str,
    now: DateTime<Utc>,
) -> Result<RiskException> {
    exception.ensure_requested("approve")?;

    let expires_at = now + Duration::days(i64::from(exception.duration_days));
    tracing::debug!(
        exception_id = %exception.id,
        approver_id,
        expires_at = %expires_at,
        "Approved risk exception"
    );

    Ok(RiskException {
        status: ExceptionStatus::Approved,
        approved_by: Some(approver_id.to_string()),
        expires_at: Some(expires_at),
        ..exception.clone()
    })
}

/// Deny a `requested` exception, keeping `notes` verbatim.
pub fn deny_exception(
    exception: &RiskException,
    approver_id: &str,
    notes: &str,
) -> Result<RiskException> {
    exception.ensure_requested("deny")?;

    tracing::debug!(exception_id = %exception.id, approver_id, "Denied risk exception");

    Ok(RiskException {
        status: ExceptionStatus::Denied,
        approved_by: Some(approver_id.to_string()),
        notes: Some(notes.to_string()),
        ..exception.clone()
    })
}

/// Approved exceptions bucketed by expiry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationReport {
    pub expired: Vec<RiskException>,
    pub expiring_soon: Vec<RiskException>,
}

impl ExpirationReport {
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.expiring_soon.is_empty()
    }
}

/// Scan approved exceptions for ones past expiry or within `lookahead` of it.
///
/// `requested` and `denied` records are skipped whatever their `expires_at`.
pub fn check_expirations(
    exceptions: &[RiskException],
    now: DateTime<Utc>,
    lookahead: Duration,
) -> ExpirationReport {
    let horizon = now + lookahead;
    let mut report = ExpirationReport::default();

    for exception in exceptions
        .iter()
        .filter(|e| e.status == ExceptionStatus::Approved)
    {
        let Some(expires_at) = exception.expires_at else {
            continue;
        };
        if expires_at < now {
            report.expired.push(exception.clone());
        } else if expires_at <= horizon {
            report.expiring_soon.push(exception.clone());
        }
    }

    report
}
