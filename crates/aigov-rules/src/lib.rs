#![deny(unsafe_code)]
//! Governance rules for AI project oversight.
//!
//! This crate provides:
//! - **Permission table** with tenant isolation ([`permissions`]).
//! - **Intake scorecard** that triages projects onto a [`RiskPath`].
//! - **Risk exception lifecycle** and expiration scan ([`exception`]).
//! - **Stage-gate reviews** ([`gate`]) and **RACI validation** ([`raci`]).
//! - **ROI** and **vendor scoring** calculators.
//!
//! Everything here is pure: no I/O, no shared mutable state. Callers own
//! persistence.

pub mod error;
pub mod exception;
pub mod gate;
pub mod intake;
pub mod permissions;
pub mod raci;
pub mod roi;
pub mod vendor;

// Re-exports for convenience.
pub use error::{Result, RulesError};
pub use exception::{
    approve_exception, check_expirations, create_risk_exception, deny_exception,
    ExceptionStatus, ExpirationReport, NewRiskException, RiskException,
};
pub use gate::{
    check_gate_approval, decide_gate, open_gate_review, Gate, GateDecision, GateReview,
    GateStatus, NewGateReview,
};
pub use intake::{
    score_intake, score_intake_verified, IntakeQuestion, IntakeResponse, IntakeResult, RiskPath,
    QUESTION_BANK,
};
pub use permissions::{
    can_perform_action, get_permissions, get_roles_with_permission, has_permission,
    permissions_for_name, AccessDecision, Role,
};
pub use raci::{raci_findings, validate_raci, RaciAssignment, Responsibility};
pub use roi::{calculate_roi, RoiInput, RoiResult};
pub use vendor::{score_vendor, VendorCriterion, VendorRating, VendorScore, VendorTier};
