//! Storage trait definitions

use crate::error::StorageError;
use crate::models::{Project, RaciMatrix};
use aigov_rules::{GateReview, IntakeResult, RiskException};
use async_trait::async_trait;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Computes the next version of a record from the stored one. Backends run it
/// while holding the record's write lock, so the read and the write are one step.
pub type Transition<T> = Box<dyn FnOnce(&T) -> aigov_rules::Result<T> + Send>;

/// Combined storage trait
#[async_trait]
pub trait Storage:
    ProjectStorage + IntakeStorage + ExceptionStorage + RaciStorage + GateStorage + Send + Sync
{
}

/// Storage for projects
#[async_trait]
pub trait ProjectStorage: Send + Sync {
    /// Get a project by ID
    async fn get_project(&self, id: &str) -> StorageResult<Option<Project>>;

    /// List projects belonging to an organization
    async fn list_projects(&self, organization_id: &str) -> StorageResult<Vec<Project>>;

    /// Create or update a project
    async fn upsert_project(&self, project: Project) -> StorageResult<()>;

    /// Apply `apply` to the stored project and persist the result
    async fn update_project(&self, id: &str, apply: Transition<Project>) -> StorageResult<Project>;

    /// Delete a project and everything attached to it
    async fn delete_project(&self, id: &str) -> StorageResult<bool>;
}

/// Storage for intake results
#[async_trait]
pub trait IntakeStorage: Send + Sync {
    /// Latest intake result for a project
    async fn get_intake(&self, project_id: &str) -> StorageResult<Option<IntakeResult>>;

    /// Replace the intake result for a project
    async fn put_intake(&self, result: IntakeResult) -> StorageResult<()>;
}

/// Storage for risk exceptions
#[async_trait]
pub trait ExceptionStorage: Send + Sync {
    /// Get an exception by ID
    async fn get_exception(&self, id: &str) -> StorageResult<Option<RiskException>>;

    /// List exceptions for a project, oldest first
    async fn list_exceptions_for_project(&self, project_id: &str) -> StorageResult<Vec<RiskException>>;

    /// List exceptions for an organization
    async fn list_exceptions_for_org(&self, organization_id: &str) -> StorageResult<Vec<RiskException>>;

    /// List every exception
    async fn list_all_exceptions(&self) -> StorageResult<Vec<RiskException>>;

    /// Create or update an exception
    async fn upsert_exception(&self, exception: RiskException) -> StorageResult<()>;

    /// Apply a lifecycle transition to the stored exception and persist the result
    async fn transition_exception(
        &self,
        id: &str,
        apply: Transition<RiskException>,
    ) -> StorageResult<RiskException>;
}

/// Storage for RACI matrices
#[async_trait]
pub trait RaciStorage: Send + Sync {
    async fn get_raci(&self, project_id: &str) -> StorageResult<Option<RaciMatrix>>;

    async fn put_raci(&self, matrix: RaciMatrix) -> StorageResult<()>;
}

/// Storage for gate reviews
#[async_trait]
pub trait GateStorage: Send + Sync {
    /// Get a gate review by ID
    async fn get_gate_review(&self, id: &str) -> StorageResult<Option<GateReview>>;

    /// List reviews for a project, oldest first
    async fn list_gate_reviews(&self, project_id: &str) -> StorageResult<Vec<GateReview>>;

    /// Store a new review. Fails with a conflict when the project already has a
    /// pending review for the same gate.
    async fn insert_gate_review(&self, review: GateReview) -> StorageResult<()>;

    /// Apply a decision to the stored review and persist the result
    async fn transition_gate_review(
        &self,
        id: &str,
        apply: Transition<GateReview>,
    ) -> StorageResult<GateReview>;
}
