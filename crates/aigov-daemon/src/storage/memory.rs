//! In-memory storage implementation

use super::traits::*;
use crate::error::StorageError;
use crate::models::{Project, RaciMatrix};
use aigov_rules::{GateReview, GateStatus, IntakeResult, RiskException};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStorage {
    projects: Arc<RwLock<HashMap<String, Project>>>,
    intakes: Arc<RwLock<HashMap<String, IntakeResult>>>,
    exceptions: Arc<RwLock<HashMap<String, RiskException>>>,
    raci: Arc<RwLock<HashMap<String, RaciMatrix>>>,
    gate_reviews: Arc<RwLock<HashMap<String, GateReview>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
            intakes: Arc::new(RwLock::new(HashMap::new())),
            exceptions: Arc::new(RwLock::new(HashMap::new())),
            raci: Arc::new(RwLock::new(HashMap::new())),
            gate_reviews: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Read, transform and write one record under a single write guard
async fn transition<T: Clone + Send + Sync>(
    records: &RwLock<HashMap<String, T>>,
    kind: &str,
    id: &str,
    apply: Transition<T>,
) -> StorageResult<T> {
    let mut records = records.write().await;
    let current = records
        .get(id)
        .ok_or_else(|| StorageError::NotFound(format!("{} {} not found", kind, id)))?;
    let next = apply(current)?;
    records.insert(id.to_string(), next.clone());
    Ok(next)
}

#[async_trait]
impl ProjectStorage for InMemoryStorage {
    async fn get_project(&self, id: &str) -> StorageResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(id).cloned())
    }

    async fn list_projects(&self, organization_id: &str) -> StorageResult<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut listed: Vec<_> = projects
            .values()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn upsert_project(&self, project: Project) -> StorageResult<()> {
        let mut projects = self.projects.write().await;
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn update_project(&self, id: &str, apply: Transition<Project>) -> StorageResult<Project> {
        transition(&self.projects, "Project", id, apply).await
    }

    async fn delete_project(&self, id: &str) -> StorageResult<bool> {
        let removed = self.projects.write().await.remove(id).is_some();
        if removed {
            self.intakes.write().await.remove(id);
            self.raci.write().await.remove(id);
            self.exceptions
                .write()
                .await
                .retain(|_, e| e.project_id != id);
            self.gate_reviews
                .write()
                .await
                .retain(|_, g| g.project_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl IntakeStorage for InMemoryStorage {
    async fn get_intake(&self, project_id: &str) -> StorageResult<Option<IntakeResult>> {
        let intakes = self.intakes.read().await;
        Ok(intakes.get(project_id).cloned())
    }

    async fn put_intake(&self, result: IntakeResult) -> StorageResult<()> {
        let mut intakes = self.intakes.write().await;
        intakes.insert(result.project_id.clone(), result);
        Ok(())
    }
}

#[async_trait]
impl ExceptionStorage for InMemoryStorage {
    async fn get_exception(&self, id: &str) -> StorageResult<Option<RiskException>> {
        let exceptions = self.exceptions.read().await;
        Ok(exceptions.get(id).cloned())
    }

    async fn list_exceptions_for_project(&self, project_id: &str) -> StorageResult<Vec<RiskException>> {
        let exceptions = self.exceptions.read().await;
        Ok(sorted_by_creation(
            exceptions.values().filter(|e| e.project_id == project_id),
        ))
    }

    async fn list_exceptions_for_org(&self, organization_id: &str) -> StorageResult<Vec<RiskException>> {
        let exceptions = self.exceptions.read().await;
        Ok(sorted_by_creation(
            exceptions
                .values()
                .filter(|e| e.organization_id == organization_id),
        ))
    }

    async fn list_all_exceptions(&self) -> StorageResult<Vec<RiskException>> {
        let exceptions = self.exceptions.read().await;
        Ok(sorted_by_creation(exceptions.values()))
    }

    async fn upsert_exception(&self, exception: RiskException) -> StorageResult<()> {
        let mut exceptions = self.exceptions.write().await;
        exceptions.insert(exception.id.clone(), exception);
        Ok(())
    }

    async fn transition_exception(
        &self,
        id: &str,
        apply: Transition<RiskException>,
    ) -> StorageResult<RiskException> {
        transition(&self.exceptions, "Risk exception", id, apply).await
    }
}

fn sorted_by_creation<'a>(iter: impl Iterator<Item = &'a RiskException>) -> Vec<RiskException> {
    let mut out: Vec<_> = iter.cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    out
}

#[async_trait]
impl RaciStorage for InMemoryStorage {
    async fn get_raci(&self, project_id: &str) -> StorageResult<Option<RaciMatrix>> {
        let raci = self.raci.read().await;
        Ok(raci.get(project_id).cloned())
    }

    async fn put_raci(&self, matrix: RaciMatrix) -> StorageResult<()> {
        let mut raci = self.raci.write().await;
        raci.insert(matrix.project_id.clone(), matrix);
        Ok(())
    }
}

#[async_trait]
impl GateStorage for InMemoryStorage {
    async fn get_gate_review(&self, id: &str) -> StorageResult<Option<GateReview>> {
        let reviews = self.gate_reviews.read().await;
        Ok(reviews.get(id).cloned())
    }

    async fn list_gate_reviews(&self, project_id: &str) -> StorageResult<Vec<GateReview>> {
        let reviews = self.gate_reviews.read().await;
        let mut listed: Vec<_> = reviews
            .values()
            .filter(|g| g.project_id == project_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(listed)
    }

    async fn insert_gate_review(&self, review: GateReview) -> StorageResult<()> {
        let mut reviews = self.gate_reviews.write().await;
        if reviews.values().any(|r| {
            r.project_id == review.project_id
                && r.gate == review.gate
                && r.status == GateStatus::Pending
        }) {
            return Err(StorageError::Conflict(format!(
                "Project {} already has a pending {} review",
                review.project_id,
                review.gate.as_str()
            )));
        }
        reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn transition_gate_review(
        &self,
        id: &str,
        apply: Transition<GateReview>,
    ) -> StorageResult<GateReview> {
        transition(&self.gate_reviews, "Gate review", id, apply).await
    }
}

impl Storage for InMemoryStorage {}
