use async_trait::async_trait;
use uuid::Uuid;

use reqchain_core::types::{WorkflowDefinition, WorkflowDocument};

use crate::store::types::WorkflowPatch;

/// Persists workflow documents for a hosting application. The engine never calls this; a
/// caller loads a document here and hands it to the engine.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Assigns a fresh id and sets both timestamps.
    async fn create_workflow(
        &self,
        def: WorkflowDefinition,
    ) -> Result<WorkflowDocument, StoreError>;

    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowDocument>, StoreError>;

    /// Oldest first.
    async fn get_all_workflows(&self) -> Result<Vec<WorkflowDocument>, StoreError>;

    /// Applies `patch` and bumps `updated_at`; `id` and `created_at` never change.
    async fn update_workflow(
        &self,
        id: Uuid,
        patch: WorkflowPatch,
    ) -> Result<WorkflowDocument, StoreError>;

    async fn delete_workflow(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("workflow {0} not found")]
    NotFound(Uuid),
    #[error("stored workflow is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}
