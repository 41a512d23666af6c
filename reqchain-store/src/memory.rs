use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use reqchain_core::types::{WorkflowDefinition, WorkflowDocument};

use crate::store::{StoreError, WorkflowPatch, WorkflowStore};

/// Process-local store, used by tests and one-shot CLI runs. Keeps insertion order.
#[derive(Default)]
pub struct MemoryStore {
    workflows: RwLock<Vec<WorkflowDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.workflows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workflows.read().await.is_empty()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn create_workflow(
        &self,
        def: WorkflowDefinition,
    ) -> Result<WorkflowDocument, StoreError> {
        let doc = WorkflowDocument::from_definition(Uuid::new_v4(), def, Utc::now());
        self.workflows.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowDocument>, StoreError> {
        Ok(self
            .workflows
            .read()
            .await
            .iter()
            .find(|w| w.id == id)
            .cloned())
    }

    async fn get_all_workflows(&self) -> Result<Vec<WorkflowDocument>, StoreError> {
        Ok(self.workflows.read().await.clone())
    }

    async fn update_workflow(
        &self,
        id: Uuid,
        patch: WorkflowPatch,
    ) -> Result<WorkflowDocument, StoreError> {
        let mut workflows = self.workflows.write().await;
        let doc = workflows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(doc, Utc::now());
        Ok(doc.clone())
    }

    async fn delete_workflow(&self, id: Uuid) -> Result<(), StoreError> {
        let mut workflows = self.workflows.write().await;
        let index = workflows
            .iter()
            .position(|w| w.id == id)
            .ok_or(StoreError::NotFound(id))?;
        workflows.remove(index);
        Ok(())
    }
}
