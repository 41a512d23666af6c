use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use reqchain_core::types::{WorkflowDefinition, WorkflowDocument};

use crate::store::{StoreError, WorkflowPatch, WorkflowStore};

use super::workflows;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WorkflowStore for PostgresStore {
    #[instrument(skip_all, fields(name = %def.name))]
    async fn create_workflow(
        &self,
        def: WorkflowDefinition,
    ) -> Result<WorkflowDocument, StoreError> {
        let doc = WorkflowDocument::from_definition(Uuid::new_v4(), def, Utc::now());
        workflows::insert_workflow(&self.pool, &doc).await?;
        debug!(id = %doc.id, "workflow created");
        Ok(doc)
    }

    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowDocument>, StoreError> {
        workflows::get_workflow(&self.pool, id).await
    }

    async fn get_all_workflows(&self) -> Result<Vec<WorkflowDocument>, StoreError> {
        workflows::list_workflows(&self.pool).await
    }

    #[instrument(skip(self, patch))]
    async fn update_workflow(
        &self,
        id: Uuid,
        patch: WorkflowPatch,
    ) -> Result<WorkflowDocument, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut doc = workflows::lock_workflow(&mut tx, id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(&mut doc, Utc::now());
        workflows::save_workflow(&mut tx, &doc).await?;
        tx.commit().await?;
        debug!("workflow updated");
        Ok(doc)
    }

    #[instrument(skip(self))]
    async fn delete_workflow(&self, id: Uuid) -> Result<(), StoreError> {
        if !workflows::delete_workflow(&self.pool, id).await? {
            return Err(StoreError::NotFound(id));
        }
        debug!("workflow deleted");
        Ok(())
    }
}
