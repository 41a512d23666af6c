use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use reqchain_core::types::{WorkflowAuth, WorkflowDocument, WorkflowStep};

use crate::store::StoreError;

const COLUMNS: &str =
    "id, name, description, server_url, shared_auth, steps, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct WorkflowRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub server_url: String,
    pub shared_auth: Option<JsonValue>,
    pub steps: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WorkflowRow> for WorkflowDocument {
    type Error = StoreError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        let shared_auth = row
            .shared_auth
            .map(serde_json::from_value::<WorkflowAuth>)
            .transpose()?;
        let steps = serde_json::from_value::<Vec<WorkflowStep>>(row.steps)?;
        Ok(WorkflowDocument {
            id: row.id,
            name: row.name,
            description: row.description,
            server_url: row.server_url,
            shared_auth,
            steps,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode(doc: &WorkflowDocument) -> Result<(Option<JsonValue>, JsonValue), StoreError> {
    let shared_auth = doc
        .shared_auth
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;
    let steps = serde_json::to_value(&doc.steps)?;
    Ok((shared_auth, steps))
}

pub async fn insert_workflow(pool: &PgPool, doc: &WorkflowDocument) -> Result<(), StoreError> {
    let (shared_auth, steps) = encode(doc)?;
    sqlx::query(
        r#"
INSERT INTO workflows (id, name, description, server_url, shared_auth, steps, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(doc.id)
    .bind(&doc.name)
    .bind(&doc.description)
    .bind(&doc.server_url)
    .bind(shared_auth)
    .bind(steps)
    .bind(doc.created_at)
    .bind(doc.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_workflow(pool: &PgPool, id: Uuid) -> Result<Option<WorkflowDocument>, StoreError> {
    let row = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(WorkflowDocument::try_from).transpose()
}

pub async fn list_workflows(pool: &PgPool) -> Result<Vec<WorkflowDocument>, StoreError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(WorkflowDocument::try_from).collect()
}

pub async fn lock_workflow(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<WorkflowDocument>, StoreError> {
    let row = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    row.map(WorkflowDocument::try_from).transpose()
}

pub async fn save_workflow(
    tx: &mut Transaction<'_, Postgres>,
    doc: &WorkflowDocument,
) -> Result<(), StoreError> {
    let (shared_auth, steps) = encode(doc)?;
    sqlx::query(
        r#"
UPDATE workflows
SET name = $2, description = $3, server_url = $4, shared_auth = $5, steps = $6, updated_at = $7
WHERE id = $1
        "#,
    )
    .bind(doc.id)
    .bind(&doc.name)
    .bind(&doc.description)
    .bind(&doc.server_url)
    .bind(shared_auth)
    .bind(steps)
    .bind(doc.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Returns `false` when no row matched.
pub async fn delete_workflow(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM workflows WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
