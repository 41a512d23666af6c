use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{WorkflowAuth, WorkflowStep};

/// The portable part of a workflow: everything except store-assigned fields.
///
/// This is what export writes and import produces.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "serverUrl")]
    pub server_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sharedAuth")]
    pub shared_auth: Option<WorkflowAuth>,

    pub steps: Vec<WorkflowStep>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, server_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            server_url: server_url.into(),
            shared_auth: None,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }
}

/// A persisted workflow. `id` and `created_at` never change once assigned by a store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowDocument {
    pub id: Uuid,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "serverUrl")]
    pub server_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sharedAuth")]
    pub shared_auth: Option<WorkflowAuth>,

    pub steps: Vec<WorkflowStep>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDocument {
    pub fn from_definition(id: Uuid, def: WorkflowDefinition, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: def.name,
            description: def.description,
            server_url: def.server_url,
            shared_auth: def.shared_auth,
            steps: def.steps,
            created_at: now,
            updated_at: now,
        }
    }

    /// Wrap an unsaved definition so it can be executed directly.
    pub fn transient(def: WorkflowDefinition) -> Self {
        Self::from_definition(Uuid::new_v4(), def, Utc::now())
    }

    pub fn definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            server_url: self.server_url.clone(),
            shared_auth: self.shared_auth.clone(),
            steps: self.steps.clone(),
        }
    }
}
