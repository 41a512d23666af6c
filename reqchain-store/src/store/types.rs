use chrono::{DateTime, Utc};

use reqchain_core::types::{WorkflowAuth, WorkflowDocument, WorkflowStep};

/// Partial update for a stored workflow. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct WorkflowPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub server_url: Option<String>,
    /// `Some(None)` clears the shared auth.
    pub shared_auth: Option<Option<WorkflowAuth>>,
    pub steps: Option<Vec<WorkflowStep>>,
}

impl WorkflowPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.server_url.is_none()
            && self.shared_auth.is_none()
            && self.steps.is_none()
    }

    pub fn apply(self, doc: &mut WorkflowDocument, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            doc.name = name;
        }
        if let Some(description) = self.description {
            doc.description = description;
        }
        if let Some(server_url) = self.server_url {
            doc.server_url = server_url;
        }
        if let Some(shared_auth) = self.shared_auth {
            doc.shared_auth = shared_auth;
        }
        if let Some(steps) = self.steps {
            doc.steps = steps;
        }
        doc.updated_at = now;
    }
}
