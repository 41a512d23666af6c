use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{AnyValue, StringMap, Variables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
    Aborted,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Success,
    Failure,
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Running => "running",
            StepStatus::Success => "success",
            StepStatus::Failure => "failure",
            StepStatus::Skipped => "skipped",
        }
    }
}

/// What the execution collaborator reported back for one request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,

    #[serde(default, rename = "statusText")]
    pub status_text: String,

    #[serde(default)]
    pub headers: StringMap,

    /// JSON when the body parsed as JSON, a JSON string otherwise, absent when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<AnyValue>,

    #[serde(default, rename = "durationMs")]
    pub duration_ms: u64,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepExecutionResult {
    #[serde(rename = "stepId")]
    pub step_id: String,

    pub status: StepStatus,

    #[serde(rename = "extractedVariables")]
    pub extracted_variables: Variables,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseEnvelope>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Non-fatal extraction problems, one entry per unresolved rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StepExecutionResult {
    pub fn running(step_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            step_id: step_id.into(),
            status: StepStatus::Running,
            extracted_variables: Variables::new(),
            response: None,
            error: None,
            warnings: Vec::new(),
            started_at: Some(started_at),
            completed_at: None,
        }
    }

    pub fn skipped(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            status: StepStatus::Skipped,
            extracted_variables: Variables::new(),
            response: None,
            error: None,
            warnings: Vec::new(),
            started_at: None,
            completed_at: None,
        }
    }
}

/// The run-time record of one execution.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowExecution {
    pub id: Uuid,

    #[serde(rename = "workflowId")]
    pub workflow_id: Uuid,

    pub status: ExecutionStatus,

    #[serde(rename = "currentStepIndex")]
    pub current_step_index: usize,

    pub results: Vec<StepExecutionResult>,

    pub variables: Variables,

    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowExecution {
    pub fn start(workflow_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id,
            status: ExecutionStatus::Running,
            current_step_index: 0,
            results: Vec::new(),
            variables: Variables::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}
