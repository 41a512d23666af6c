use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use reqchain_core::types::{StepExecutionResult, WorkflowExecution};

/// Lifecycle notifications emitted by the engine while an execution progresses.
#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        execution_id: Uuid,
        workflow_id: Uuid,
        step_count: usize,
    },
    StepStarted {
        execution_id: Uuid,
        step_id: String,
        index: usize,
    },
    /// Always precedes the `StepCompleted` carrying the failed result.
    StepFailed {
        execution_id: Uuid,
        step_id: String,
        error: String,
    },
    /// Emitted for every recorded result, skipped steps included.
    StepCompleted {
        execution_id: Uuid,
        result: StepExecutionResult,
    },
    RunFinished {
        execution: WorkflowExecution,
    },
}

impl Event {
    pub fn type_str(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::StepStarted { .. } => "step.started",
            Event::StepFailed { .. } => "step.failed",
            Event::StepCompleted { .. } => "step.completed",
            Event::RunFinished { .. } => "run.finished",
        }
    }

    pub fn execution_id(&self) -> Uuid {
        match self {
            Event::RunStarted { execution_id, .. }
            | Event::StepStarted { execution_id, .. }
            | Event::StepFailed { execution_id, .. }
            | Event::StepCompleted { execution_id, .. } => *execution_id,
            Event::RunFinished { execution } => execution.id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let ty = self.type_str();
        let execution_id = self.execution_id().to_string();
        match self {
            Event::RunStarted { workflow_id, step_count, .. } => {
                json!({ "type": ty, "execution_id": execution_id, "workflow_id": workflow_id.to_string(), "step_count": step_count })
            }
            Event::StepStarted { step_id, index, .. } => {
                json!({ "type": ty, "execution_id": execution_id, "step_id": step_id, "index": index })
            }
            Event::StepFailed { step_id, error, .. } => {
                json!({ "type": ty, "execution_id": execution_id, "step_id": step_id, "error": error })
            }
            Event::StepCompleted { result, .. } => {
                json!({
                    "type": ty,
                    "execution_id": execution_id,
                    "step_id": result.step_id,
                    "status": result.status.as_str(),
                    "http_status": result.response.as_ref().map(|r| r.status),
                    "extracted": result.extracted_variables.keys().collect::<Vec<_>>(),
                    "warnings": result.warnings,
                })
            }
            Event::RunFinished { execution } => {
                json!({ "type": ty, "execution_id": execution_id, "status": execution.status.as_str() })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes one JSON object per event to stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

/// Forwards events to an async consumer, e.g. a UI task. A closed receiver is ignored.
pub struct ChannelEventSink {
    tx: UnboundedSender<Event>,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
