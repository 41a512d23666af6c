use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use reqchain_core::types::{
    sorted_steps, ExecutionStatus, StepExecutionResult, StepStatus, WorkflowDocument,
    WorkflowExecution, WorkflowStep,
};

use crate::executor::events::{Event, EventSink, NoOpEventSink};
use crate::executor::http::RequestExecutor;
use crate::executor::worker::execute_step;

/// Runs a workflow's steps strictly in order, threading extracted variables from each step
/// into the next.
pub struct WorkflowEngine {
    executor: Arc<dyn RequestExecutor>,
    event_sink: Arc<dyn EventSink>,
}

impl WorkflowEngine {
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Executes `workflow` to a terminal state.
    ///
    /// The first failing step stops the run and marks the rest `skipped`. Cancelling `cancel`
    /// is observed before each step and again once an in-flight request returns; in the latter
    /// case the returned response is discarded and the current step is recorded as skipped.
    #[instrument(
        name = "workflow.execute",
        skip_all,
        fields(
            workflow_id = %workflow.id,
            workflow = %workflow.name,
            execution_id = tracing::field::Empty
        )
    )]
    pub async fn execute(
        &self,
        workflow: &WorkflowDocument,
        cancel: &CancellationToken,
    ) -> WorkflowExecution {
        let mut execution = WorkflowExecution::start(workflow.id);
        tracing::Span::current().record("execution_id", tracing::field::display(execution.id));

        let steps = sorted_steps(&workflow.steps);
        info!(steps = steps.len(), "execution started");
        self.event_sink
            .emit(Event::RunStarted {
                execution_id: execution.id,
                workflow_id: workflow.id,
                step_count: steps.len(),
            })
            .await;

        for (index, step) in steps.iter().enumerate() {
            execution.current_step_index = index;

            if cancel.is_cancelled() {
                info!(step_id = %step.id, "aborted before step");
                self.skip_remaining(&mut execution, &steps[index..]).await;
                return self.finish(execution, ExecutionStatus::Aborted).await;
            }

            self.event_sink
                .emit(Event::StepStarted {
                    execution_id: execution.id,
                    step_id: step.id.clone(),
                    index,
                })
                .await;

            let result =
                execute_step(self.executor.as_ref(), workflow, step, &execution.variables).await;

            if cancel.is_cancelled() {
                info!(step_id = %step.id, "aborted with request in flight; response discarded");
                self.skip_remaining(&mut execution, &steps[index..]).await;
                return self.finish(execution, ExecutionStatus::Aborted).await;
            }

            if result.status == StepStatus::Failure {
                let error = result.error.clone().unwrap_or_default();
                warn!(step_id = %step.id, %error, "step failed");
                self.event_sink
                    .emit(Event::StepFailed {
                        execution_id: execution.id,
                        step_id: step.id.clone(),
                        error,
                    })
                    .await;
                self.record(&mut execution, result).await;
                self.skip_remaining(&mut execution, &steps[index + 1..]).await;
                return self.finish(execution, ExecutionStatus::Failed).await;
            }

            info!(
                step_id = %step.id,
                extracted = result.extracted_variables.len(),
                warnings = result.warnings.len(),
                "step succeeded"
            );
            execution
                .variables
                .extend(result.extracted_variables.iter().map(|(k, v)| (k.clone(), v.clone())));
            self.record(&mut execution, result).await;
        }

        self.finish(execution, ExecutionStatus::Completed).await
    }

    async fn record(&self, execution: &mut WorkflowExecution, result: StepExecutionResult) {
        execution.results.push(result.clone());
        self.event_sink
            .emit(Event::StepCompleted {
                execution_id: execution.id,
                result,
            })
            .await;
    }

    async fn skip_remaining(&self, execution: &mut WorkflowExecution, steps: &[&WorkflowStep]) {
        for step in steps {
            self.record(execution, StepExecutionResult::skipped(step.id.clone()))
                .await;
        }
    }

    async fn finish(
        &self,
        mut execution: WorkflowExecution,
        status: ExecutionStatus,
    ) -> WorkflowExecution {
        execution.status = status;
        execution.completed_at = Some(Utc::now());
        info!(
            status = status.as_str(),
            succeeded = execution.count(StepStatus::Success),
            skipped = execution.count(StepStatus::Skipped),
            "execution finished"
        );
        self.event_sink
            .emit(Event::RunFinished {
                execution: execution.clone(),
            })
            .await;
        execution
    }
}
