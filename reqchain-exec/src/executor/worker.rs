use std::any::Any;
use std::panic::AssertUnwindSafe;

use chrono::Utc;
use futures_util::FutureExt;
use tracing::{debug, warn};

use reqchain_core::extract::extract;
use reqchain_core::types::{
    StepExecutionResult, StepStatus, Variables, WorkflowDocument, WorkflowStep,
};

use crate::executor::http::RequestExecutor;
use crate::executor::request::build_request;
use crate::policy::redact_headers;

/// Runs one step against `variables` and reports the outcome. Never panics, even when the
/// collaborator does.
pub async fn execute_step(
    executor: &dyn RequestExecutor,
    workflow: &WorkflowDocument,
    step: &WorkflowStep,
    variables: &Variables,
) -> StepExecutionResult {
    let mut result = StepExecutionResult::running(step.id.clone(), Utc::now());

    let request = build_request(workflow, step, variables);
    debug!(
        step_id = %step.id,
        method = %request.method,
        url = %request.url,
        headers = ?redact_headers(&request.headers, &[]),
        "dispatching request"
    );

    let sent = AssertUnwindSafe(executor.execute(request))
        .catch_unwind()
        .await;

    match sent {
        Ok(Ok(response)) => {
            if !step.extractions.is_empty() {
                match response.body.as_ref() {
                    Some(body) => {
                        let outcome = extract(body, &step.extractions);
                        for problem in &outcome.errors {
                            warn!(step_id = %step.id, "extraction failed: {problem}");
                        }
                        result.extracted_variables = outcome.extracted;
                        result.warnings = outcome.errors;
                    }
                    None => warn!(step_id = %step.id, "response has no body; nothing extracted"),
                }
            }
            result.response = Some(response);
            result.status = StepStatus::Success;
        }
        Ok(Err(err)) => {
            result.error = Some(err.to_string());
            result.response = err.into_response();
            result.status = StepStatus::Failure;
        }
        Err(panic) => {
            result.error = Some(format!("request executor panicked: {}", panic_message(&*panic)));
            result.status = StepStatus::Failure;
        }
    }

    result.completed_at = Some(Utc::now());
    result
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
