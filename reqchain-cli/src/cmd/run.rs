use std::path::Path;
use std::sync::Arc;

use reqchain_core::types::{ExecutionStatus, StepStatus, WorkflowDocument, WorkflowExecution};
use reqchain_exec::executor::{EventSink, NoOpEventSink, StdoutEventSink};
use reqchain_exec::{CancellationToken, ReqwestExecutor, WorkflowEngine};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{EventsMode, OutputArgs, PolicyArgs};

use super::config::{build_executor_config, load_definition};

pub async fn run_cmd(
    path: &Path,
    events: EventsMode,
    output: OutputArgs,
    policy: PolicyArgs,
) -> i32 {
    let def = match load_definition(path, &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    execute_document(&WorkflowDocument::transient(def), events, &output, &policy).await
}

/// Executes `doc` with the reqwest collaborator and reports the outcome. Ctrl-C cancels the run.
pub async fn execute_document(
    doc: &WorkflowDocument,
    events: EventsMode,
    output: &OutputArgs,
    policy: &PolicyArgs,
) -> i32 {
    let config = match build_executor_config(policy, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let executor = match ReqwestExecutor::new(config) {
        Ok(e) => e,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let sink: Arc<dyn EventSink> = match events {
        EventsMode::Stdout => Arc::new(StdoutEventSink),
        EventsMode::None => Arc::new(NoOpEventSink),
    };
    let engine = WorkflowEngine::new(Arc::new(executor)).with_event_sink(sink);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; aborting after the current step");
            on_interrupt.cancel();
        }
    });

    let execution = engine.execute(doc, &cancel).await;
    interrupt.abort();

    report_execution(doc, &execution, output);
    match execution.status {
        ExecutionStatus::Completed => exit_codes::SUCCESS,
        ExecutionStatus::Aborted => exit_codes::RUN_ABORTED,
        ExecutionStatus::Failed | ExecutionStatus::Running => exit_codes::RUN_FAILED,
    }
}

fn report_execution(doc: &WorkflowDocument, execution: &WorkflowExecution, output: &OutputArgs) {
    if output.format != OutputFormat::Text || output.quiet {
        print_result(output.format, output.quiet, execution);
        return;
    }

    println!(
        "workflow '{}' {} ({} of {} steps succeeded)",
        doc.name,
        execution.status.as_str(),
        execution.count(StepStatus::Success),
        execution.results.len()
    );
    for result in &execution.results {
        let name = doc
            .steps
            .iter()
            .find(|s| s.id == result.step_id)
            .map(|s| s.name.as_str())
            .unwrap_or(result.step_id.as_str());
        match &result.response {
            Some(resp) => println!(
                "  {:<8} {name}  {} {} ({} ms)",
                result.status.as_str(),
                resp.status,
                resp.status_text,
                resp.duration_ms
            ),
            None => println!("  {:<8} {name}", result.status.as_str()),
        }
        if let Some(error) = &result.error {
            println!("           error: {error}");
        }
        for warning in &result.warnings {
            println!("           warning: {warning}");
        }
    }
    if !execution.variables.is_empty() {
        println!("variables:");
        for (name, value) in &execution.variables {
            println!("  {name} = {value}");
        }
    }
}
