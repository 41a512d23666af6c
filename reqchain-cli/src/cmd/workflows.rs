use std::path::Path;

use reqchain_core::types::WorkflowDocument;
use reqchain_core::export_definition;
use reqchain_store::{StoreError, WorkflowStore};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{EventsMode, ExportAs, OutputArgs, PolicyArgs, StoreArgs};

use super::config::{connect_store, load_definition, parse_workflow_id};
use super::run::execute_document;

#[derive(Serialize)]
struct WorkflowInfo {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    server_url: String,
    step_count: usize,
    updated_at: String,
}

impl From<&WorkflowDocument> for WorkflowInfo {
    fn from(doc: &WorkflowDocument) -> Self {
        Self {
            id: doc.id.to_string(),
            name: doc.name.clone(),
            description: doc.description.clone(),
            server_url: doc.server_url.clone(),
            step_count: doc.steps.len(),
            updated_at: doc.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct WorkflowsResult {
    workflows: Vec<WorkflowInfo>,
}

pub async fn list_cmd(store: StoreArgs, output: OutputArgs) -> i32 {
    let pg = match connect_store(store, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    let docs = match pg.get_all_workflows().await {
        Ok(d) => d,
        Err(e) => return store_failure(&e, &output),
    };

    let result = WorkflowsResult {
        workflows: docs.iter().map(WorkflowInfo::from).collect(),
    };
    if output.format == OutputFormat::Text && !output.quiet {
        if result.workflows.is_empty() {
            println!("no workflows");
        }
        for w in &result.workflows {
            println!("{}  {}  ({} steps, updated {})", w.id, w.name, w.step_count, w.updated_at);
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}

pub async fn import_cmd(path: &Path, store: StoreArgs, output: OutputArgs) -> i32 {
    let def = match load_definition(path, &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let pg = match connect_store(store, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    match pg.create_workflow(def).await {
        Ok(doc) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: imported '{}' as {}", doc.name, doc.id);
            } else {
                print_result(output.format, output.quiet, &WorkflowInfo::from(&doc));
            }
            exit_codes::SUCCESS
        }
        Err(e) => store_failure(&e, &output),
    }
}

pub async fn show_cmd(id: &str, store: StoreArgs, output: OutputArgs) -> i32 {
    let doc = match fetch(id, store, &output).await {
        Ok(d) => d,
        Err(code) => return code,
    };
    // The full document, store-assigned fields included.
    if output.quiet {
        return exit_codes::SUCCESS;
    }
    let rendered = match output.format {
        OutputFormat::Text => serde_json::to_string_pretty(&doc),
        OutputFormat::Json => serde_json::to_string(&doc),
    };
    match rendered {
        Ok(text) => {
            println!("{text}");
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub async fn export_cmd(
    id: &str,
    as_format: ExportAs,
    store: StoreArgs,
    output: OutputArgs,
) -> i32 {
    let doc = match fetch(id, store, &output).await {
        Ok(d) => d,
        Err(code) => return code,
    };
    match export_definition(&doc.definition(), as_format.into()) {
        Ok(text) => {
            if !output.quiet {
                println!("{}", text.trim_end());
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}

pub async fn delete_cmd(id: &str, store: StoreArgs, output: OutputArgs) -> i32 {
    let id = match parse_workflow_id(id, &output) {
        Ok(id) => id,
        Err(code) => return code,
    };
    let pg = match connect_store(store, &output).await {
        Ok(s) => s,
        Err(code) => return code,
    };
    match pg.delete_workflow(id).await {
        Ok(()) => {
            if output.format == OutputFormat::Text && !output.quiet {
                println!("ok: deleted {id}");
            } else {
                let deleted = serde_json::json!({ "deleted": id.to_string() });
                print_result(output.format, output.quiet, &deleted);
            }
            exit_codes::SUCCESS
        }
        Err(e) => store_failure(&e, &output),
    }
}

pub async fn run_cmd(
    id: &str,
    events: EventsMode,
    store: StoreArgs,
    output: OutputArgs,
    policy: PolicyArgs,
) -> i32 {
    let doc = match fetch(id, store, &output).await {
        Ok(d) => d,
        Err(code) => return code,
    };
    execute_document(&doc, events, &output, &policy).await
}

async fn fetch(id: &str, store: StoreArgs, output: &OutputArgs) -> Result<WorkflowDocument, i32> {
    let id = parse_workflow_id(id, output)?;
    let pg = connect_store(store, output).await?;
    match pg.get_workflow(id).await {
        Ok(Some(doc)) => Ok(doc),
        Ok(None) => Err(store_failure(&StoreError::NotFound(id), output)),
        Err(e) => Err(store_failure(&e, output)),
    }
}

fn store_failure(err: &StoreError, output: &OutputArgs) -> i32 {
    print_error(output.format, output.quiet, &err.to_string());
    match err {
        StoreError::NotFound(_) => exit_codes::VALIDATION_FAILED,
        _ => exit_codes::RUNTIME_ERROR,
    }
}
