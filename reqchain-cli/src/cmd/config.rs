use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use reqchain_core::{import_workflow, ImportError, WorkflowDefinition};
use reqchain_exec::{ExecutorConfig, NetworkPolicy};
use reqchain_store::PostgresStore;
use uuid::Uuid;

use crate::exit_codes;
use crate::output::{print_error, print_error_details};
use crate::utils::redact_url_password;
use crate::{OutputArgs, PolicyArgs, StoreArgs};

/// Fails when the allow-list file cannot be read.
pub fn build_executor_config(
    policy: &PolicyArgs,
    output: &OutputArgs,
) -> Result<ExecutorConfig, i32> {
    let mut hosts: BTreeSet<String> = policy
        .allow_hosts
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    if let Some(file) = &policy.allow_hosts_file {
        let content = std::fs::read_to_string(file).map_err(|e| {
            let msg = format!("failed to read allow-list {}: {e}", file.display());
            print_error(output.format, output.quiet, &msg);
            exit_codes::RUNTIME_ERROR
        })?;
        for line in content.lines() {
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                hosts.insert(line.to_ascii_lowercase());
            }
        }
    }

    Ok(ExecutorConfig {
        timeout: Duration::from_millis(policy.timeout),
        max_response_bytes: policy.max_response_bytes,
        max_redirects: policy.max_redirects,
        fail_on_error_status: !policy.no_fail_on_error_status,
        api_key_header: policy.api_key_header.clone(),
        policy: NetworkPolicy {
            allowed_hosts: hosts,
            allow_private_networks: policy.allow_private_networks,
            ..NetworkPolicy::default()
        },
    })
}

pub fn get_database_url(store_arg: Option<String>, output: &OutputArgs) -> Option<String> {
    let url = store_arg
        .or_else(|| std::env::var("REQCHAIN_DATABASE_URL").ok())
        .or_else(|| std::env::var("DATABASE_URL").ok());
    if url.is_none() {
        print_error(
            output.format,
            output.quiet,
            "missing database URL. Set --store <url>, REQCHAIN_DATABASE_URL, \
             or DATABASE_URL environment variable",
        );
    }
    url
}

pub async fn connect_store(store: StoreArgs, output: &OutputArgs) -> Result<PostgresStore, i32> {
    let database_url = get_database_url(store.store, output).ok_or(exit_codes::RUNTIME_ERROR)?;
    tracing::debug!(url = %redact_url_password(&database_url), "connecting to postgres");
    PostgresStore::connect(&database_url, store.max_connections)
        .await
        .map_err(|e| {
            let msg = format!("failed to connect to postgres: {e}");
            print_error(output.format, output.quiet, &msg);
            exit_codes::RUNTIME_ERROR
        })
}

/// Reads and imports a workflow file, printing any problem and returning the exit code.
pub fn load_definition(path: &Path, output: &OutputArgs) -> Result<WorkflowDefinition, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;

    import_workflow(&content).map_err(|e| {
        report_import_error(&e, output);
        exit_codes::VALIDATION_FAILED
    })
}

pub fn report_import_error(err: &ImportError, output: &OutputArgs) {
    match err {
        ImportError::Parse(e) => print_error(output.format, output.quiet, &e.to_string()),
        ImportError::Validation(e) => {
            let details = e.violations.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            print_error_details(output.format, output.quiet, "validation failed", &details);
        }
    }
}

pub fn parse_workflow_id(id: &str, output: &OutputArgs) -> Result<Uuid, i32> {
    Uuid::parse_str(id).map_err(|e| {
        print_error(output.format, output.quiet, &format!("invalid workflow id '{id}': {e}"));
        exit_codes::VALIDATION_FAILED
    })
}
