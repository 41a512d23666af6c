use std::path::Path;

use reqchain_core::{import_workflow, lint_references, ImportError, Violation};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    steps: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Violation>,
}

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let content = match std::fs::read_to_string(path) {
        Ok(v) => v,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let def = match import_workflow(&content) {
        Ok(d) => d,
        Err(ImportError::Parse(e)) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
        Err(ImportError::Validation(err)) => {
            let result = ValidateResult {
                valid: false,
                name: None,
                steps: 0,
                errors: err.violations,
                warnings: vec![],
            };
            if output.format == OutputFormat::Text && !output.quiet {
                eprintln!("error: validation failed");
                for e in &result.errors {
                    eprintln!("- {e}");
                }
            } else {
                print_result(output.format, output.quiet, &result);
            }
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let result = ValidateResult {
        valid: true,
        name: Some(def.name.clone()),
        steps: def.steps.len(),
        errors: vec![],
        warnings: lint_references(&def),
    };
    if output.format == OutputFormat::Text && !output.quiet {
        println!("ok: '{}' ({} steps)", def.name, def.steps.len());
        for w in &result.warnings {
            println!("warning: {w}");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}
