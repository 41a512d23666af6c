use std::path::Path;

use reqchain_core::export_definition;

use crate::exit_codes;
use crate::output::print_error;
use crate::{ExportAs, OutputArgs};

use super::config::load_definition;

pub async fn export_cmd(path: &Path, as_format: ExportAs, output: OutputArgs) -> i32 {
    let def = match load_definition(path, &output) {
        Ok(d) => d,
        Err(code) => return code,
    };
    match export_definition(&def, as_format.into()) {
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
