use crate::error::ExportError;
use crate::types::{WorkflowDefinition, WorkflowDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

/// Export a stored workflow without its store-assigned `id` and timestamps, so importing the
/// result creates a new workflow.
pub fn export_workflow(doc: &WorkflowDocument) -> Result<String, ExportError> {
    export_definition(&doc.definition(), ExportFormat::Json)
}

pub fn export_definition(
    def: &WorkflowDefinition,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(def)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(def)?),
    }
}
