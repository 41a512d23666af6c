use crate::types::WorkflowRequest;

/// One named extraction rule: evaluate `path` against the response body and bind it to `name`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VariableExtraction {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl VariableExtraction {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Provenance link back to the OpenAPI operation a step was built from. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpecEndpoint {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkflowStep {
    pub id: String,

    pub order: i64,

    pub name: String,

    pub request: WorkflowRequest,

    #[serde(default)]
    pub extractions: Vec<VariableExtraction>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "specEndpoint")]
    pub spec_endpoint: Option<SpecEndpoint>,
}

impl WorkflowStep {
    pub fn new(order: i64, name: impl Into<String>, request: WorkflowRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order,
            name: name.into(),
            request,
            extractions: Vec::new(),
            spec_endpoint: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_extraction(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.extractions.push(VariableExtraction::new(name, path));
        self
    }
}

/// Steps in execution order: ascending `order`, ties kept in insertion order.
pub fn sorted_steps(steps: &[WorkflowStep]) -> Vec<&WorkflowStep> {
    let mut sorted: Vec<&WorkflowStep> = steps.iter().collect();
    // `sort_by_key` is stable.
    sorted.sort_by_key(|s| s.order);
    sorted
}
