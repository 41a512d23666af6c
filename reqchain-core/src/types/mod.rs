mod auth;
mod common;
mod document;
mod execution;
mod request;
mod step;

pub use auth::WorkflowAuth;
pub use common::{value_to_string, AnyValue, StringMap, Variables};
pub use document::{WorkflowDefinition, WorkflowDocument};
pub use execution::{
    ExecutionStatus, ResponseEnvelope, StepExecutionResult, StepStatus, WorkflowExecution,
};
pub use request::{HttpMethod, UnsupportedMethod, WorkflowRequest};
pub use step::{sorted_steps, SpecEndpoint, VariableExtraction, WorkflowStep};
