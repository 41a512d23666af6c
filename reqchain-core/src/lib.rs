#![forbid(unsafe_code)]

pub mod error;
pub mod expressions;
pub mod extract;
pub mod parser;
pub mod transfer;
pub mod types;
pub mod validate;

pub use crate::error::{ExportError, ImportError, ParseError, ValidationError, Violation};
pub use crate::expressions::{substitute, EncodingContext};
pub use crate::extract::{extract, ExtractionOutcome};
pub use crate::parser::{parse_value_str, DocumentFormat, ParsedValue};
pub use crate::transfer::{export_definition, export_workflow, import_workflow, ExportFormat};
pub use crate::types::{WorkflowDefinition, WorkflowDocument, WorkflowExecution};
pub use crate::validate::lint_references;
