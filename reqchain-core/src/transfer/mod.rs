//! Portable workflow documents: export to text and validated import back.

mod export;
mod import;

pub use export::{export_definition, export_workflow, ExportFormat};
pub use import::{import_value, import_workflow};
