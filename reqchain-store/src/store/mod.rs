mod trait_store;
mod types;

pub use trait_store::{StoreError, WorkflowStore};
pub use types::WorkflowPatch;
