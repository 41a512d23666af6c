#![forbid(unsafe_code)]

//! Runtime engine for executing chained HTTP API workflows.
//!
//! Documents and expressions live in `reqchain-core`; this crate resolves requests, sends them
//! through a [`RequestExecutor`] and threads extracted variables between steps.

pub mod executor;
pub mod policy;

pub use crate::executor::{
    Event, EventSink, ExecutorConfig, ExecutorError, ReqwestExecutor, RequestExecutor,
    ResolvedRequest, WorkflowEngine,
};
pub use crate::policy::{NetworkPolicy, PolicyError};
pub use tokio_util::sync::CancellationToken;
