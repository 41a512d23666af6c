mod engine;
pub mod events;
pub mod http;
pub mod request;
mod types;
pub mod worker;

pub use engine::WorkflowEngine;
pub use events::{
    ChannelEventSink, CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink,
};
pub use http::{parse_body, ExecutorError, ReqwestExecutor, RequestExecutor};
pub use request::{build_request, build_url, encode_component, ResolvedRequest};
pub use types::{
    ExecutorConfig, DEFAULT_API_KEY_HEADER, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RESPONSE_BYTES,
    DEFAULT_TIMEOUT,
};
pub use worker::execute_step;
