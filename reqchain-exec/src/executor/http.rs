use std::time::Instant;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use reqchain_core::types::{AnyValue, ResponseEnvelope, StringMap, WorkflowAuth};

use crate::executor::request::ResolvedRequest;
use crate::executor::types::ExecutorConfig;
use crate::policy::{NetworkPolicy, PolicyError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutorError {
    #[error("request blocked: {0}")]
    Rejected(#[from] PolicyError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request timed out")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    #[error("HTTP {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        response: Box<ResponseEnvelope>,
    },
    #[error("request failed: {0}")]
    Other(String),
}

impl ExecutorError {
    /// The response that accompanied the failure, if the server answered at all.
    pub fn into_response(self) -> Option<ResponseEnvelope> {
        match self {
            ExecutorError::Status { response, .. } => Some(*response),
            _ => None,
        }
    }
}

/// Performs one resolved HTTP request.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ResolvedRequest) -> Result<ResponseEnvelope, ExecutorError>;
}

pub struct ReqwestExecutor {
    client: reqwest::Client,
    config: ExecutorConfig,
}

impl ReqwestExecutor {
    pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        let client = reqwest::Client::builder()
            .redirect(redirect_policy(config.policy.clone(), config.max_redirects))
            .timeout(config.timeout)
            .user_agent(concat!("reqchain/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExecutorError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

}

// Every redirect hop goes through the same network policy as the initial request.
fn redirect_policy(policy: NetworkPolicy, max_redirects: usize) -> reqwest::redirect::Policy {
    if max_redirects == 0 {
        return reqwest::redirect::Policy::none();
    }
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= max_redirects {
            return attempt.error(format!("too many redirects (max {max_redirects})"));
        }
        match policy.check(attempt.url()) {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    })
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: ResolvedRequest) -> Result<ResponseEnvelope, ExecutorError> {
        let url = self.config.policy.check_url(&request.url)?;
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| ExecutorError::InvalidRequest(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (k, v) in &request.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|_| ExecutorError::InvalidRequest(format!("invalid header name '{k}'")))?;
            let value = HeaderValue::from_str(v).map_err(|_| {
                ExecutorError::InvalidRequest(format!("invalid value for header '{k}'"))
            })?;
            headers.insert(name, value);
        }

        let mut rb = self.client.request(method, url).headers(headers);
        rb = match &request.auth {
            WorkflowAuth::None => rb,
            WorkflowAuth::Bearer { token } => rb.bearer_auth(token),
            WorkflowAuth::Basic { username, password } => rb.basic_auth(username, Some(password)),
            WorkflowAuth::ApiKey { api_key } => {
                rb.header(self.config.api_key_header.as_str(), api_key.as_str())
            }
        };
        if let Some(body) = request.body {
            rb = rb.body(body);
        }

        let started = Instant::now();
        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();

        let mut headers = StringMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        let max_bytes = self.config.max_response_bytes;
        if resp.content_length().is_some_and(|len| len > max_bytes as u64) {
            return Err(ExecutorError::ResponseTooLarge { max_bytes });
        }
        let bytes = read_body(resp, max_bytes).await?;

        let envelope = ResponseEnvelope {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: parse_body(&bytes),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        debug!(
            status = envelope.status,
            duration_ms = envelope.duration_ms,
            bytes = bytes.len(),
            "response received"
        );

        if self.config.fail_on_error_status && !envelope.is_success() {
            return Err(ExecutorError::Status {
                status: envelope.status,
                status_text: envelope.status_text.clone(),
                response: Box::new(envelope),
            });
        }
        Ok(envelope)
    }
}

// Content-Length is optional, so chunked bodies are counted as they arrive.
async fn read_body(resp: reqwest::Response, max_bytes: usize) -> Result<Vec<u8>, ExecutorError> {
    let mut body = Vec::new();
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        if body.len() + chunk.len() > max_bytes {
            return Err(ExecutorError::ResponseTooLarge { max_bytes });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// JSON when the body parses as JSON, the text otherwise, `None` when empty.
pub fn parse_body(bytes: &[u8]) -> Option<AnyValue> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<AnyValue>(bytes) {
        Ok(v) => Some(v),
        Err(_) => Some(AnyValue::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ExecutorError {
    if e.is_timeout() {
        return ExecutorError::Timeout;
    }
    if e.is_builder() {
        return ExecutorError::InvalidRequest(e.to_string());
    }
    if e.is_redirect() {
        return ExecutorError::Other(e.to_string());
    }
    if e.is_connect() || e.is_request() {
        return ExecutorError::Network(e.to_string());
    }
    ExecutorError::Other(e.to_string())
}
