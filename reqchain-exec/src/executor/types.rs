use std::time::Duration;

use crate::policy::NetworkPolicy;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Settings for [`ReqwestExecutor`](crate::executor::ReqwestExecutor).
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub timeout: Duration,
    pub max_response_bytes: usize,
    pub max_redirects: usize,
    /// Treat non-2xx responses as step failures.
    pub fail_on_error_status: bool,
    /// Header that carries `api-key` credentials.
    pub api_key_header: String,
    pub policy: NetworkPolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            fail_on_error_status: true,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            policy: NetworkPolicy::default(),
        }
    }
}
