use std::fmt;

/// Credentials forwarded to the execution collaborator.
///
/// The tag values match the serialized workflow format (`none`, `bearer`, `api-key`, `basic`).
#[derive(Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowAuth {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "bearer")]
    Bearer { token: String },
    #[serde(rename = "api-key")]
    ApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    #[serde(rename = "basic")]
    Basic { username: String, password: String },
}

impl WorkflowAuth {
    pub const ALLOWED_TYPES: [&'static str; 4] = ["none", "api-key", "bearer", "basic"];

    pub fn type_str(&self) -> &'static str {
        match self {
            WorkflowAuth::None => "none",
            WorkflowAuth::Bearer { .. } => "bearer",
            WorkflowAuth::ApiKey { .. } => "api-key",
            WorkflowAuth::Basic { .. } => "basic",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, WorkflowAuth::None)
    }

    /// Step-level auth wins over the workflow default; neither resolves to `None`.
    pub fn effective(step: Option<&WorkflowAuth>, shared: Option<&WorkflowAuth>) -> WorkflowAuth {
        step.or(shared).cloned().unwrap_or_default()
    }
}

// Credentials never reach logs through `{:?}`.
impl fmt::Debug for WorkflowAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowAuth::None => f.write_str("WorkflowAuth::None"),
            WorkflowAuth::Bearer { .. } => f
                .debug_struct("WorkflowAuth::Bearer")
                .field("token", &"<redacted>")
                .finish(),
            WorkflowAuth::ApiKey { .. } => f
                .debug_struct("WorkflowAuth::ApiKey")
                .field("api_key", &"<redacted>")
                .finish(),
            WorkflowAuth::Basic { username, .. } => f
                .debug_struct("WorkflowAuth::Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
