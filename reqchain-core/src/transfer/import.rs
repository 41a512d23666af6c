use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};

use crate::error::{ImportError, ValidationError};
use crate::parser::{parse_value_str, DocumentFormat};
use crate::types::{
    HttpMethod, SpecEndpoint, StringMap, VariableExtraction, WorkflowAuth, WorkflowDefinition,
    WorkflowRequest, WorkflowStep,
};
use crate::validate::{Validator, ID_RE};

/// Parse and validate untrusted workflow text (JSON or YAML).
///
/// Only known fields survive; see [`import_value`] for the rules.
pub fn import_workflow(raw: &str) -> Result<WorkflowDefinition, ImportError> {
    let parsed = parse_value_str(raw, DocumentFormat::Auto)?;
    Ok(import_value(&parsed.value)?)
}

/// Build a clean definition from an already-parsed value.
///
/// Fatal: a non-object root, missing/empty `name` or `serverUrl`, `steps` that is not a list,
/// a step or request that is not an object, and a request method outside GET, POST, PUT,
/// PATCH, DELETE. Everything else is repaired or dropped.
pub fn import_value(value: &JsonValue) -> Result<WorkflowDefinition, ValidationError> {
    let Some(root) = value.as_object() else {
        return Err(ValidationError::single("$", "must be an object"));
    };

    let mut v = Validator::new();

    let name = required_string(&mut v, root, "name");
    let server_url = required_string(&mut v, root, "serverUrl");
    let description = root
        .get("description")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    let shared_auth = root
        .get("sharedAuth")
        .and_then(JsonValue::as_object)
        .map(clean_auth);

    let steps = match root.get("steps") {
        Some(JsonValue::Array(items)) => clean_steps(&mut v, items),
        _ => {
            v.push("$.steps", "is required and must be a list");
            Vec::new()
        }
    };

    v.finish()?;

    Ok(WorkflowDefinition {
        name,
        description,
        server_url,
        shared_auth,
        steps,
    })
}

fn required_string(v: &mut Validator, obj: &Map<String, JsonValue>, key: &str) -> String {
    match obj.get(key).and_then(JsonValue::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => {
            v.push(format!("$.{key}"), "is required and must be a non-empty string");
            String::new()
        }
    }
}

fn clean_steps(v: &mut Validator, items: &[JsonValue]) -> Vec<WorkflowStep> {
    let mut seen_ids = HashSet::new();
    let mut steps = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let path = format!("$.steps[{idx}]");
        let Some(obj) = item.as_object() else {
            v.push(path, "must be an object");
            continue;
        };
        if let Some(step) = clean_step(v, &path, idx, obj, &mut seen_ids) {
            steps.push(step);
        }
    }
    steps
}

fn clean_step(
    v: &mut Validator,
    path: &str,
    idx: usize,
    obj: &Map<String, JsonValue>,
    seen_ids: &mut HashSet<String>,
) -> Option<WorkflowStep> {
    let id = match obj.get("id").and_then(JsonValue::as_str) {
        Some(id) if ID_RE.is_match(id) && !seen_ids.contains(id) => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    seen_ids.insert(id.clone());

    let order = obj
        .get("order")
        .and_then(|o| {
            o.as_i64()
                .or_else(|| o.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        })
        .unwrap_or(idx as i64);

    let name = obj
        .get("name")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Step {}", idx + 1));

    let request = match obj.get("request").and_then(JsonValue::as_object) {
        Some(req) => clean_request(v, &format!("{path}.request"), req)?,
        None => {
            v.push(format!("{path}.request"), "is required and must be an object");
            return None;
        }
    };

    let extractions = obj
        .get("extractions")
        .and_then(JsonValue::as_array)
        .map(|items| items.iter().filter_map(clean_extraction).collect())
        .unwrap_or_default();

    let spec_endpoint = obj
        .get("specEndpoint")
        .and_then(JsonValue::as_object)
        .and_then(clean_spec_endpoint);

    Some(WorkflowStep {
        id,
        order,
        name,
        request,
        extractions,
        spec_endpoint,
    })
}

fn clean_request(
    v: &mut Validator,
    path: &str,
    req: &Map<String, JsonValue>,
) -> Option<WorkflowRequest> {
    let method = match req.get("method").and_then(JsonValue::as_str) {
        Some(m) => match m.parse::<HttpMethod>() {
            Ok(m) => m,
            Err(e) => {
                v.push(format!("{path}.method"), e.to_string());
                return None;
            }
        },
        None => {
            v.push(format!("{path}.method"), "is required and must be a string");
            return None;
        }
    };

    Some(WorkflowRequest {
        method,
        path: req
            .get("path")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string(),
        headers: string_map(req.get("headers")),
        query_params: string_map(req.get("queryParams")),
        body: req.get("body").and_then(JsonValue::as_str).map(str::to_string),
        auth: req.get("auth").and_then(JsonValue::as_object).map(clean_auth),
    })
}

/// All-or-nothing: one non-string value empties the whole map.
fn string_map(value: Option<&JsonValue>) -> StringMap {
    let Some(obj) = value.and_then(JsonValue::as_object) else {
        return StringMap::new();
    };
    let mut out = StringMap::new();
    for (k, val) in obj {
        match val.as_str() {
            Some(s) => {
                out.insert(k.clone(), s.to_string());
            }
            None => return StringMap::new(),
        }
    }
    out
}

fn clean_auth(obj: &Map<String, JsonValue>) -> WorkflowAuth {
    let field = |key: &str| {
        obj.get(key)
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string()
    };
    match obj.get("type").and_then(JsonValue::as_str) {
        Some("bearer") => WorkflowAuth::Bearer {
            token: field("token"),
        },
        Some("api-key") => WorkflowAuth::ApiKey {
            api_key: field("apiKey"),
        },
        Some("basic") => WorkflowAuth::Basic {
            username: field("username"),
            password: field("password"),
        },
        _ => WorkflowAuth::None,
    }
}

fn clean_extraction(item: &JsonValue) -> Option<VariableExtraction> {
    let obj = item.as_object()?;
    Some(VariableExtraction {
        id: obj.get("id")?.as_str()?.to_string(),
        name: obj.get("name")?.as_str()?.to_string(),
        path: obj.get("path")?.as_str()?.to_string(),
    })
}

fn clean_spec_endpoint(obj: &Map<String, JsonValue>) -> Option<SpecEndpoint> {
    Some(SpecEndpoint {
        method: obj.get("method")?.as_str()?.to_string(),
        path: obj.get("path")?.as_str()?.to_string(),
        operation_id: obj
            .get("operationId")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
    })
}
