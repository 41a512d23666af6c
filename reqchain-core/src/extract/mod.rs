use serde_json_path::JsonPath;

use crate::expressions::{parse_value_path, PathError, PathSegment, ValuePath};
use crate::types::{AnyValue, VariableExtraction, Variables};

/// Result of running a step's extraction rules over one response body.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ExtractionOutcome {
    pub extracted: Variables,
    /// One `"<name>: <reason>"` entry per rule that could not be resolved.
    pub errors: Vec<String>,
}

/// Evaluate each rule, in declaration order, against the same `body`.
///
/// Rules never see each other's output. A failing rule only adds to `errors`.
pub fn extract(body: &AnyValue, rules: &[VariableExtraction]) -> ExtractionOutcome {
    let mut out = ExtractionOutcome::default();
    for rule in rules {
        match evaluate_path(body, &rule.path) {
            Ok(v) => {
                out.extracted.insert(rule.name.clone(), v.clone());
            }
            Err(e) => out.errors.push(format!("{}: {e}", rule.name)),
        }
    }
    out
}

/// Resolve a single path expression against `body`.
pub fn evaluate_path<'a>(body: &'a AnyValue, path: &str) -> Result<&'a AnyValue, ExtractError> {
    if is_jsonpath(path) {
        let jp = JsonPath::parse(path.trim())
            .map_err(|e| ExtractError::Path(PathError::JsonPath(e.to_string())))?;
        return jp
            .query(body)
            .all()
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::NoMatch(path.trim().to_string()));
    }

    let parsed = parse_value_path(path)?;
    resolve(body, &parsed)
}

pub fn resolve<'a>(body: &'a AnyValue, path: &ValuePath) -> Result<&'a AnyValue, ExtractError> {
    let mut cur = body;
    for (i, seg) in path.segments().iter().enumerate() {
        let at = path.prefix(i);
        cur = match (seg, cur) {
            (PathSegment::Key(k), AnyValue::Object(map)) => {
                map.get(k).ok_or_else(|| ExtractError::MissingProperty {
                    at: at.clone(),
                    key: k.clone(),
                })?
            }
            (PathSegment::Key(k), AnyValue::Array(arr)) => {
                let index = k.parse::<usize>().map_err(|_| ExtractError::WrongType {
                    at: at.clone(),
                    expected: "object",
                    found: type_name(cur),
                })?;
                index_into(arr, index, &at)?
            }
            (PathSegment::Index(index), AnyValue::Array(arr)) => index_into(arr, *index, &at)?,
            (PathSegment::Key(_), other) => {
                return Err(ExtractError::WrongType {
                    at,
                    expected: "object",
                    found: type_name(other),
                })
            }
            (PathSegment::Index(_), other) => {
                return Err(ExtractError::WrongType {
                    at,
                    expected: "array",
                    found: type_name(other),
                })
            }
        };
    }
    Ok(cur)
}

fn index_into<'a>(
    arr: &'a [AnyValue],
    index: usize,
    at: &str,
) -> Result<&'a AnyValue, ExtractError> {
    arr.get(index).ok_or_else(|| ExtractError::IndexOutOfRange {
        at: at.to_string(),
        index,
        len: arr.len(),
    })
}

// Plain dotted paths stay on the strict evaluator; only JSONPath-only syntax opts in.
fn is_jsonpath(path: &str) -> bool {
    let p = path.trim();
    p.starts_with('$') && (p.contains("..") || p.contains('*') || p.contains('?'))
}

fn type_name(v: &AnyValue) -> &'static str {
    match v {
        AnyValue::Null => "null",
        AnyValue::Bool(_) => "boolean",
        AnyValue::Number(_) => "number",
        AnyValue::String(_) => "string",
        AnyValue::Array(_) => "array",
        AnyValue::Object(_) => "object",
    }
}

fn describe(at: &str) -> String {
    if at.is_empty() {
        "response body".to_string()
    } else {
        format!("'{at}'")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
    #[error("property '{key}' not found in {}", describe(.at))]
    MissingProperty { at: String, key: String },
    #[error("index {index} out of range for {} (length {len})", describe(.at))]
    IndexOutOfRange { at: String, index: usize, len: usize },
    #[error("expected {expected} at {} but found {found}", describe(.at))]
    WrongType {
        at: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("JSONPath '{0}' matched nothing")]
    NoMatch(String),
}
