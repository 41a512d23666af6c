use std::collections::BTreeMap;

pub type AnyValue = serde_json::Value;

/// The accumulating variable scope of one execution.
///
/// Values are JSON so extracted objects and numbers keep their shape; substitution renders
/// them to text at the point of use.
pub type Variables = BTreeMap<String, AnyValue>;

/// Plain string maps used for request headers and query parameters.
pub type StringMap = BTreeMap<String, String>;

/// Render a scope value as the text inserted into a request field.
pub fn value_to_string(v: &AnyValue) -> String {
    match v {
        AnyValue::String(s) => s.clone(),
        AnyValue::Number(n) => n.to_string(),
        AnyValue::Bool(b) => b.to_string(),
        AnyValue::Null => String::new(),
        other => other.to_string(),
    }
}
