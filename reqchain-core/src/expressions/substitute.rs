use crate::expressions::encode::EncodingContext;
use crate::expressions::template::{parse_template, Segment};
use crate::types::{value_to_string, Variables};

/// Resolve every `{{name}}` in `template` against `scope`, encoding values for `context`.
///
/// Names missing from `scope` are left in place exactly as written.
pub fn substitute(template: &str, scope: &Variables, context: EncodingContext) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    for seg in parse_template(template).segments {
        match seg {
            Segment::Literal(lit) => out.push_str(&lit),
            Segment::Placeholder { name, raw } => match scope.get(&name) {
                Some(v) => out.push_str(&context.encode(&value_to_string(v))),
                None => out.push_str(&raw),
            },
        }
    }
    out
}

/// Placeholder names in `template` that `scope` cannot resolve, in order of appearance.
pub fn unresolved_names(template: &str, scope: &Variables) -> Vec<String> {
    parse_template(template)
        .placeholder_names()
        .filter(|n| !scope.contains_key(*n))
        .map(str::to_string)
        .collect()
}
