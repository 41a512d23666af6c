use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `raw` is the placeholder exactly as written, braces included.
    Placeholder { name: String, raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Split `input` into literal text and `{{name}}` placeholders.
///
/// Whitespace inside the braces is ignored. Anything that does not look like a placeholder
/// (bad name, missing `}}`) stays literal; parsing never fails.
pub fn parse_template(input: &str) -> Template {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut rest = input;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };

        let inner = after_open[..close].trim();
        if NAME_RE.is_match(inner) {
            buf.push_str(&rest[..open]);
            if !buf.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut buf)));
            }
            segments.push(Segment::Placeholder {
                name: inner.to_string(),
                raw: rest[open..open + 2 + close + 2].to_string(),
            });
            rest = &after_open[close + 2..];
        } else {
            // Keep the first brace and rescan so `{{{x}}` still finds `{{x}}`.
            buf.push_str(&rest[..open + 1]);
            rest = &rest[open + 1..];
        }
    }

    buf.push_str(rest);
    if !buf.is_empty() {
        segments.push(Segment::Literal(buf));
    }

    Template { segments }
}

pub fn is_valid_variable_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}
