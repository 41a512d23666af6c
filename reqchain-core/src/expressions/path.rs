use std::fmt;

/// One addressing step in an extraction path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.name` or `["name"]`. A numeric key also addresses an array element.
    Key(String),
    /// `[3]`.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A parsed dotted/bracket path such as `data.items[0].id` or `$.user["first.name"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Render the first `n` segments back to path syntax, for error messages.
    pub fn prefix(&self, n: usize) -> String {
        let mut out = String::new();
        for seg in self.segments.iter().take(n) {
            match seg {
                PathSegment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{i}]")),
            }
        }
        out
    }
}

pub fn parse_value_path(input: &str) -> Result<ValuePath, PathError> {
    let s = input.trim();
    let body = s.strip_prefix('$').unwrap_or(s);
    let body = body.strip_prefix('.').unwrap_or(body);
    if body.is_empty() {
        return Err(PathError::Empty);
    }

    let chars: Vec<char> = body.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;
    // Set after a `.`: the next thing must be a name.
    let mut expect_name = true;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                if expect_name {
                    return Err(PathError::EmptySegment(i));
                }
                expect_name = true;
                i += 1;
                if i == chars.len() {
                    return Err(PathError::EmptySegment(i));
                }
            }
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|p| p + i + 1)
                    .ok_or(PathError::UnclosedBracket(i))?;
                let inner: String = chars[i + 1..close].iter().collect();
                segments.push(parse_bracket(inner.trim())?);
                expect_name = false;
                i = close + 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                segments.push(PathSegment::Key(name));
                expect_name = false;
            }
        }
    }

    Ok(ValuePath {
        raw: s.to_string(),
        segments,
    })
}

fn parse_bracket(inner: &str) -> Result<PathSegment, PathError> {
    if inner.is_empty() {
        return Err(PathError::InvalidIndex(inner.to_string()));
    }
    for quote in ['"', '\''] {
        if let Some(key) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Ok(PathSegment::Key(key.to_string()));
        }
    }
    inner
        .parse::<usize>()
        .map(PathSegment::Index)
        .map_err(|_| PathError::InvalidIndex(inner.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path must not be empty")]
    Empty,
    #[error("empty path segment at offset {0}")]
    EmptySegment(usize),
    #[error("unclosed '[' at offset {0}")]
    UnclosedBracket(usize),
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),
    #[error("invalid JSONPath: {0}")]
    JsonPath(String),
}
