use std::fmt;
use std::str::FromStr;

/// Where a substituted value lands, which decides how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingContext {
    /// A URL path segment: percent-encoded, `/` included.
    Url,
    /// A query parameter value: percent-encoded.
    Query,
    /// A header value: control characters (CR, LF, NUL, ...) removed.
    Header,
    /// Request body text: inserted verbatim.
    Body,
}

impl EncodingContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingContext::Url => "url",
            EncodingContext::Query => "query",
            EncodingContext::Header => "header",
            EncodingContext::Body => "body",
        }
    }

    pub fn encode(&self, value: &str) -> String {
        match self {
            EncodingContext::Url | EncodingContext::Query => {
                urlencoding::encode(value).into_owned()
            }
            EncodingContext::Header => sanitize_header_value(value),
            EncodingContext::Body => value.to_string(),
        }
    }
}

impl fmt::Display for EncodingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(EncodingContext::Url),
            "query" => Ok(EncodingContext::Query),
            "header" => Ok(EncodingContext::Header),
            "body" => Ok(EncodingContext::Body),
            other => Err(format!("unknown encoding context: {other}")),
        }
    }
}

fn sanitize_header_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect()
}
