use serde_json::Value as JsonValue;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedValue {
    pub value: JsonValue,
    pub format: DocumentFormat,
}

/// Parse raw workflow text into an untyped JSON value.
///
/// Typing happens afterwards in `transfer::import_workflow`, field by field.
pub fn parse_value_str(input: &str, format: DocumentFormat) -> Result<ParsedValue, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    match format {
        DocumentFormat::Json => Ok(ParsedValue {
            value: serde_json::from_str(input)?,
            format,
        }),
        DocumentFormat::Yaml => Ok(ParsedValue {
            value: serde_yaml::from_str(input)?,
            format,
        }),
        DocumentFormat::Auto => parse_value_auto(input),
    }
}

fn parse_value_auto(input: &str) -> Result<ParsedValue, ParseError> {
    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<JsonValue>(input) {
            Ok(value) => Ok(ParsedValue {
                value,
                format: DocumentFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<JsonValue>(input) {
                Ok(value) => Ok(ParsedValue {
                    value,
                    format: DocumentFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<JsonValue>(input) {
        Ok(value) => Ok(ParsedValue {
            value,
            format: DocumentFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(value) = serde_json::from_str::<JsonValue>(input) {
                return Ok(ParsedValue {
                    value,
                    format: DocumentFormat::Json,
                });
            }
            Err(ParseError::Yaml(e))
        }
    }
}
