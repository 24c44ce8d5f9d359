use itertools::Itertools;
use serde_json::{Map, Value};

/// Placeholder when the model leaves out the `type` field.
pub const UNKNOWN_TYPE: &str = "Unknown";
/// Products sentinel, also used for every failure-tagged record.
pub const NO_PRODUCTS: &str = "";

/// Classifier verdict after every field has been defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub site_type: String,
    pub is_store: bool,
    pub products: String,
    pub reasoning: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid structured output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid structured output: expected an object, got {0}")]
    NotAnObject(&'static str),
}

/// Removes markdown code fences the model sometimes wraps its answer in.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut payload = raw.trim();

    if let Some(rest) = payload.strip_prefix("```") {
        // Drop the info string, e.g. ```json
        payload = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = payload.strip_suffix("```") {
        payload = rest;
    }

    payload.trim()
}

pub fn parse_classification(raw: &str) -> Result<Classification, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => return Err(ParseError::NotAnObject(json_kind(&other))),
    };

    Ok(Classification {
        site_type: text_field(&fields, "type").unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        is_store: fields.get("is_store").map(is_truthy).unwrap_or(false),
        products: products_field(fields.get("products")),
        reasoning: text_field(&fields, "reasoning").unwrap_or_default(),
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(display_value(value)),
    }
}

fn products_field(products: Option<&Value>) -> String {
    match products {
        None => NO_PRODUCTS.to_string(),
        Some(Value::Null) => "None".to_string(),
        Some(Value::Array(items)) => items.iter().map(display_value).join(", "),
        Some(value) => display_value(value),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Deliberately differs from plain truthiness: the strings "false", "no" and
/// "0" count as negative, since models sometimes quote the boolean.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            !(s.is_empty() || s == "false" || s == "no" || s == "0")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
