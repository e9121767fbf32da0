use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[ \t]*(?i:json)?").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("model response was empty")]
    Empty,
    #[error("model response is not valid JSON: {0}")]
    NotJson(String),
    #[error("model response is JSON but not an object")]
    NotAnObject,
}

/// Removes markdown code-fence markers the model wraps around its JSON.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

pub fn parse_model_json(text: &str) -> Result<Value, ParseError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(direct_err) => outermost_object(&cleaned)
            .and_then(|slice| serde_json::from_str::<Value>(slice).ok())
            .ok_or_else(|| ParseError::NotJson(direct_err.to_string()))?,
    };

    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }

    Ok(value)
}

/// Slice from the first `{` to the last `}`, for answers with prose around the JSON.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
