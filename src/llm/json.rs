//! Extraction of the copy object from free-text model output

use serde_json::{Map, Value};

use super::{LlmCopy, LlmError};

/// Substring from the first `{` to the last `}`, inclusive
///
/// Models sometimes wrap the requested object in prose; this strips it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse model content into copy fields
///
/// The canonical shape nests descriptions under `texts`; top-level
/// `business` / `emotional` keys are accepted when `texts` lacks them.
pub fn parse_copy(content: &str) -> Result<LlmCopy, LlmError> {
    let raw = extract_json_object(content)
        .ok_or_else(|| LlmError::Parse("no JSON object in model output".to_string()))?;

    let value: Value = serde_json::from_str(raw).map_err(|e| LlmError::Parse(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(LlmError::Parse("model output is not a JSON object".to_string()));
    };

    let texts = obj.get("texts").and_then(Value::as_object);
    let described = |key: &str| {
        texts
            .and_then(|t| non_empty(t, key))
            .or_else(|| non_empty(&obj, key))
    };

    Ok(LlmCopy {
        title: non_empty(&obj, "title"),
        business: described("business"),
        emotional: described("emotional"),
    })
}

fn non_empty(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
