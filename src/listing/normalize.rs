//! Request normalization
//!
//! Turns an arbitrary, possibly malformed request body into a `ListingInput`.
//! Nothing here fails: bad values are dropped and defaults applied.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{Length, ListingInput, Locale, Mode, Style};
use crate::Config;

/// Prefixes passed through unchanged when resolving image references
static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?://|data:image/)").unwrap());

/// Settings that shape normalization, taken from `Config`
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub public_base_url: String,
    pub max_images: usize,
    pub default_locale: Locale,
}

impl NormalizeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            public_base_url: config.public_base_url.trim().to_string(),
            max_images: config.max_images,
            default_locale: config.locale,
        }
    }
}

/// Parse a request body, treating anything that is not a JSON object as `{}`
pub fn parse_body(body: &[u8]) -> Map<String, Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Map::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            warn!("request body is not a JSON object, using defaults");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "malformed request body, using defaults");
            Map::new()
        }
    }
}

/// Build a `ListingInput` from request fields
pub fn normalize(fields: &Map<String, Value>, opts: &NormalizeOptions) -> ListingInput {
    let get = |key: &str| fields.get(key);
    let get_either = |a: &str, b: &str| fields.get(a).or_else(|| fields.get(b));

    ListingInput {
        title: get("title").and_then(text),
        address: get("address").and_then(text),
        price: get("price").and_then(price),
        bedrooms: get_either("bedrooms", "rooms").and_then(number),
        bathrooms: get("bathrooms").and_then(number),
        area: get("area").and_then(number),
        notes: get("notes").and_then(text),
        images: get("images")
            .map(|v| resolve_images(v, opts))
            .unwrap_or_default(),
        style: get("style")
            .and_then(Value::as_str)
            .and_then(Style::from_str)
            .unwrap_or_default(),
        mode: get("mode")
            .and_then(Value::as_str)
            .and_then(Mode::from_str)
            .unwrap_or_default(),
        length: get("length")
            .and_then(Value::as_str)
            .and_then(Length::from_str)
            .unwrap_or_default(),
        use_images: get_either("useImages", "use_images")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        locale: get_either("lang", "locale")
            .and_then(Value::as_str)
            .and_then(Locale::from_str)
            .unwrap_or(opts.default_locale),
    }
}

/// Resolve one image reference against the public base URL
///
/// Returns `None` for blank entries, and for relative paths when no base URL
/// is configured.
pub fn resolve_image_url(raw: &str, base_url: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if ABSOLUTE_URL.is_match(raw) {
        return Some(raw.to_string());
    }
    if base_url.is_empty() {
        debug!(path = raw, "dropping relative image path, no public base URL");
        return None;
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        raw.trim_start_matches('/')
    ))
}

fn resolve_images(value: &Value, opts: &NormalizeOptions) -> Vec<String> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|raw| resolve_image_url(raw, &opts.public_base_url))
        .take(opts.max_images)
        .collect()
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Finite, positive number from a JSON number or numeric string
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then_some(n)
}

/// Price from a number, or from a string with every non-digit stripped
fn price(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            let n = digits.parse::<u64>().ok()? as f64;
            (n > 0.0).then_some(n)
        }
        other => number(other),
    }
}
