//! Response composition
//!
//! Merges model output with fallback copy field by field:
//! 1. a requested field the model supplied (non-empty, outcome `Ok`) is used as-is
//! 2. a requested field the model did not supply comes from the fallback generator
//! 3. a field the caller did not request is always the empty string

use serde::Serialize;

use crate::listing::{
    fallback_business, fallback_emotional, fallback_title, truncate_chars, ListingInput,
};
use crate::llm::LlmOutcome;

/// `llm_error` is cut to this many characters
pub const MAX_ERROR_CHARS: usize = 500;

/// Error code returned when no payload can be produced at all
pub const FATAL_ERROR_CODE: &str = "AI_FATAL";

/// Where the response copy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Provider answered with usable JSON
    Llm,
    /// No credential configured
    Fallback,
    /// Provider answered with an error status, timed out, or sent no usable content
    FallbackLlmError,
    /// Local failure: transport error or unparseable model output
    FallbackException,
}

impl Source {
    pub fn for_outcome(outcome: &LlmOutcome) -> Self {
        match outcome {
            LlmOutcome::Ok(_) => Source::Llm,
            LlmOutcome::MissingKey => Source::Fallback,
            LlmOutcome::Failed(e) if e.is_provider_error() => Source::FallbackLlmError,
            LlmOutcome::Failed(_) => Source::FallbackException,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Llm => "llm",
            Source::Fallback => "fallback",
            Source::FallbackLlmError => "fallback_llm_error",
            Source::FallbackException => "fallback_exception",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Texts {
    pub business: String,
    pub emotional: String,
}

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsePayload {
    pub ok: bool,
    pub source: Source,
    pub llm_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_error: Option<String>,
    /// Empty when the mode excludes the title
    pub title: String,
    pub texts: Texts,
}

/// Body of the unrecoverable-failure response
#[derive(Debug, Clone, Serialize)]
pub struct FatalPayload {
    pub ok: bool,
    pub error: &'static str,
}

impl Default for FatalPayload {
    fn default() -> Self {
        Self {
            ok: false,
            error: FATAL_ERROR_CODE,
        }
    }
}

/// Build the response for a listing from the provider outcome
pub fn compose(input: &ListingInput, outcome: &LlmOutcome) -> ResponsePayload {
    let copy = outcome.copy();

    let title = pick(
        input.wants_title(),
        copy.and_then(|c| c.title.as_deref()),
        || fallback_title(input),
    );
    let business = pick(
        input.wants_business(),
        copy.and_then(|c| c.business.as_deref()),
        || fallback_business(input, input.length),
    );
    let emotional = pick(
        input.wants_emotional(),
        copy.and_then(|c| c.emotional.as_deref()),
        || fallback_emotional(input, input.length),
    );

    ResponsePayload {
        ok: true,
        source: Source::for_outcome(outcome),
        llm_status: outcome.status(),
        llm_error: outcome
            .error()
            .map(|e| truncate_chars(&e.to_string(), MAX_ERROR_CHARS)),
        title,
        texts: Texts {
            business,
            emotional,
        },
    }
}

fn pick(requested: bool, from_llm: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    if !requested {
        return String::new();
    }
    match from_llm.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => text.to_string(),
        None => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Mode, Style};
    use crate::llm::{LlmCopy, LlmError};

    fn sample() -> ListingInput {
        ListingInput {
            bedrooms: Some(2.0),
            area: Some(850.0),
            address: Some("123 Main St".to_string()),
            ..ListingInput::default()
        }
    }

    fn llm_copy() -> LlmOutcome {
        LlmOutcome::Ok(LlmCopy {
            title: Some("Cozy 2BR".to_string()),
            business: Some("Model business.".to_string()),
            emotional: Some("Model emotional.".to_string()),
        })
    }

    #[test]
    fn test_missing_key_uses_fallback() {
        let payload = compose(&sample(), &LlmOutcome::MissingKey);
        assert!(payload.ok);
        assert_eq!(payload.source, Source::Fallback);
        assert_eq!(payload.llm_status, "missing_key");
        assert!(payload.llm_error.is_none());
        assert!(payload.title.contains('2') && payload.title.contains("850"));
        assert!(payload.texts.business.contains("123 Main St"));
        assert!(payload.texts.emotional.contains("123 Main St"));
    }

    #[test]
    fn test_llm_fields_preferred() {
        let payload = compose(&sample(), &llm_copy());
        assert_eq!(payload.source, Source::Llm);
        assert_eq!(payload.llm_status, "ok");
        assert_eq!(payload.title, "Cozy 2BR");
        assert_eq!(payload.texts.business, "Model business.");
        assert_eq!(payload.texts.emotional, "Model emotional.");
    }

    #[test]
    fn test_missing_llm_field_filled_from_fallback() {
        let outcome = LlmOutcome::Ok(LlmCopy {
            title: Some("Cozy 2BR".to_string()),
            business: None,
            emotional: Some("   ".to_string()),
        });
        let input = sample();
        let payload = compose(&input, &outcome);
        assert_eq!(payload.source, Source::Llm);
        assert_eq!(payload.title, "Cozy 2BR");
        assert_eq!(payload.texts.business, fallback_business(&input, input.length));
        assert_eq!(payload.texts.emotional, fallback_emotional(&input, input.length));
    }

    #[test]
    fn test_title_mode_blanks_texts() {
        let input = ListingInput {
            mode: Mode::Title,
            ..sample()
        };
        let payload = compose(&input, &llm_copy());
        assert_eq!(payload.title, "Cozy 2BR");
        assert_eq!(payload.texts, Texts::default());
    }

    #[test]
    fn test_descriptions_mode_blanks_title() {
        let input = ListingInput {
            mode: Mode::Descriptions,
            ..sample()
        };
        let payload = compose(&input, &LlmOutcome::MissingKey);
        assert_eq!(payload.title, "");
        assert!(!payload.texts.business.is_empty());
        assert!(!payload.texts.emotional.is_empty());
    }

    #[test]
    fn test_style_restriction() {
        let business_only = ListingInput {
            style: Style::Business,
            ..sample()
        };
        let payload = compose(&business_only, &llm_copy());
        assert_eq!(payload.texts.business, "Model business.");
        assert_eq!(payload.texts.emotional, "");

        let emotional_only = ListingInput {
            style: Style::Emotional,
            ..sample()
        };
        let payload = compose(&emotional_only, &LlmOutcome::MissingKey);
        assert_eq!(payload.texts.business, "");
        assert!(!payload.texts.emotional.is_empty());
    }

    #[test]
    fn test_provider_error_source() {
        let outcome = LlmOutcome::Failed(LlmError::Status {
            status: 500,
            body: "upstream exploded".to_string(),
        });
        let payload = compose(&sample(), &outcome);
        assert!(payload.ok);
        assert_eq!(payload.source, Source::FallbackLlmError);
        assert_eq!(payload.llm_status, "500");
        assert!(payload.llm_error.unwrap().contains("500"));
        assert!(!payload.title.is_empty());
    }

    #[test]
    fn test_parse_error_source() {
        let outcome = LlmOutcome::Failed(LlmError::Parse("expected value".to_string()));
        let payload = compose(&sample(), &outcome);
        assert_eq!(payload.source, Source::FallbackException);
        assert_eq!(payload.llm_status, "error");
    }

    #[test]
    fn test_timeout_source() {
        let payload = compose(&sample(), &LlmOutcome::Failed(LlmError::Timeout(25)));
        assert_eq!(payload.source, Source::FallbackLlmError);
        assert_eq!(payload.llm_status, "timeout");
    }

    #[test]
    fn test_llm_error_truncated() {
        let outcome = LlmOutcome::Failed(LlmError::Transport("x".repeat(2000)));
        let payload = compose(&sample(), &outcome);
        assert_eq!(payload.llm_error.unwrap().chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn test_fallback_is_idempotent() {
        let a = compose(&sample(), &LlmOutcome::MissingKey);
        let b = compose(&sample(), &LlmOutcome::MissingKey);
        assert_eq!(a, b);
    }

    #[test]
    fn test_payload_serialization() {
        let value = serde_json::to_value(compose(&sample(), &LlmOutcome::MissingKey)).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["source"], "fallback");
        assert_eq!(value["llm_status"], "missing_key");
        assert!(value.get("llm_error").is_none());
        assert!(value["texts"]["business"].is_string());

        let fatal = serde_json::to_value(FatalPayload::default()).unwrap();
        assert_eq!(fatal, serde_json::json!({ "ok": false, "error": "AI_FATAL" }));
    }

    #[test]
    fn test_source_names_match_serde() {
        for source in [
            Source::Llm,
            Source::Fallback,
            Source::FallbackLlmError,
            Source::FallbackException,
        ] {
            assert_eq!(serde_json::to_value(source).unwrap(), source.as_str());
        }
    }
}
