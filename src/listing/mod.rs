//! Listing data model
//!
//! Provides:
//! - Request knobs (`Style`, `Mode`, `Length`)
//! - The normalized `ListingInput` a request is reduced to
//! - Locale tables and the deterministic fallback copy generator

mod fallback;
mod locale;
mod normalize;

pub use fallback::{fallback_business, fallback_copy, fallback_emotional, fallback_title};
pub use locale::Locale;
pub use normalize::{normalize, parse_body, resolve_image_url, NormalizeOptions};

use serde::{Deserialize, Serialize};

/// Which description variants the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Factual, agent-facing copy only
    Business,
    /// Lifestyle copy only
    Emotional,
    #[default]
    Both,
}

impl Style {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Style> {
        match s.trim().to_lowercase().as_str() {
            "business" => Some(Style::Business),
            "emotional" => Some(Style::Emotional),
            "both" => Some(Style::Both),
            _ => None,
        }
    }

    pub fn wants_business(&self) -> bool {
        matches!(self, Style::Business | Style::Both)
    }

    pub fn wants_emotional(&self) -> bool {
        matches!(self, Style::Emotional | Style::Both)
    }
}

/// Which output fields the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Title,
    Descriptions,
    #[default]
    All,
}

impl Mode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Mode> {
        match s.trim().to_lowercase().as_str() {
            "title" => Some(Mode::Title),
            "descriptions" => Some(Mode::Descriptions),
            "all" => Some(Mode::All),
            _ => None,
        }
    }

    pub fn wants_title(&self) -> bool {
        matches!(self, Mode::Title | Mode::All)
    }

    pub fn wants_descriptions(&self) -> bool {
        matches!(self, Mode::Descriptions | Mode::All)
    }
}

/// Target length of the descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Length> {
        match s.trim().to_lowercase().as_str() {
            "short" => Some(Length::Short),
            "medium" => Some(Length::Medium),
            "long" => Some(Length::Long),
            _ => None,
        }
    }

    /// Sentence range requested from the model for each description
    pub fn sentence_range(&self) -> (usize, usize) {
        match self {
            Length::Short => (2, 3),
            Length::Medium => (4, 5),
            Length::Long => (6, 8),
        }
    }

    /// Sentences kept from the business fallback template
    pub fn business_sentences(&self) -> usize {
        match self {
            Length::Short => 2,
            Length::Medium => 4,
            Length::Long => 6,
        }
    }

    /// Sentences kept from the emotional fallback template
    pub fn emotional_sentences(&self) -> usize {
        match self {
            Length::Short => 2,
            Length::Medium => 3,
            Length::Long => 5,
        }
    }

    /// Completion token budget
    pub fn max_tokens(&self) -> u32 {
        match self {
            Length::Short => 300,
            Length::Medium => 600,
            Length::Long => 900,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            Length::Short => 0.6,
            Length::Medium | Length::Long => 0.7,
        }
    }
}

/// A listing after normalization; every field is well-typed and defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct ListingInput {
    pub title: Option<String>,
    pub address: Option<String>,
    /// Finite and positive when present
    pub price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub area: Option<f64>,
    pub notes: Option<String>,
    /// Absolute URLs, already capped to the configured maximum
    pub images: Vec<String>,
    pub style: Style,
    pub mode: Mode,
    pub length: Length,
    pub use_images: bool,
    pub locale: Locale,
}

impl Default for ListingInput {
    fn default() -> Self {
        Self {
            title: None,
            address: None,
            price: None,
            bedrooms: None,
            bathrooms: None,
            area: None,
            notes: None,
            images: Vec::new(),
            style: Style::default(),
            mode: Mode::default(),
            length: Length::default(),
            use_images: true,
            locale: Locale::default(),
        }
    }
}

impl ListingInput {
    pub fn wants_title(&self) -> bool {
        self.mode.wants_title()
    }

    pub fn wants_business(&self) -> bool {
        self.mode.wants_descriptions() && self.style.wants_business()
    }

    pub fn wants_emotional(&self) -> bool {
        self.mode.wants_descriptions() && self.style.wants_emotional()
    }

    /// Images to attach to the provider request
    pub fn prompt_images(&self) -> &[String] {
        if self.use_images {
            &self.images
        } else {
            &[]
        }
    }

    /// Whether any of the fields the fallback title is built from are present
    pub fn has_title_facts(&self) -> bool {
        self.bedrooms.is_some() || self.area.is_some() || self.address.is_some()
    }
}

/// Title and description texts for one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCopy {
    pub title: String,
    pub business: String,
    pub emotional: String,
}

/// Render a count or area without a spurious `.0`
///
/// Values below 1 keep their first significant digit, so a positive value
/// never renders as `0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let magnitude = value.abs();
    let decimals = if magnitude < 1.0 {
        (-magnitude.log10()).ceil().max(1.0) as usize
    } else {
        1
    };
    let s = format!("{:.*}", decimals, value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Cut `s` to at most `max` characters and trim surrounding whitespace
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim().to_string(),
        None => s.trim().to_string(),
    }
}
