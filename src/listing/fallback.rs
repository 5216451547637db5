//! Deterministic fallback copy
//!
//! Pure functions of a `ListingInput`. Each description is an ordered list of
//! candidate sentences, some conditional on a field being present, cut to a
//! prefix whose size depends on the requested `Length`.

use super::{truncate_chars, GeneratedCopy, Length, ListingInput};

/// Maximum fallback title length in characters
pub const MAX_TITLE_CHARS: usize = 120;

/// Short headline from bedrooms, area and address
pub fn fallback_title(input: &ListingInput) -> String {
    let locale = input.locale;

    if !input.has_title_facts() {
        let base = input
            .title
            .as_deref()
            .unwrap_or_else(|| locale.title_placeholder());
        return truncate_chars(base, MAX_TITLE_CHARS);
    }

    let mut parts = vec![locale.title_head(input.bedrooms)];
    if let Some(area) = input.area {
        parts.push(locale.format_area(area));
    }
    if let Some(address) = &input.address {
        parts.push(address.clone());
    }

    truncate_chars(&parts.join(", "), MAX_TITLE_CHARS)
}

/// Factual description
pub fn fallback_business(input: &ListingInput, length: Length) -> String {
    let locale = input.locale;
    let mut sentences = vec![locale.turnkey(input.address.as_deref())];

    if let Some(area) = input.area {
        sentences.push(locale.floor_plan(area));
    }
    if let Some(rooms) = locale.room_counts(input.bedrooms, input.bathrooms) {
        sentences.push(rooms);
    }
    if let Some(price) = input.price {
        sentences.push(locale.price(price));
    }
    sentences.push(locale.suitability().to_string());
    if !input.images.is_empty() {
        sentences.push(locale.business_photos().to_string());
    }

    join_prefix(sentences, length.business_sentences())
}

/// Lifestyle description
pub fn fallback_emotional(input: &ListingInput, length: Length) -> String {
    let locale = input.locale;
    let mut sentences = vec![
        locale.ambiance().to_string(),
        locale.gathering().to_string(),
    ];

    if let Some(address) = &input.address {
        sentences.push(locale.neighborhood(address));
    }
    if !input.images.is_empty() {
        sentences.push(locale.emotional_photos().to_string());
    }
    sentences.push(locale.closing().to_string());

    join_prefix(sentences, length.emotional_sentences())
}

/// All three fallback fields at the input's own length, regardless of mode
pub fn fallback_copy(input: &ListingInput) -> GeneratedCopy {
    GeneratedCopy {
        title: fallback_title(input),
        business: fallback_business(input, input.length),
        emotional: fallback_emotional(input, input.length),
    }
}

fn join_prefix(sentences: Vec<String>, count: usize) -> String {
    sentences
        .into_iter()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}
