//! Prompt construction for listing copy
//!
//! The model is asked for exactly one JSON object:
//!
//! ```json
//! {"title": "...", "texts": {"business": "...", "emotional": "..."}}
//! ```
//!
//! Fields the caller did not request must come back as empty strings.

use crate::listing::{format_number, ListingInput};

/// Maximum title length requested from the model
const TITLE_CHARS: usize = 80;

const EMPTY_TITLE_RULE: &str = "- \"title\": must be an empty string \"\".";
const EMPTY_BUSINESS_RULE: &str = "- \"texts.business\": must be an empty string \"\".";
const EMPTY_EMOTIONAL_RULE: &str = "- \"texts.emotional\": must be an empty string \"\".";

/// A rendered prompt: instructions plus optional image references
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    /// Absolute image URLs to attach as separate content parts
    pub images: Vec<String>,
}

impl Prompt {
    /// Render the prompt for a normalized listing
    pub fn build(input: &ListingInput) -> Self {
        let images = input.prompt_images().to_vec();
        Self {
            system: system_prompt(input),
            user: user_prompt(input, images.len()),
            images,
        }
    }
}

fn system_prompt(input: &ListingInput) -> String {
    format!(
        r#"You are an experienced real-estate copywriter. You write listing copy in {language}.
Use only the facts you are given and what is clearly visible in attached photos. Never invent amenities, views, renovations or any other details that are not stated or visible in the photos.
Respond with a single JSON object and nothing else: no markdown, no code fences, no commentary."#,
        language = input.locale.language_name()
    )
}

fn user_prompt(input: &ListingInput, image_count: usize) -> String {
    let locale = input.locale;
    let (min, max) = input.length.sentence_range();

    let mut facts = Vec::new();
    if let Some(title) = &input.title {
        facts.push(format!("- Working title: {}", title));
    }
    if let Some(address) = &input.address {
        facts.push(format!("- Address: {}", address));
    }
    if let Some(price) = input.price {
        facts.push(format!("- Price: {}", locale.format_price(price)));
    }
    if let Some(bedrooms) = input.bedrooms {
        facts.push(format!("- Bedrooms: {}", format_number(bedrooms)));
    }
    if let Some(bathrooms) = input.bathrooms {
        facts.push(format!("- Bathrooms: {}", format_number(bathrooms)));
    }
    if let Some(area) = input.area {
        facts.push(format!("- Area: {}", locale.format_area(area)));
    }
    if let Some(notes) = &input.notes {
        facts.push(format!("- Agent notes: {}", notes));
    }
    if facts.is_empty() {
        facts.push("- No structured facts were provided.".to_string());
    }

    let title_rule = if input.wants_title() {
        format!(
            "- \"title\": a catchy headline of at most {} characters.",
            TITLE_CHARS
        )
    } else {
        EMPTY_TITLE_RULE.to_string()
    };

    let business_rule = if input.wants_business() {
        format!(
            "- \"texts.business\": a factual, professional description of {}-{} sentences covering layout, size, rooms, price and suitability.",
            min, max
        )
    } else {
        EMPTY_BUSINESS_RULE.to_string()
    };

    let emotional_rule = if input.wants_emotional() {
        format!(
            "- \"texts.emotional\": a warm, lifestyle-oriented description of {}-{} sentences that helps the reader imagine living there.",
            min, max
        )
    } else {
        EMPTY_EMOTIONAL_RULE.to_string()
    };

    let photo_note = if image_count > 0 {
        format!(
            "\n{} photo(s) of the property are attached. Describe only what is visible in them; never invent details that are not visible in the photos.\n",
            image_count
        )
    } else {
        String::new()
    };

    format!(
        r#"Listing facts:
{facts}

Return exactly this JSON shape:
{{"title": string, "texts": {{"business": string, "emotional": string}}}}

Field rules:
{title_rule}
{business_rule}
{emotional_rule}
{photo_note}
Write every text in {language}."#,
        facts = facts.join("\n"),
        language = locale.language_name()
    )
}
