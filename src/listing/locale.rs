//! Locale tables for fallback copy
//!
//! Every user-visible fallback phrase lives here so the generator itself is
//! language-agnostic.

use serde::{Deserialize, Serialize};

use super::format_number;

/// Copy language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "english")]
    En,
    #[serde(alias = "russian")]
    Ru,
}

/// Russian plural class
enum Plural {
    One,
    Few,
    Many,
}

fn russian_plural(n: f64) -> Plural {
    if n.fract() != 0.0 {
        return Plural::Few;
    }
    let n = n.abs() as u64;
    match (n % 10, n % 100) {
        (1, r) if r != 11 => Plural::One,
        (2..=4, r) if !(12..=14).contains(&r) => Plural::Few,
        _ => Plural::Many,
    }
}

/// Group the integer part of `value` in threes with `sep`
fn group_thousands(value: f64, sep: &str) -> String {
    let digits = format!("{}", value.round().max(0.0) as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

impl Locale {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Locale> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "ru" | "russian" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// Language name used in the model instruction
    pub fn language_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ru => "Russian",
        }
    }

    /// Title used when no structured facts are available
    pub fn title_placeholder(&self) -> &'static str {
        match self {
            Locale::En => "Modern Home",
            Locale::Ru => "Современная квартира",
        }
    }

    pub fn format_area(&self, area: f64) -> String {
        match self {
            Locale::En => format!("{} sq ft", format_number(area)),
            Locale::Ru => format!("{} м²", format_number(area)),
        }
    }

    pub fn format_price(&self, price: f64) -> String {
        match self {
            Locale::En => format!("${}", group_thousands(price, ",")),
            Locale::Ru => format!("{} ₽", group_thousands(price, " ")),
        }
    }

    fn bedrooms_phrase(&self, n: f64) -> String {
        let count = format_number(n);
        match self {
            Locale::En if n == 1.0 => format!("{} bedroom", count),
            Locale::En => format!("{} bedrooms", count),
            Locale::Ru => match russian_plural(n) {
                Plural::One => format!("{} спальня", count),
                Plural::Few => format!("{} спальни", count),
                Plural::Many => format!("{} спален", count),
            },
        }
    }

    fn bathrooms_phrase(&self, n: f64) -> String {
        let count = format_number(n);
        match self {
            Locale::En if n == 1.0 => format!("{} bathroom", count),
            Locale::En => format!("{} bathrooms", count),
            Locale::Ru => match russian_plural(n) {
                Plural::One => format!("{} санузел", count),
                Plural::Few => format!("{} санузла", count),
                Plural::Many => format!("{} санузлов", count),
            },
        }
    }

    /// Leading phrase of the fallback title
    pub fn title_head(&self, bedrooms: Option<f64>) -> String {
        match (self, bedrooms) {
            (Locale::En, Some(n)) => format!("{}-Bedroom Home", format_number(n)),
            (Locale::En, None) => "Home".to_string(),
            (Locale::Ru, Some(n)) => format!("{}-комнатная квартира", format_number(n)),
            (Locale::Ru, None) => "Квартира".to_string(),
        }
    }

    pub fn turnkey(&self, address: Option<&str>) -> String {
        match (self, address) {
            (Locale::En, Some(addr)) => format!(
                "This turn-key property at {} is offered in ready-to-use condition.",
                addr
            ),
            (Locale::En, None) => {
                "This turn-key property is offered in ready-to-use condition.".to_string()
            }
            (Locale::Ru, Some(addr)) => format!(
                "Объект по адресу {} продаётся в состоянии «заезжай и живи».",
                addr
            ),
            (Locale::Ru, None) => {
                "Объект продаётся в состоянии «заезжай и живи».".to_string()
            }
        }
    }

    pub fn floor_plan(&self, area: f64) -> String {
        match self {
            Locale::En => format!(
                "The practical floor plan offers {} of usable space.",
                self.format_area(area)
            ),
            Locale::Ru => format!(
                "Продуманная планировка общей площадью {} без лишних метров.",
                self.format_area(area)
            ),
        }
    }

    /// Room-count sentence; `None` when neither count is known
    pub fn room_counts(&self, bedrooms: Option<f64>, bathrooms: Option<f64>) -> Option<String> {
        let counts = match (bedrooms, bathrooms) {
            (Some(bed), Some(bath)) => {
                let joiner = match self {
                    Locale::En => " and ",
                    Locale::Ru => " и ",
                };
                format!(
                    "{}{}{}",
                    self.bedrooms_phrase(bed),
                    joiner,
                    self.bathrooms_phrase(bath)
                )
            }
            (Some(bed), None) => self.bedrooms_phrase(bed),
            (None, Some(bath)) => self.bathrooms_phrase(bath),
            (None, None) => return None,
        };
        Some(match self {
            Locale::En => format!("It comprises {} arranged for everyday comfort.", counts),
            Locale::Ru => format!("В квартире {}, всё устроено для повседневного комфорта.", counts),
        })
    }

    pub fn price(&self, price: f64) -> String {
        match self {
            Locale::En => format!(
                "The asking price is {}, in line with comparable listings.",
                self.format_price(price)
            ),
            Locale::Ru => format!(
                "Цена {} соответствует рынку для подобных объектов.",
                self.format_price(price)
            ),
        }
    }

    pub fn suitability(&self) -> &'static str {
        match self {
            Locale::En => {
                "It suits owner-occupiers ready to move in right away as well as buyers looking for a rental investment."
            }
            Locale::Ru => {
                "Подойдёт как для собственного проживания сразу после покупки, так и для сдачи в аренду."
            }
        }
    }

    pub fn business_photos(&self) -> &'static str {
        match self {
            Locale::En => "The attached photos show the current condition of the property.",
            Locale::Ru => "Актуальное состояние объекта можно оценить по фотографиям.",
        }
    }

    pub fn ambiance(&self) -> &'static str {
        match self {
            Locale::En => "Step inside and feel the calm, light-filled atmosphere of a place made for living.",
            Locale::Ru => "Здесь с первых минут чувствуется спокойная, светлая атмосфера настоящего дома.",
        }
    }

    pub fn gathering(&self) -> &'static str {
        match self {
            Locale::En => "Picture slow weekend breakfasts, dinners with friends and evenings that stretch on.",
            Locale::Ru => "Представьте неспешные завтраки по выходным, ужины с друзьями и долгие уютные вечера.",
        }
    }

    pub fn neighborhood(&self, address: &str) -> String {
        match self {
            Locale::En => format!(
                "Around {}, everything you need for daily life is close at hand.",
                address
            ),
            Locale::Ru => format!("Рядом с домом по адресу {} есть всё для жизни.", address),
        }
    }

    pub fn emotional_photos(&self) -> &'static str {
        match self {
            Locale::En => "Browse the photos and imagine your own life unfolding here.",
            Locale::Ru => "Посмотрите фотографии и представьте здесь свою жизнь.",
        }
    }

    pub fn closing(&self) -> &'static str {
        match self {
            Locale::En => "It is the kind of place that feels like home from the very first day.",
            Locale::Ru => "Это место, которое с первого дня ощущается домом.",
        }
    }
}
