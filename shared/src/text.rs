//! Text processing for assistant replies
//!
//! Everything in this module is pure: category detection from free text,
//! cleanup of raw model output, short-reply expansion, and emoji
//! annotation of farming terms. The backend runs these after every model
//! call, and the browser UI runs the same code through the wasm crate.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::ChatCategory;

/// A reply shorter than this gets a category-specific expansion sentence
/// appended.
pub const MIN_REPLY_CHARS: usize = 50;

/// A reply still shorter than this after expansion is replaced outright
/// by the category template (secondary-model path only).
pub const MIN_ACCEPTABLE_CHARS: usize = 20;

/// Category keyword lists. Scan order is the declaration order below and
/// the first category with any hit wins, so a message mentioning both
/// "maize" and "aphids" is classified as crop, not pest.
const CATEGORY_KEYWORDS: &[(ChatCategory, &[&str])] = &[
    (
        ChatCategory::Crop,
        &[
            "crop", "plant", "seed", "harvest", "grow", "maize", "wheat", "tomato", "potato",
            "vegetable", "fruit", "planting", "growing",
        ],
    ),
    (
        ChatCategory::Livestock,
        &[
            "cattle", "cow", "sheep", "goat", "chicken", "livestock", "animal", "pig", "poultry",
            "breeding", "feeding",
        ],
    ),
    (
        ChatCategory::Pest,
        &[
            "pest", "disease", "insect", "bug", "fungus", "rot", "blight", "aphid", "worm",
            "virus", "infection",
        ],
    ),
    (
        ChatCategory::Weather,
        &[
            "weather", "rain", "drought", "temperature", "climate", "frost", "wind", "storm",
            "season",
        ],
    ),
    (
        ChatCategory::Market,
        &[
            "price", "market", "sell", "buy", "profit", "cost", "demand", "supply", "export",
            "income",
        ],
    ),
    (
        ChatCategory::Soil,
        &[
            "soil", "fertilizer", "compost", "nutrients", "ph", "organic", "nitrogen",
            "phosphorus", "potassium",
        ],
    ),
];

/// Assign a farming topic to a free-text message.
///
/// Matching is a case-insensitive substring check, so "ploughing" hits
/// "plough"-free lists but "growing season" hits crop (via "grow")
/// before weather (via "season").
pub fn detect_category(message: &str) -> ChatCategory {
    let lowered = message.to_lowercase();
    for (category, words) in CATEGORY_KEYWORDS {
        if words.iter().any(|word| lowered.contains(word)) {
            return *category;
        }
    }
    ChatCategory::General
}

fn role_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?i)(Assistant:|AI:|Bot:|Human:|User:)").unwrap())
}

/// Strip one leading role-prefix token the model sometimes echoes back,
/// then trim surrounding whitespace.
pub fn strip_role_prefix(text: &str) -> String {
    role_prefix_pattern().replace(text, "").trim().to_string()
}

fn blank_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

/// Collapse runs of two or more newlines down to a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    blank_line_pattern().replace_all(text, "\n\n").into_owned()
}

/// Canned sentence appended to too-short replies, per category.
pub fn expansion_sentence(category: ChatCategory) -> &'static str {
    match category {
        ChatCategory::Crop => {
            "🌱 For optimal crop management, consider soil testing, proper irrigation \
             scheduling, and integrated pest management practices. Monitor your crops \
             regularly for early problem detection."
        }
        ChatCategory::Livestock => {
            "🐄 Ensure regular health checkups, proper nutrition, and maintain clean living \
             conditions for your livestock. Prevention is always better than treatment."
        }
        ChatCategory::Weather => {
            "🌦️ Monitor weather patterns closely and adjust farming activities accordingly. \
             Consider climate-smart agriculture practices to build resilience."
        }
        ChatCategory::Market => {
            "💰 Stay updated with market trends and consider value-addition opportunities to \
             maximize profits. Direct marketing can often yield better prices."
        }
        ChatCategory::Pest => {
            "🐛 Implement integrated pest management (IPM) combining biological, cultural, \
             and chemical controls. Early detection and prevention are key."
        }
        ChatCategory::Soil => {
            "🌾 Regular soil testing and organic matter addition are essential for maintaining \
             soil health and productivity. Healthy soil equals healthy crops."
        }
        ChatCategory::General => {
            "Consider consulting with local agricultural extension services for personalized \
             advice specific to your area."
        }
    }
}

/// If the reply is under [`MIN_REPLY_CHARS`], append a single space and
/// the canned sentence for the category of the user's question.
pub fn expand_short_reply(text: &str, category: ChatCategory) -> String {
    if text.chars().count() < MIN_REPLY_CHARS {
        format!("{} {}", text, expansion_sentence(category))
    } else {
        text.to_string()
    }
}

/// Complete per-category replies used when even the expanded text is too
/// short to be worth showing (secondary-model path only).
pub fn minimum_reply(category: ChatCategory) -> &'static str {
    match category {
        ChatCategory::Crop => {
            "🌱 Healthy crops start with healthy soil. Test your soil before planting, choose \
             certified seed, and keep a regular scouting routine so problems are caught early."
        }
        ChatCategory::Livestock => {
            "🐄 Keep your animals on a regular vaccination and deworming schedule, provide \
             clean water daily, and adjust feed to the season."
        }
        ChatCategory::Pest => {
            "🐛 Walk your fields weekly and check under leaves for early pest signs. Combine \
             biological, cultural and chemical controls rather than relying on one spray."
        }
        ChatCategory::Weather => {
            "🌦️ Plan field work around the forecast: spray on calm mornings, irrigate before \
             heat waves, and protect seedlings when frost is expected."
        }
        ChatCategory::Market => {
            "💰 Compare prices at more than one buyer before selling, and consider grading \
             and packaging your produce to reach better-paying markets."
        }
        ChatCategory::Soil => {
            "🌾 Add compost or manure every season, rotate your crops, and test soil pH every \
             year to keep nutrients available to your plants."
        }
        ChatCategory::General => {
            "I'm here to help with crops, livestock, pests, weather planning, market prices \
             and soil health. Ask me anything about your farm."
        }
    }
}

/// The emoji annotation table. Patterns are applied top to bottom; the
/// order matters because earlier replacements can consume words later
/// patterns would otherwise match.
fn annotation_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?i)\b(maize|corn)\b", "🌽"),
            (r"(?i)\b(tomato|tomatoes)\b", "🍅"),
            (r"(?i)\b(potato|potatoes)\b", "🥔"),
            (r"(?i)\b(wheat)\b", "🌾"),
            (r"(?i)\b(cattle|cow|cows)\b", "🐄"),
            (r"(?i)\b(chicken|chickens|poultry)\b", "🐔"),
            (r"(?i)\b(sheep)\b", "🐑"),
            (r"(?i)\b(water|irrigation)\b", "💧"),
            (r"(?i)\b(fertilizer|nutrients)\b", "🌿"),
            (r"(?i)\b(harvest|harvesting)\b", "🌾"),
        ]
        .into_iter()
        .map(|(pattern, emoji)| (Regex::new(pattern).unwrap(), emoji))
        .collect()
    })
}

/// Prefix every whole-word occurrence of a farming term with its emoji,
/// preserving the matched word exactly as written.
pub fn annotate_farming_terms(text: &str) -> String {
    let mut annotated = text.to_string();
    for (pattern, emoji) in annotation_rules() {
        annotated = pattern
            .replace_all(&annotated, format!("{emoji} ${{1}}"))
            .into_owned();
    }
    annotated
}
