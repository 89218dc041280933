//! Normalization of OCR cell text.

use std::sync::LazyLock;

use regex::Regex;

/// Stored in place of a course the menu leaves blank.
pub const PLACEHOLDER: &str = "-";

/// Dessert categories the vendor glues onto the specific item, in priority
/// order. The first pattern that matches wins.
static DESSERT_CATEGORIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(s[ée]lection de notre affineur)\s+(\S.*)$",
        r"(?i)^(yaourt)\s+(\S.*)$",
        r"(?i)^(fromage blanc)\s+(\S.*)$",
        r"(?i)^(fromage qui chlingue)\s+(\S.*)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static NOT_DETECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^non d[ée]tect[ée]$").unwrap());

/// Removes emphasis markers, collapses whitespace runs (newlines included)
/// into single spaces and trims the result.
pub fn clean_text(text: &str) -> String {
    text.replace('*', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a dessert cell into `"<category> / <specific>"` when it starts
/// with a known category. Text that matches no category comes back as is.
pub fn format_dessert(text: &str) -> String {
    for pattern in DESSERT_CATEGORIES.iter() {
        if let Some(caps) = pattern.captures(text) {
            let specific = &caps[2];
            // Already separated upstream
            if specific.starts_with('/') {
                return text.to_string();
            }
            return format!("{} / {}", &caps[1], specific);
        }
    }
    text.to_string()
}

/// Maps blank cells and the OCR "not detected" marker to [`PLACEHOLDER`].
pub fn or_placeholder(text: String) -> String {
    if text.is_empty() || NOT_DETECTED.is_match(&text) {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}
