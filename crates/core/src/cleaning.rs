use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strips `<...>` tags, collapses whitespace runs to one space and trims.
///
/// Text between tags is concatenated as-is, so `a<br/>b` becomes `ab`.
/// Character entities such as `&amp;` are left untouched.
pub fn clean_text(text: &str) -> String {
    let without_markup = MARKUP_TAG.replace_all(text, "");
    normalize_whitespace(&without_markup)
}

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}
