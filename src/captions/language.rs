//! Language code expansion.
//!
//! Caption catalogs label the same language inconsistently (`en`, `en-US`,
//! `eng`). The table below widens a short code into the variants worth
//! matching. It is hand-maintained and deliberately small; codes not listed
//! only match themselves.

/// Known aliases per base code, base code first.
const VARIANTS: &[(&str, &[&str])] = &[
    ("ko", &["ko", "ko-KR", "kor"]),
    ("en", &["en", "en-US", "en-GB", "en-CA", "en-AU", "eng"]),
    ("ja", &["ja", "ja-JP", "jpn"]),
    ("zh", &["zh", "zh-CN", "zh-TW", "zh-HK", "zh-Hans", "zh-Hant", "zho", "chi"]),
];

/// Language used as the source for translated fallbacks.
pub const ENGLISH: &str = "en";

/// Expand a language code into its ordered variant set.
pub fn expand(code: &str) -> Vec<String> {
    VARIANTS
        .iter()
        .find(|(base, _)| *base == code)
        .map(|(_, variants)| variants.iter().map(|v| v.to_string()).collect())
        .unwrap_or_else(|| vec![code.to_string()])
}

/// Base codes with a known alias table.
pub fn known_bases() -> impl Iterator<Item = &'static str> {
    VARIANTS.iter().map(|(base, _)| *base)
}
